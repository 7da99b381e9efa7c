//! PostgREST query-string builder.
//!
//! Horizontal filters follow the `column=op.value` grammar. Values inside
//! logical groups (`or=(...)`) are double-quoted so reserved characters in
//! user input (`,` `(` `)` `.` `:`) cannot change the meaning of the group.

/// A single filter usable inside a logical group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    ILike(String, String),
}

impl Filter {
    #[must_use]
    pub fn ilike(column: &str, pattern: impl Into<String>) -> Self {
        Self::ILike(column.to_owned(), pattern.into())
    }

    /// Render the filter in group syntax: `column.op."value"`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::ILike(column, pattern) => format!("{column}.ilike.{}", quote(pattern)),
        }
    }
}

/// Double-quote a value for use inside a PostgREST logical group.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Wrap a search term as a case-insensitive substring pattern.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    format!("%{term}%")
}

/// Ordered list of query parameters for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    params: Vec<(String, String)>,
}

impl TableQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl AsRef<str>) -> Self {
        self.params.push((column.into(), format!("eq.{}", value.as_ref())));
        self
    }

    /// Add an `or=(...)` group. An empty group is skipped.
    #[must_use]
    pub fn or(mut self, filters: &[Filter]) -> Self {
        if filters.is_empty() {
            return self;
        }
        let group = filters.iter().map(Filter::render).collect::<Vec<_>>().join(",");
        self.params.push(("or".into(), format!("({group})")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params.push(("order".into(), format!("{column}.{direction}")));
        self
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter named `key`.
    #[cfg(test)]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
