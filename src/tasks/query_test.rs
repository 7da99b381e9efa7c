use super::*;
use crate::tasks::types::{Choice, TaskPriority, TaskSortField, TaskStatus};

#[test]
fn default_filters_only_select_and_order() {
    let query = list_query(&TaskFilters::default(), TaskSort::default());
    assert_eq!(
        query.params(),
        &[("select".to_owned(), "*".to_owned()), ("order".to_owned(), "created_at.desc".to_owned())]
    );
}

#[test]
fn status_and_priority_become_eq_filters() {
    let filters = TaskFilters {
        status: Choice::Only(TaskStatus::InProgress),
        priority: Choice::Only(TaskPriority::High),
        search: String::new(),
    };
    let query = list_query(&filters, TaskSort::default());
    assert_eq!(query.get("status"), Some("eq.in_progress"));
    assert_eq!(query.get("priority"), Some("eq.high"));
    assert_eq!(query.get("or"), None);
}

#[test]
fn search_matches_title_or_description() {
    let filters = TaskFilters { search: "invoice".into(), ..TaskFilters::default() };
    let query = list_query(&filters, TaskSort::default());
    assert_eq!(query.get("or"), Some(r#"(title.ilike."%invoice%",description.ilike."%invoice%")"#));
}

#[test]
fn whitespace_search_is_ignored() {
    let filters = TaskFilters { search: "   ".into(), ..TaskFilters::default() };
    assert_eq!(list_query(&filters, TaskSort::default()).get("or"), None);
}

#[test]
fn search_with_reserved_characters_stays_inside_quotes() {
    let filters = TaskFilters { search: r#"a,b) "c""#.into(), ..TaskFilters::default() };
    let query = list_query(&filters, TaskSort::default());
    assert_eq!(
        query.get("or"),
        Some(r#"(title.ilike."%a,b) \"c\"%",description.ilike."%a,b) \"c\"%")"#)
    );
}

#[test]
fn sort_controls_order_param() {
    let sort = TaskSort { field: TaskSortField::DueDate, direction: SortDirection::Asc };
    assert_eq!(list_query(&TaskFilters::default(), sort).get("order"), Some("due_date.asc"));
}

#[test]
fn by_id_filters_on_primary_key() {
    let id = Uuid::nil();
    let query = by_id(id);
    assert_eq!(query.get("select"), Some("*"));
    assert_eq!(query.get("id"), Some("eq.00000000-0000-0000-0000-000000000000"));
    assert_eq!(id_filter(id).get("select"), None);
}
