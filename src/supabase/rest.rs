//! PostgREST table calls.
//!
//! Single-row calls ask for `application/vnd.pgrst.object+json`; PostgREST
//! answers 406 with `PGRST116` when no row matched, which surfaces as
//! `SupabaseError::NotFound`.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::filter::TableQuery;
use super::types::{AccessToken, SupabaseError};
use super::{SupabaseClient, read_body, read_json, send};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

impl SupabaseClient {
    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    /// `GET /rest/v1/<table>?<query>` returning every matching row.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or bad JSON.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        token: Option<&AccessToken>,
        query: &TableQuery,
    ) -> Result<Vec<T>, SupabaseError> {
        let request = self
            .request(Method::GET, &self.table_url(table), token)
            .query(query.params());
        read_json(send(request).await?).await
    }

    /// `GET` expecting exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row matched.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        token: Option<&AccessToken>,
        query: &TableQuery,
    ) -> Result<T, SupabaseError> {
        let request = self
            .request(Method::GET, &self.table_url(table), token)
            .query(query.params())
            .header("Accept", SINGLE_OBJECT);
        read_json(send(request).await?).await
    }

    /// `POST` one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected (constraint, RLS) or fails.
    pub async fn insert_single<T, B>(&self, table: &str, token: Option<&AccessToken>, row: &B) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = self
            .request(Method::POST, &self.table_url(table), token)
            .query(&[("select", "*")])
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(row);
        read_json(send(request).await?).await
    }

    /// `PATCH` the rows matched by `filter` and return the single updated row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the filter matched nothing visible to the caller.
    pub async fn update_single<T, B>(
        &self,
        table: &str,
        token: Option<&AccessToken>,
        filter: &TableQuery,
        changes: &B,
    ) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = self
            .request(Method::PATCH, &self.table_url(table), token)
            .query(filter.params())
            .query(&[("select", "*")])
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes);
        read_json(send(request).await?).await
    }

    /// `DELETE` the rows matched by `filter`. Matching nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn delete(&self, table: &str, token: Option<&AccessToken>, filter: &TableQuery) -> Result<(), SupabaseError> {
        let request = self
            .request(Method::DELETE, &self.table_url(table), token)
            .query(filter.params());
        read_body(send(request).await?).await?;
        Ok(())
    }
}
