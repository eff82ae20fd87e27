//! HTTP client for a PostgREST-compatible table API.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};

use super::{RemoteError, RemoteQuery, RemoteService};
use crate::normalize::RemoteRow;

/// Client for the remote table API.
///
/// Rows are addressed as `<base_url>/rest/v1/<table>`; the API key is sent
/// both as the `apikey` header and as a bearer token.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl RestClient {
    /// Creates a new client with explicit parameters.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Builds the URL addressing a whole table.
    fn build_table_url(&self, table: &str) -> String {
        let base_url = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!("https://{}", self.base_url)
        };

        format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
    }

    /// Builds the select URL for a query, filters and ordering included.
    fn build_query_url(&self, query: &RemoteQuery) -> String {
        let mut url = format!(
            "{}?select=*&{}=eq.{}",
            self.build_table_url(&query.table),
            query.owner_column,
            urlencoding::encode(&query.owner_id)
        );

        if let Some(range) = &query.date_range {
            url.push_str(&format!(
                "&{col}=gte.{}&{col}=lte.{}",
                range.from,
                range.to,
                col = range.column
            ));
        }

        if let Some(column) = &query.order_by {
            let direction = if query.descending { "desc" } else { "asc" };
            url.push_str(&format!("&order={}.{}", column, direction));
        }

        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteService for RestClient {
    async fn query(&self, query: &RemoteQuery) -> Result<Vec<RemoteRow>, RemoteError> {
        let url = self.build_query_url(query);
        tracing::debug!(table = %query.table, "Querying remote table");

        let response = self
            .authorize(self.http.get(&url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json::<Vec<RemoteRow>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn insert(&self, table: &str, row: RemoteRow) -> Result<Option<RemoteRow>, RemoteError> {
        let url = self.build_table_url(table);

        let response = self
            .authorize(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let rows: Vec<RemoteRow> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(rows.into_iter().next())
    }
}
