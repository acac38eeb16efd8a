use super::{Order, StoreError, StoreKind, StoryStore};
use crate::models::{NewStory, StoryRecord};
use crate::runtime_config::Credentials;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// [`StoryStore`] backed by the hosted database's REST interface.
pub struct SupabaseStore {
    client: Client,
    rest_url: Url,
}

impl SupabaseStore {
    /// Builds a client bound to `credentials`.
    ///
    /// Fails when the URL does not parse, the key is not a valid header value,
    /// or the HTTP client cannot be built.
    pub fn new(credentials: &Credentials) -> Result<Self, StoreError> {
        let base = Url::parse(credentials.url())
            .map_err(|e| StoreError::Construction(format!("invalid database URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Construction(format!(
                "database URL cannot be a base: {}",
                credentials.url()
            )));
        }
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| StoreError::Construction(format!("invalid database URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key_header(credentials.key())?);
        headers.insert(
            AUTHORIZATION,
            key_header(&format!("Bearer {}", credentials.key()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Construction(e.to_string()))?;

        Ok(Self { client, rest_url })
    }

    // Only plain identifiers are joined, so a table name can never leave the
    // REST root (`../auth`, an absolute URL, a query string).
    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let plain = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !plain {
            return Err(StoreError::InvalidTable(table.to_string()));
        }
        self.rest_url
            .join(table)
            .map_err(|_| StoreError::InvalidTable(table.to_string()))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn key_header(value: &str) -> Result<HeaderValue, StoreError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| StoreError::Construction("database key is not a valid header value".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

fn order_param(order: &Order) -> String {
    let direction = if order.ascending { "asc" } else { "desc" };
    format!("{}.{}", order.column, direction)
}

#[async_trait]
impl StoryStore for SupabaseStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Supabase
    }

    async fn insert(&self, table: &str, story: &NewStory) -> Result<StoryRecord, StoreError> {
        let url = self.table_url(table)?;
        debug!(url = %url, "Inserting row");

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(story)
            .send()
            .await?;

        let rows: Vec<StoryRecord> = Self::read_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NoRowReturned(table.to_string()))
    }

    async fn select(&self, table: &str, order: &Order) -> Result<Vec<StoryRecord>, StoreError> {
        let url = self.table_url(table)?;
        debug!(url = %url, order = %order_param(order), "Selecting rows");

        let response = self
            .client
            .get(url)
            .query(&[("select", "*".to_string()), ("order", order_param(order))])
            .send()
            .await?;

        Self::read_json(response).await
    }
}
