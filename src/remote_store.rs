// HTTP client for the hosted backend
// One attempt per call; timeouts are enforced by the underlying client

use crate::config::StoreConfig;
use crate::store::{ClientError, ListQuery, Record, Store, StoreError, Table};
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct RemoteStore {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl RemoteStore {
    // Create a new client with the given configuration
    pub fn new(config: &StoreConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ClientError::ConfigError(format!("Invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::ConfigError(format!(
                "Base URL cannot hold paths: {}",
                config.base_url
            )));
        }
        if config.timeout_ms == 0 {
            return Err(ClientError::ConfigError(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        if !config.api_key.is_empty() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| ClientError::ConfigError(format!("Invalid API key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    // {base}/{table}[/{id}]
    pub fn endpoint(&self, table: Table, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::NetworkError(format!("Unusable base URL: {}", self.base_url))
            })?;
            segments.pop_if_empty().push(table.name());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    pub fn list_url(&self, table: Table, query: &ListQuery) -> Result<Url, StoreError> {
        let mut url = self.endpoint(table, None)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some((field, value)) = &query.filter {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                pairs.append_pair(field, &format!("eq.{}", value));
            }
            if let Some(order) = &query.order_by {
                pairs.append_pair(
                    "order",
                    &format!("{}.{}", order.field, order.direction.as_str()),
                );
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout_ms)
        } else {
            StoreError::NetworkError(err.to_string())
        }
    }

    async fn check_status(
        &self,
        table: Table,
        id: Option<&str>,
        response: Response,
    ) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound {
                    table,
                    id: id.to_string(),
                });
            }
        }

        let message = response.text().await.unwrap_or_default();
        warn!(table = %table, status = status.as_u16(), "Store rejected request");
        Err(StoreError::ResponseError {
            status_code: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, StoreError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Store for RemoteStore {
    async fn list(&self, table: Table, query: ListQuery) -> Result<Vec<Record>, StoreError> {
        let url = self.list_url(table, &query)?;
        debug!(table = %table, url = %url, "Listing records");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = self.check_status(table, None, response).await?;
        self.read_json(response).await
    }

    async fn create(&self, table: Table, record: Record) -> Result<Record, StoreError> {
        let url = self.endpoint(table, None)?;
        debug!(table = %table, "Creating record");

        let response = self
            .client
            .post(url)
            .json(&record)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = self.check_status(table, None, response).await?;
        self.read_json(response).await
    }

    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<(), StoreError> {
        let url = self.endpoint(table, Some(id))?;
        debug!(table = %table, id = %id, "Updating record");

        let response = self
            .client
            .patch(url)
            .json(&patch)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_status(table, Some(id), response).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let url = self.endpoint(table, Some(id))?;
        debug!(table = %table, id = %id, "Deleting record");

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_status(table, Some(id), response).await?;
        Ok(())
    }
}
