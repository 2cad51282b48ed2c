//! HTTP data source for the inventory API

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::RecordError;
use shared::models::{
    Employee, EmployeeResponse, InwardRecord, InwardResponse, OutwardRecord, OutwardResponse,
    ReturnRecord, ReturnResponse, Role, RoleResponse,
};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::feed::Feed;

/// Read-only access to the collections the analytics pipeline aggregates
///
/// Every call fetches the full collection. Implementations return validated
/// records; a failure of any kind is an `Err` and never a partial list.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn employees(&self) -> ClientResult<Vec<Employee>>;
    async fn employee_roles(&self) -> ClientResult<Vec<Role>>;
    async fn outwards(&self) -> ClientResult<Vec<OutwardRecord>>;
    async fn inwards(&self) -> ClientResult<Vec<InwardRecord>>;
    async fn returns(&self) -> ClientResult<Vec<ReturnRecord>>;
}

/// Validate decoded wire records, reporting the first bad one
pub fn validate_records<R, T>(feed: Feed, raw: Vec<R>) -> ClientResult<Vec<T>>
where
    T: TryFrom<R, Error = RecordError>,
{
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            T::try_from(record).map_err(|source| ClientError::MalformedRecord {
                feed,
                index,
                source,
            })
        })
        .collect()
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base URL is empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a collection and decode it as a JSON array
    async fn get_collection<R: DeserializeOwned>(&self, feed: Feed) -> ClientResult<Vec<R>> {
        let url = format!("{}/{}", self.base_url, feed.path());
        tracing::trace!(feed = %feed, url = %url, "GET");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch<R, T>(&self, feed: Feed) -> ClientResult<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = RecordError>,
    {
        let raw = self.get_collection::<R>(feed).await?;
        validate_records(feed, raw)
    }
}

#[async_trait]
impl InventorySource for NetworkHttpClient {
    async fn employees(&self) -> ClientResult<Vec<Employee>> {
        self.fetch::<EmployeeResponse, _>(Feed::Employees).await
    }

    async fn employee_roles(&self) -> ClientResult<Vec<Role>> {
        self.fetch::<RoleResponse, _>(Feed::Roles).await
    }

    async fn outwards(&self) -> ClientResult<Vec<OutwardRecord>> {
        self.fetch::<OutwardResponse, _>(Feed::Outwards).await
    }

    async fn inwards(&self) -> ClientResult<Vec<InwardRecord>> {
        self.fetch::<InwardResponse, _>(Feed::Inwards).await
    }

    async fn returns(&self) -> ClientResult<Vec<ReturnRecord>> {
        self.fetch::<ReturnResponse, _>(Feed::Returns).await
    }
}
