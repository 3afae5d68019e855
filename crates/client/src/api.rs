//! REST client for the customers resource.
//!
//! Wraps the five customer endpoints using [`reqwest`]. Create and update
//! always go out as `multipart/form-data`, with or without an image.

use crm_core::customer::Customer;
use crm_core::types::CustomerId;
use futures::future::try_join_all;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::form::CustomerForm;

/// HTTP client for the customers API.
#[derive(Debug, Clone)]
pub struct CustomerApi {
    client: reqwest::Client,
    base_url: String,
}

/// Which records a delete targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    One(CustomerId),
    Many(Vec<CustomerId>),
}

impl From<CustomerId> for DeleteTarget {
    fn from(id: CustomerId) -> Self {
        DeleteTarget::One(id)
    }
}

impl From<Vec<CustomerId>> for DeleteTarget {
    fn from(ids: Vec<CustomerId>) -> Self {
        DeleteTarget::Many(ids)
    }
}

impl From<&[CustomerId]> for DeleteTarget {
    fn from(ids: &[CustomerId]) -> Self {
        DeleteTarget::Many(ids.to_vec())
    }
}

/// JSON error body the server returns on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl CustomerApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// `GET /` -- all customers.
    pub async fn list(&self) -> ClientResult<Vec<Customer>> {
        let response = self.client.get(&self.base_url).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /{id}`.
    pub async fn get(&self, id: CustomerId) -> ClientResult<Customer> {
        let response = self.client.get(self.record_url(id)).send().await?;
        Self::parse_response(response).await
    }

    /// `POST /` with the form as multipart.
    pub async fn create(&self, form: &CustomerForm) -> ClientResult<Customer> {
        let response = self
            .client
            .post(&self.base_url)
            .multipart(form.to_multipart()?)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `PUT /{id}` with the full form as multipart; absent optional fields
    /// are cleared.
    pub async fn update(&self, id: CustomerId, form: &CustomerForm) -> ClientResult<Customer> {
        let response = self
            .client
            .put(self.record_url(id))
            .multipart(form.to_update_multipart()?)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Delete one record or a set of records, returning the targeted ids.
    pub async fn delete(&self, target: impl Into<DeleteTarget>) -> ClientResult<Vec<CustomerId>> {
        match target.into() {
            DeleteTarget::One(id) => Ok(vec![self.delete_one(id).await?]),
            DeleteTarget::Many(ids) => self.delete_many(&ids).await,
        }
    }

    /// `DELETE /{id}`.
    pub async fn delete_one(&self, id: CustomerId) -> ClientResult<CustomerId> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        Self::ensure_success(response).await?;
        Ok(id)
    }

    /// Issue one `DELETE` per id concurrently.
    ///
    /// Fails with the first error. Deletes that already completed are not
    /// rolled back.
    pub async fn delete_many(&self, ids: &[CustomerId]) -> ClientResult<Vec<CustomerId>> {
        try_join_all(ids.iter().map(|&id| self.delete_one(id))).await
    }

    // ---- private helpers ----

    fn record_url(&self, id: CustomerId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Map non-2xx responses to [`ClientError::Api`], preferring the
    /// server's `error` message over the raw body.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        tracing::debug!(status = status.as_u16(), %message, "Customer API request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
