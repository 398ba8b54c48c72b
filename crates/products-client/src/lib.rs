use std::time::Duration;

use anyhow::Context;
use products_types::domain::product::Product;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct ProductsClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct ProductsClient {
    base: Url,
    client: reqwest::Client,
}

/// Non-2xx answer from the server, with its `error` message when it sent one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn check(res: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    tracing::debug!(%status, %message, "request rejected by server");
    Err(ApiError { status, message }.into())
}

impl ProductsClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<ProductsClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(ProductsClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> anyhow::Result<Product> {
        let res = self
            .client
            .post(self.url("api/products")?)
            .json(&req)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let res = self.client.get(self.url("api/products")?).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn health(&self) -> anyhow::Result<HealthResponse> {
        let res = self.client.get(self.url("api/health")?).send().await?;
        Ok(check(res).await?.json().await?)
    }
}

impl ProductsClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<ProductsClient> {
        if let Some(client) = self.client {
            return Ok(ProductsClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(ProductsClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub ok: bool,
}
