use crate::domain::ports::{ConfigProvider, Method, StoreRequest, StoreResponse, Transport};
use crate::utils::error::{Result, ZoneError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const AUTH_TOKEN_HEADER: &str = "x-xenon-auth-token";

/// [`Transport`] over HTTP. Paths are appended to the base URL's own path.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.server_url()).map_err(|e| {
            ZoneError::InvalidConfigValueError {
                field: "server.url".to_string(),
                value: config.server_url().to_string(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token().map(str::to_string),
        })
    }

    fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: StoreRequest) -> Result<StoreResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(to_reqwest(request.method), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.auth_token {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!("📡 {} {}", request.method, url);
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📡 {} {} -> {}", request.method, request.path, status);

        if !status.is_success() {
            tracing::error!("❌ {} {} failed with status {}", request.method, request.path, status);
            return Err(ZoneError::RemoteStatus {
                method: request.method.to_string(),
                path: request.path,
                status: status.as_u16(),
                body,
            });
        }

        Ok(StoreResponse::new(status.as_u16(), body))
    }
}
