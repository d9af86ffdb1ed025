use crate::domain::tag::Tag;
use crate::utils::error::{Result, ZoneError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against the document store, addressed by path relative to the
/// server's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl StoreRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Post, path).with_body(serde_json::to_value(body)?))
    }

    pub fn patch<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Patch, path).with_body(serde_json::to_value(body)?))
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: String,
}

impl StoreResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(ZoneError::SerializationError)
    }
}

/// Connection settings the HTTP transport needs.
pub trait ConfigProvider: Send + Sync {
    fn server_url(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}

/// Executes store requests. Implementations return `Err` for transport
/// failures and for any non-success status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: StoreRequest) -> Result<StoreResponse>;
}

/// Maps tag text to tag document links.
#[async_trait]
pub trait TagRegistry: Send + Sync {
    /// Resolves `key:value` text to a tag link, creating the tag if the
    /// registry does not know it yet.
    async fn resolve_or_create(&self, tag_text: &str) -> Result<String>;

    /// Resolves `key:value` text to an existing tag link without creating
    /// anything. Unknown or unparsable text yields `None`.
    async fn resolve_existing(&self, tag_text: &str) -> Result<Option<String>>;

    /// Reads the tag behind a link, `None` when the registry has no such tag.
    async fn describe(&self, tag_link: &str) -> Result<Option<Tag>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: StoreRequest) -> Result<StoreResponse> {
        (**self).execute(request).await
    }
}
