use crate::domain::ports::{StoreRequest, TagRegistry, Transport};
use crate::domain::tag::{Tag, TAGS_PATH};
use crate::utils::error::{Result, ZoneError};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagPage {
    #[serde(default)]
    document_links: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagDocument {
    #[serde(default)]
    document_self_link: Option<String>,
}

/// [`TagRegistry`] on top of the store's tag collection.
#[derive(Debug, Clone)]
pub struct StoreTagRegistry<T: Transport> {
    transport: T,
}

impl<T: Transport> StoreTagRegistry<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn find(&self, tag: &Tag) -> Result<Option<String>> {
        let request = StoreRequest::get(TAGS_PATH)
            .with_query("expand", "true")
            .with_query("$filter", tag.store_filter());
        let page: TagPage = self.transport.execute(request).await?.json()?;
        Ok(page
            .document_links
            .unwrap_or_default()
            .into_iter()
            .find(|link| !link.is_empty()))
    }
}

#[async_trait]
impl<T: Transport> TagRegistry for StoreTagRegistry<T> {
    async fn resolve_or_create(&self, tag_text: &str) -> Result<String> {
        let tag = Tag::parse(tag_text).ok_or_else(|| ZoneError::TagResolutionFailure {
            tag: tag_text.to_string(),
            message: "expected key:value".to_string(),
        })?;

        if let Some(link) = self.find(&tag).await? {
            return Ok(link);
        }

        let created: TagDocument = self
            .transport
            .execute(StoreRequest::post(TAGS_PATH, &tag)?)
            .await?
            .json()?;
        let link = created
            .document_self_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| ZoneError::TagResolutionFailure {
                tag: tag_text.to_string(),
                message: "tag service returned no document link".to_string(),
            })?;
        tracing::debug!("Created tag {} as {}", tag, link);
        Ok(link)
    }

    async fn resolve_existing(&self, tag_text: &str) -> Result<Option<String>> {
        match Tag::parse(tag_text) {
            Some(tag) => self.find(&tag).await,
            None => Ok(None),
        }
    }

    async fn describe(&self, tag_link: &str) -> Result<Option<Tag>> {
        match self.transport.execute(StoreRequest::get(tag_link)).await {
            Ok(response) => response.json().map(Some),
            Err(ZoneError::RemoteStatus { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
