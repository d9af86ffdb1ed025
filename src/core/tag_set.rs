use crate::domain::ports::TagRegistry;
use crate::domain::tag::TagLinkSet;
use crate::utils::error::{Result, ZoneError};

/// Resolves every tag text (creating unknown tags) and appends the links that
/// are not in `current` yet. Existing entries keep their position.
pub async fn add_tags<R, S>(registry: &R, current: TagLinkSet, tag_texts: &[S]) -> Result<TagLinkSet>
where
    R: TagRegistry + ?Sized,
    S: AsRef<str>,
{
    let mut updated = current;
    for text in tag_texts {
        let text = text.as_ref();
        let link = registry
            .resolve_or_create(text)
            .await
            .map_err(|e| match e {
                ZoneError::TagResolutionFailure { .. } => e,
                other => ZoneError::TagResolutionFailure {
                    tag: text.to_string(),
                    message: other.to_string(),
                },
            })?;
        if updated.insert(link.clone()) {
            tracing::debug!("Added tag link {} for '{}'", link, text);
        }
    }
    Ok(updated)
}

/// Removes every occurrence of the links behind `tag_texts`.
///
/// Lookups never create tags. Text the registry does not know is skipped,
/// while transport failures still propagate.
pub async fn remove_tags<R, S>(
    registry: &R,
    current: TagLinkSet,
    tag_texts: &[S],
) -> Result<TagLinkSet>
where
    R: TagRegistry + ?Sized,
    S: AsRef<str>,
{
    let mut updated = current;
    for text in tag_texts {
        let text = text.as_ref();
        match registry.resolve_existing(text).await? {
            Some(link) => {
                let removed = updated.remove_all(&link);
                tracing::debug!("Removed {} occurrence(s) of {} for '{}'", removed, link, text);
            }
            None => tracing::debug!("Skipping unknown tag '{}'", text),
        }
    }
    Ok(updated)
}

/// Applies removals first, then additions.
pub async fn reconcile<R, S>(
    registry: &R,
    current: TagLinkSet,
    to_add: &[S],
    to_remove: &[S],
) -> Result<TagLinkSet>
where
    R: TagRegistry + ?Sized,
    S: AsRef<str>,
{
    let trimmed = remove_tags(registry, current, to_remove).await?;
    add_tags(registry, trimmed, to_add).await
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeRegistry;
    use super::*;

    fn set(links: &[&str]) -> TagLinkSet {
        TagLinkSet::from(links.iter().map(|l| l.to_string()).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_add_same_tag_twice_keeps_one() {
        let registry = FakeRegistry::with_tags(&[("env:prod", "/resources/tags/prod")]);
        let current = set(&["/resources/tags/a", "/resources/tags/b"]);

        let updated = add_tags(&registry, current, &["env:prod", "env:prod"])
            .await
            .unwrap();

        assert_eq!(
            updated.as_slice(),
            &["/resources/tags/a", "/resources/tags/b", "/resources/tags/prod"]
        );
    }

    #[tokio::test]
    async fn test_re_adding_existing_link_does_not_reorder() {
        let registry = FakeRegistry::with_tags(&[("env:prod", "/resources/tags/prod")]);
        let current = set(&["/resources/tags/prod", "/resources/tags/b"]);

        let updated = add_tags(&registry, current, &["env:prod"]).await.unwrap();

        assert_eq!(updated.as_slice(), &["/resources/tags/prod", "/resources/tags/b"]);
    }

    #[tokio::test]
    async fn test_add_creates_unknown_tags() {
        let registry = FakeRegistry::default();

        let updated = add_tags(&registry, TagLinkSet::new(), &["team:x"]).await.unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(registry.known(), 1);
    }

    #[tokio::test]
    async fn test_add_wraps_registry_failure() {
        let registry = FakeRegistry::default().failing_on("env:bad");

        let err = add_tags(&registry, TagLinkSet::new(), &["env:ok", "env:bad"])
            .await
            .unwrap_err();

        match err {
            ZoneError::TagResolutionFailure { tag, message } => {
                assert_eq!(tag, "env:bad");
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_missing_tag_is_noop() {
        let registry = FakeRegistry::with_tags(&[("env:prod", "/resources/tags/prod")]);
        let current = set(&["/resources/tags/a"]);

        let updated = remove_tags(&registry, current.clone(), &["env:prod", "never:seen"])
            .await
            .unwrap();

        assert_eq!(updated, current);
        assert_eq!(registry.known(), 1);
    }

    #[tokio::test]
    async fn test_remove_same_tag_listed_twice() {
        let registry = FakeRegistry::with_tags(&[("env:prod", "/resources/tags/prod")]);
        let current = set(&["/resources/tags/a", "/resources/tags/prod", "/resources/tags/c"]);

        let updated = remove_tags(&registry, current, &["env:prod", "env:prod"])
            .await
            .unwrap();

        assert_eq!(updated.as_slice(), &["/resources/tags/a", "/resources/tags/c"]);
    }

    #[tokio::test]
    async fn test_reconcile_removes_before_adding() {
        let registry = FakeRegistry::with_tags(&[("env:prod", "/resources/tags/prod")]);
        let current = set(&["/resources/tags/prod", "/resources/tags/b"]);

        // Removal runs first, so the re-added link moves to the end.
        let updated = reconcile(&registry, current, &["env:prod"], &["env:prod"])
            .await
            .unwrap();

        assert_eq!(updated.as_slice(), &["/resources/tags/b", "/resources/tags/prod"]);
    }
}
