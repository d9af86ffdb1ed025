use crate::core::tag_set::{add_tags, reconcile};
use crate::domain::model::{zone_link, EpzSlot, EpzState, PlacementZone, ResourcePoolState};
use crate::domain::ports::TagRegistry;
use crate::domain::properties::ZoneProperties;
use crate::domain::tag::{Tag, TagAssignmentRequest, TagLinkSet};
use crate::utils::error::{Result, ZoneError};

/// What a user asked to change on an existing zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneEdit {
    pub new_name: Option<String>,
    pub tags_to_add: Vec<String>,
    pub tags_to_remove: Vec<String>,
    pub match_tags_to_add: Vec<String>,
    pub match_tags_to_remove: Vec<String>,
}

impl ZoneEdit {
    fn effective_name(&self) -> Option<&str> {
        self.new_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn touches_zone_tags(&self) -> bool {
        !self.tags_to_add.is_empty() || !self.tags_to_remove.is_empty()
    }

    pub fn touches_match_tags(&self) -> bool {
        !self.match_tags_to_add.is_empty() || !self.match_tags_to_remove.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.effective_name().is_none() && !self.touches_zone_tags() && !self.touches_match_tags()
    }
}

/// The two writes an edit turns into.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPlan {
    /// Full merged zone to PATCH. Its `tag_links` are the existing ones.
    pub zone: PlacementZone,
    /// Zone tag changes, sent separately to the tag assignment endpoint.
    pub tag_assignment: Option<TagAssignmentRequest>,
}

/// Input of a zone creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewZone {
    pub name: String,
    pub scheduler: bool,
    /// `key=value` entries.
    pub custom_properties: Vec<String>,
    pub tags: Vec<String>,
    pub match_tags: Vec<String>,
}

/// Merges `edit` into `existing`.
///
/// The rename and the EPZ match tags end up in the patch document. Zone tags
/// are never written into the patch; they become a [`TagAssignmentRequest`]
/// when there is anything to assign or unassign.
pub async fn apply_edit<R>(registry: &R, existing: PlacementZone, edit: &ZoneEdit) -> Result<EditPlan>
where
    R: TagRegistry + ?Sized,
{
    let mut zone = existing;

    if let Some(name) = edit.effective_name() {
        tracing::debug!("Renaming '{}' to '{}'", zone.resource_pool_state.name, name);
        zone.resource_pool_state.name = name.to_string();
    }

    if edit.touches_match_tags() {
        let mut epz = std::mem::take(&mut zone.epz_state).into_state();
        epz.tag_links_to_match = reconcile(
            registry,
            epz.tag_links_to_match,
            &edit.match_tags_to_add,
            &edit.match_tags_to_remove,
        )
        .await?;
        zone.epz_state = EpzSlot::from(epz);
    }

    let tag_assignment = if edit.touches_zone_tags() {
        let resource_link = pool_link(&zone.resource_pool_state)?;
        Some(build_tag_assignment(
            resource_link,
            &edit.tags_to_add,
            &edit.tags_to_remove,
        ))
    } else {
        None
    };

    Ok(EditPlan {
        zone,
        tag_assignment,
    })
}

fn pool_link(pool: &ResourcePoolState) -> Result<String> {
    match pool.document_self_link.as_deref() {
        Some(link) if !link.is_empty() => Ok(zone_link(link)),
        _ => Err(ZoneError::ValidationError {
            message: format!("placement zone '{}' has no document link", pool.name),
        }),
    }
}

/// Builds the tag assignment body. Text that does not parse as a tag is left out.
pub fn build_tag_assignment<S: AsRef<str>>(
    resource_link: String,
    to_assign: &[S],
    to_unassign: &[S],
) -> TagAssignmentRequest {
    TagAssignmentRequest {
        resource_link,
        tags_to_assign: parse_tags(to_assign),
        tags_to_unassign: parse_tags(to_unassign),
    }
}

fn parse_tags<S: AsRef<str>>(texts: &[S]) -> Vec<Tag> {
    texts
        .iter()
        .filter_map(|text| {
            let parsed = Tag::parse(text.as_ref());
            if parsed.is_none() {
                tracing::warn!("Ignoring malformed tag '{}'", text.as_ref());
            }
            parsed
        })
        .collect()
}

/// Composes the create payload for a new zone.
pub async fn build_create<R>(registry: &R, request: &NewZone) -> Result<PlacementZone>
where
    R: TagRegistry + ?Sized,
{
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ZoneError::ValidationError {
            message: "placement zone name must not be empty".to_string(),
        });
    }

    let mut custom_properties = ZoneProperties::from_user_entries(&request.custom_properties)?;
    custom_properties.set_scheduler(request.scheduler);

    let tag_links = add_tags(registry, TagLinkSet::new(), &request.tags).await?;
    let tag_links_to_match = add_tags(registry, TagLinkSet::new(), &request.match_tags).await?;

    Ok(PlacementZone {
        document_self_link: None,
        resource_pool_state: ResourcePoolState {
            name: name.to_string(),
            custom_properties,
            tag_links,
            ..Default::default()
        },
        epz_state: EpzSlot::from(EpzState {
            tag_links_to_match,
            ..Default::default()
        }),
    })
}
