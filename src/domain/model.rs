use crate::domain::properties::ZoneProperties;
use crate::domain::tag::TagLinkSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

pub const RESOURCE_POOLS_PATH: &str = "/resources/pools/";
pub const PLACEMENT_ZONES_PATH: &str = "/resources/elastic-placement-zones-config";
pub const TAG_ASSIGNMENT_PATH: &str = "/tag-assignment";

/// Short ID of a resource pool link: the part after `/resources/pools/`.
pub fn zone_id_from_link(link: &str) -> &str {
    link.strip_prefix(RESOURCE_POOLS_PATH).unwrap_or(link)
}

pub fn zone_link(id: &str) -> String {
    if id.starts_with(RESOURCE_POOLS_PATH) {
        id.to_string()
    } else {
        format!("{}{}", RESOURCE_POOLS_PATH, id)
    }
}

/// Path of the placement zone config document that wraps a pool link.
pub fn zone_config_path(pool_link: &str) -> String {
    format!("{}{}", PLACEMENT_ZONES_PATH, pool_link)
}

pub fn link_filter(link: &str) -> String {
    format!("documentSelfLink eq '{}'", link.replace('\'', "''"))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_cpu_count: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_memory_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePoolState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_self_link: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub capacity: Capacity,
    #[serde(default, skip_serializing_if = "ZoneProperties::is_empty")]
    pub custom_properties: ZoneProperties,
    #[serde(default)]
    pub tag_links: TagLinkSet,
}

impl ResourcePoolState {
    pub fn id(&self) -> &str {
        self.document_self_link
            .as_deref()
            .map(zone_id_from_link)
            .unwrap_or_default()
    }
}

/// Elastic placement zone: the tag rule that pulls matching hosts into a pool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpzState {
    #[serde(default)]
    pub document_self_link: Option<String>,
    #[serde(default)]
    pub resource_pool_link: Option<String>,
    #[serde(default)]
    pub tag_links_to_match: TagLinkSet,
}

impl EpzState {
    /// No match tags, no pool back-link and no identity of its own.
    pub fn is_logically_absent(&self) -> bool {
        self.tag_links_to_match.is_empty()
            && self.document_self_link.as_deref().unwrap_or_default().is_empty()
            && self.resource_pool_link.as_deref().unwrap_or_default().is_empty()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EpzStateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    document_self_link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_pool_link: Option<&'a str>,
    tag_links_to_match: &'a TagLinkSet,
}

impl Serialize for EpzState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_logically_absent() {
            return serializer.serialize_none();
        }
        EpzStateBody {
            document_self_link: self.document_self_link.as_deref(),
            resource_pool_link: self.resource_pool_link.as_deref(),
            tag_links_to_match: &self.tag_links_to_match,
        }
        .serialize(serializer)
    }
}

/// The optional EPZ half of a placement zone.
///
/// Build it with [`EpzSlot::from`] so that a logically absent state becomes
/// `Absent` up front. `Absent` goes over the wire as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EpzSlot {
    Present(EpzState),
    #[default]
    Absent,
}

impl EpzSlot {
    pub fn as_state(&self) -> Option<&EpzState> {
        match self {
            EpzSlot::Present(state) => Some(state),
            EpzSlot::Absent => None,
        }
    }

    /// The state to edit, starting from an empty one when absent.
    pub fn into_state(self) -> EpzState {
        match self {
            EpzSlot::Present(state) => state,
            EpzSlot::Absent => EpzState::default(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, EpzSlot::Absent)
    }

    pub fn tag_links_to_match(&self) -> Option<&TagLinkSet> {
        self.as_state().map(|state| &state.tag_links_to_match)
    }
}

impl From<EpzState> for EpzSlot {
    fn from(state: EpzState) -> Self {
        if state.is_logically_absent() {
            EpzSlot::Absent
        } else {
            EpzSlot::Present(state)
        }
    }
}

impl From<Option<EpzState>> for EpzSlot {
    fn from(state: Option<EpzState>) -> Self {
        state.map(EpzSlot::from).unwrap_or_default()
    }
}

impl Serialize for EpzSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EpzSlot::Present(state) => state.serialize(serializer),
            EpzSlot::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for EpzSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<EpzState>::deserialize(deserializer).map(EpzSlot::from)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_self_link: Option<String>,
    #[serde(default)]
    pub resource_pool_state: ResourcePoolState,
    #[serde(default)]
    pub epz_state: EpzSlot,
}

impl PlacementZone {
    /// Zone identity is the resource pool's ID, with the config document's
    /// own link as a fallback for partially populated payloads.
    pub fn id(&self) -> &str {
        let id = self.resource_pool_state.id();
        if !id.is_empty() {
            return id;
        }
        self.document_self_link
            .as_deref()
            .map(zone_id_from_link)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.resource_pool_state.name
    }
}

/// One page of placement zones. `document_links` decides the order; the
/// `documents` map is only ever used for lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementZoneList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: HashMap<String, PlacementZone>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_links: Vec<String>,
}

impl PlacementZoneList {
    pub fn len(&self) -> usize {
        self.document_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_links.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlacementZone> {
        self.document_links
            .get(index)
            .and_then(|link| self.documents.get(link))
    }

    /// Zones in `document_links` order, paired with their document link.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlacementZone)> {
        self.document_links.iter().filter_map(|link| {
            self.documents
                .get(link)
                .map(|zone| (link.as_str(), zone))
        })
    }
}
