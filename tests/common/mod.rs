#![allow(dead_code)]

use async_trait::async_trait;
use placement_zones::domain::model::{
    link_filter, EpzSlot, PlacementZone, PlacementZoneList, PLACEMENT_ZONES_PATH,
    RESOURCE_POOLS_PATH, TAG_ASSIGNMENT_PATH,
};
use placement_zones::domain::ports::{Method, StoreRequest, StoreResponse, Transport};
use placement_zones::domain::tag::{Tag, TagAssignmentRequest, TAGS_PATH};
use placement_zones::{Result, ZoneError};
use serde_json::json;
use std::sync::Mutex;

#[derive(Default)]
struct StoreState {
    zones: Vec<(String, PlacementZone)>,
    tags: Vec<(String, Tag)>,
    next_zone: usize,
    calls: Vec<(Method, String)>,
    fail_on: Option<(Method, String)>,
}

/// Document store held in memory, answering the same paths the real server does.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

fn remote(method: Method, path: &str, status: u16, body: &str) -> ZoneError {
    ZoneError::RemoteStatus {
        method: method.to_string(),
        path: path.to_string(),
        status,
        body: body.to_string(),
    }
}

fn ok(body: serde_json::Value) -> Result<StoreResponse> {
    Ok(StoreResponse::new(200, body.to_string()))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next matching request fail with a 500.
    pub fn fail_on(&self, method: Method, path: &str) {
        self.state.lock().unwrap().fail_on = Some((method, path.to_string()));
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn zone(&self, id: &str) -> Option<PlacementZone> {
        let link = format!("{}{}", RESOURCE_POOLS_PATH, id);
        let state = self.state.lock().unwrap();
        state
            .zones
            .iter()
            .find(|(l, _)| *l == link)
            .map(|(_, zone)| zone.clone())
    }

    pub fn tag_link(&self, text: &str) -> Option<String> {
        let tag = Tag::parse(text)?;
        let state = self.state.lock().unwrap();
        state
            .tags
            .iter()
            .find(|(_, t)| *t == tag)
            .map(|(link, _)| link.clone())
    }

    pub fn tag_count(&self) -> usize {
        self.state.lock().unwrap().tags.len()
    }

    /// Seeds a zone with a fixed ID.
    pub fn insert_zone(&self, id: &str, name: &str) {
        let link = format!("{}{}", RESOURCE_POOLS_PATH, id);
        let mut zone = PlacementZone::default();
        zone.document_self_link = Some(format!("{}{}", PLACEMENT_ZONES_PATH, link));
        zone.resource_pool_state.document_self_link = Some(link.clone());
        zone.resource_pool_state.name = name.to_string();
        self.state.lock().unwrap().zones.push((link, zone));
    }

    fn page(zones: &[(String, PlacementZone)]) -> serde_json::Value {
        let mut list = PlacementZoneList::default();
        for (link, zone) in zones {
            list.document_links.push(link.clone());
            list.documents.insert(link.clone(), zone.clone());
        }
        list.total_count = zones.len() as i64;
        serde_json::to_value(list).unwrap()
    }

    fn find_or_create_tag(state: &mut StoreState, tag: &Tag) -> String {
        if let Some((link, _)) = state.tags.iter().find(|(_, t)| t == tag) {
            return link.clone();
        }
        let link = format!("{}/tag-{}", TAGS_PATH, state.tags.len() + 1);
        state.tags.push((link.clone(), tag.clone()));
        link
    }

    fn handle(state: &mut StoreState, request: &StoreRequest) -> Result<StoreResponse> {
        let path = request.path.as_str();
        match (request.method, path) {
            (Method::Get, PLACEMENT_ZONES_PATH) => match request.query_value("$filter") {
                Some(filter) => {
                    let matching: Vec<_> = state
                        .zones
                        .iter()
                        .filter(|(link, _)| link_filter(link) == filter)
                        .cloned()
                        .collect();
                    ok(Self::page(&matching))
                }
                None => ok(Self::page(&state.zones)),
            },
            (Method::Post, PLACEMENT_ZONES_PATH) => {
                let mut zone: PlacementZone =
                    serde_json::from_value(request.body.clone().unwrap_or_default())?;
                state.next_zone += 1;
                let id = format!("zone-{:04}", state.next_zone);
                let link = format!("{}{}", RESOURCE_POOLS_PATH, id);
                zone.document_self_link = Some(format!("{}{}", PLACEMENT_ZONES_PATH, link));
                zone.resource_pool_state.document_self_link = Some(link.clone());
                if let EpzSlot::Present(epz) = &mut zone.epz_state {
                    epz.document_self_link = Some(format!("/resources/epz/{}", id));
                    epz.resource_pool_link = Some(link.clone());
                }
                state.zones.push((link, zone.clone()));
                ok(serde_json::to_value(zone)?)
            }
            (Method::Patch, p) if p.starts_with(PLACEMENT_ZONES_PATH) => {
                let link = &p[PLACEMENT_ZONES_PATH.len()..];
                let patch: PlacementZone =
                    serde_json::from_value(request.body.clone().unwrap_or_default())?;
                let (_, zone) = state
                    .zones
                    .iter_mut()
                    .find(|(l, _)| l == link)
                    .ok_or_else(|| remote(request.method, p, 404, "no such zone"))?;
                zone.resource_pool_state.name = patch.resource_pool_state.name;
                zone.resource_pool_state.custom_properties =
                    patch.resource_pool_state.custom_properties;
                zone.resource_pool_state.tag_links = patch.resource_pool_state.tag_links;
                zone.epz_state = patch.epz_state;
                ok(serde_json::to_value(zone.clone())?)
            }
            (Method::Delete, p) if p.starts_with(RESOURCE_POOLS_PATH) => {
                let before = state.zones.len();
                state.zones.retain(|(l, _)| l != p);
                if state.zones.len() == before {
                    return Err(remote(request.method, p, 404, "no such pool"));
                }
                ok(json!({}))
            }
            (Method::Get, p) if p.starts_with(RESOURCE_POOLS_PATH) => state
                .zones
                .iter()
                .find(|(l, _)| l == p)
                .map(|(_, zone)| ok(serde_json::to_value(&zone.resource_pool_state)?))
                .unwrap_or_else(|| Err(remote(request.method, p, 404, "no such pool"))),
            (Method::Get, TAGS_PATH) => {
                let filter = request.query_value("$filter").unwrap_or_default();
                let links: Vec<&String> = state
                    .tags
                    .iter()
                    .filter(|(_, tag)| tag.store_filter() == filter)
                    .map(|(link, _)| link)
                    .collect();
                ok(json!({ "totalCount": links.len(), "documentLinks": links }))
            }
            (Method::Post, TAGS_PATH) => {
                let tag: Tag = serde_json::from_value(request.body.clone().unwrap_or_default())?;
                let link = Self::find_or_create_tag(state, &tag);
                ok(json!({ "documentSelfLink": link, "key": tag.key, "value": tag.value }))
            }
            (Method::Get, p) if p.starts_with(TAGS_PATH) => state
                .tags
                .iter()
                .find(|(link, _)| link == p)
                .map(|(link, tag)| {
                    ok(json!({ "documentSelfLink": link, "key": tag.key, "value": tag.value }))
                })
                .unwrap_or_else(|| Err(remote(request.method, p, 404, "no such tag"))),
            (Method::Post, TAG_ASSIGNMENT_PATH) => {
                let assignment: TagAssignmentRequest =
                    serde_json::from_value(request.body.clone().unwrap_or_default())?;
                let unassign: Vec<String> = assignment
                    .tags_to_unassign
                    .iter()
                    .filter_map(|tag| {
                        state
                            .tags
                            .iter()
                            .find(|(_, t)| t == tag)
                            .map(|(link, _)| link.clone())
                    })
                    .collect();
                let assign: Vec<String> = assignment
                    .tags_to_assign
                    .iter()
                    .map(|tag| Self::find_or_create_tag(state, tag))
                    .collect();
                let (_, zone) = state
                    .zones
                    .iter_mut()
                    .find(|(l, _)| *l == assignment.resource_link)
                    .ok_or_else(|| remote(request.method, path, 404, "no such resource"))?;
                for link in &unassign {
                    zone.resource_pool_state.tag_links.remove_all(link);
                }
                for link in assign {
                    zone.resource_pool_state.tag_links.insert(link);
                }
                ok(json!({}))
            }
            _ => Err(remote(request.method, path, 404, "unknown path")),
        }
    }
}

#[async_trait]
impl Transport for InMemoryStore {
    async fn execute(&self, request: StoreRequest) -> Result<StoreResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((request.method, request.path.clone()));
        if let Some((method, path)) = &state.fail_on {
            if *method == request.method && *path == request.path {
                state.fail_on = None;
                return Err(remote(request.method, &request.path, 500, "injected failure"));
            }
        }
        Self::handle(&mut state, &request)
    }
}
