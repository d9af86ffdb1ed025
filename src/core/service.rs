use crate::core::listing;
use crate::core::mutator::{apply_edit, build_create, NewZone, ZoneEdit};
use crate::core::resolver::resolve_in;
use crate::domain::model::{
    link_filter, zone_config_path, zone_id_from_link, PlacementZone, PlacementZoneList,
    ResourcePoolState, PLACEMENT_ZONES_PATH, TAG_ASSIGNMENT_PATH,
};
use crate::domain::ports::{StoreRequest, TagRegistry, Transport};
use crate::utils::error::{Result, ZoneError};

/// Placement zone operations against the document store.
///
/// Every operation runs its requests one after another and stops at the first
/// failure. Nothing is rolled back: writes that already landed stay.
pub struct PlacementZoneService<T: Transport, R: TagRegistry> {
    transport: T,
    registry: R,
}

impl<T: Transport, R: TagRegistry> PlacementZoneService<T, R> {
    pub fn new(transport: T, registry: R) -> Self {
        Self {
            transport,
            registry,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn zone_query() -> StoreRequest {
        StoreRequest::get(PLACEMENT_ZONES_PATH).with_query("expand", "true")
    }

    pub async fn list(&self) -> Result<PlacementZoneList> {
        let response = self.transport.execute(Self::zone_query()).await?;
        let list: PlacementZoneList = response.json()?;
        tracing::debug!(
            "📡 Fetched {} placement zones (total {})",
            list.len(),
            list.total_count
        );
        Ok(list)
    }

    /// Maps an ID, ID prefix or unique name to the zone's pool link.
    pub async fn resolve(&self, identifier: &str) -> Result<String> {
        let list = self.list().await?;
        let link = resolve_in(&list, identifier)?;
        tracing::debug!("Resolved '{}' to {}", identifier, link);
        Ok(link)
    }

    pub async fn get(&self, identifier: &str) -> Result<PlacementZone> {
        let link = self.resolve(identifier).await?;
        self.fetch(&link).await
    }

    async fn fetch(&self, link: &str) -> Result<PlacementZone> {
        let request = Self::zone_query().with_query("$filter", link_filter(link));
        let page: PlacementZoneList = self.transport.execute(request).await?.json()?;
        let zone = page.iter().next().map(|(_, zone)| zone.clone());
        zone.ok_or_else(|| ZoneError::NotFound {
            identifier: zone_id_from_link(link).to_string(),
        })
    }

    /// Name of the resource pool stored at `link`.
    pub async fn get_name(&self, link: &str) -> Result<String> {
        let pool: ResourcePoolState = self
            .transport
            .execute(StoreRequest::get(link))
            .await?
            .json()?;
        Ok(pool.name)
    }

    /// Creates a zone and returns its ID.
    pub async fn create(&self, request: &NewZone) -> Result<String> {
        let payload = build_create(&self.registry, request).await?;
        tracing::info!("Creating placement zone '{}'", payload.name());

        let created: PlacementZone = self
            .transport
            .execute(StoreRequest::post(PLACEMENT_ZONES_PATH, &payload)?)
            .await?
            .json()?;

        let id = created.id();
        if id.is_empty() {
            return Err(ZoneError::ValidationError {
                message: "server response carries no placement zone link".to_string(),
            });
        }
        tracing::info!("✅ Created placement zone {}", id);
        Ok(id.to_string())
    }

    /// Applies `edit` to the zone behind `identifier` and returns its ID.
    ///
    /// This is two separate writes: a PATCH of the zone document, then, when
    /// zone tags change, a POST to the tag assignment endpoint. They are not
    /// atomic. If the tag assignment fails the patch has already been stored
    /// and the returned error does not say so.
    pub async fn edit(&self, identifier: &str, edit: &ZoneEdit) -> Result<String> {
        let link = self.resolve(identifier).await?;
        let existing = self.fetch(&link).await?;
        let plan = apply_edit(&self.registry, existing, edit).await?;

        self.transport
            .execute(StoreRequest::patch(zone_config_path(&link), &plan.zone)?)
            .await?;
        tracing::info!("Patched placement zone {}", link);

        if let Some(assignment) = &plan.tag_assignment {
            self.transport
                .execute(StoreRequest::post(TAG_ASSIGNMENT_PATH, assignment)?)
                .await?;
            tracing::info!(
                "Updated tags of {} (+{} / -{})",
                link,
                assignment.tags_to_assign.len(),
                assignment.tags_to_unassign.len()
            );
        }

        Ok(zone_id_from_link(&link).to_string())
    }

    /// Deletes the zone behind `identifier` and returns its ID.
    pub async fn remove(&self, identifier: &str) -> Result<String> {
        let link = self.resolve(identifier).await?;
        self.transport.execute(StoreRequest::delete(&link)).await?;
        tracing::info!("🗑️ Removed placement zone {}", link);
        Ok(zone_id_from_link(&link).to_string())
    }

    pub async fn render_list(&self, list: &PlacementZoneList) -> Result<String> {
        listing::render(list, &self.registry).await
    }
}
