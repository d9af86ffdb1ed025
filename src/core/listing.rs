use crate::domain::model::PlacementZoneList;
use crate::domain::ports::TagRegistry;
use crate::domain::tag::TagLinkSet;
use crate::utils::error::Result;

pub const NO_ELEMENTS_FOUND: &str = "No elements found.";
const HEADER: &str = "ID\tNAME\tMEMORY\tCPU\tTAGS";

/// Renders a zone page as a tab separated table, one row per document link.
pub async fn render<R>(list: &PlacementZoneList, registry: &R) -> Result<String>
where
    R: TagRegistry + ?Sized,
{
    if list.is_empty() {
        return Ok(NO_ELEMENTS_FOUND.to_string());
    }

    let mut lines = vec![HEADER.to_string()];
    for (_, zone) in list.iter() {
        let pool = &zone.resource_pool_state;
        let row = [
            zone.id().to_string(),
            pool.name.clone(),
            pool.used_memory_percent()?,
            pool.used_cpu_percent(),
            tags_to_string(registry, &pool.tag_links).await?,
        ];
        lines.push(row.join("\t"));
    }
    Ok(lines.join("\n").trim().to_string())
}

/// `key:value` text of each link, falling back to the raw link for tags the
/// registry no longer knows.
pub async fn tags_to_string<R>(registry: &R, links: &TagLinkSet) -> Result<String>
where
    R: TagRegistry + ?Sized,
{
    let mut rendered = Vec::with_capacity(links.len());
    for link in links {
        match registry.describe(link).await? {
            Some(tag) => rendered.push(tag.to_string()),
            None => rendered.push(link.clone()),
        }
    }
    Ok(rendered.join(", "))
}
