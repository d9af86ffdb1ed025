use crate::domain::model::{zone_id_from_link, PlacementZoneList};
use crate::utils::error::{Result, ZoneError};

/// Picks the one zone link `identifier` refers to within `list`.
///
/// Matching goes, in order: exact ID, unique ID prefix, unique name. Several
/// prefix or name matches are ambiguous; the caller has to pass a full ID.
pub fn resolve_in(list: &PlacementZoneList, identifier: &str) -> Result<String> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ZoneError::ValidationError {
            message: "placement zone ID or name must not be empty".to_string(),
        });
    }
    let wanted = zone_id_from_link(identifier);
    if wanted.is_empty() {
        return Err(ZoneError::ValidationError {
            message: format!("'{}' does not name a placement zone ID", identifier),
        });
    }

    let entries: Vec<(&str, &str, &str)> = list
        .iter()
        .map(|(link, zone)| {
            let id = match zone.id() {
                "" => zone_id_from_link(link),
                id => id,
            };
            (link, id, zone.name())
        })
        .collect();

    if let Some((link, _, _)) = entries.iter().find(|(_, id, _)| *id == wanted) {
        return Ok(link.to_string());
    }

    let by_prefix: Vec<_> = entries
        .iter()
        .filter(|(_, id, _)| id.starts_with(wanted))
        .collect();
    match by_prefix.as_slice() {
        [(link, _, _)] => return Ok(link.to_string()),
        [] => {}
        many => {
            return Err(ZoneError::AmbiguousIdentifier {
                identifier: identifier.to_string(),
                candidates: many.iter().map(|(_, id, _)| id.to_string()).collect(),
            })
        }
    }

    let by_name: Vec<_> = entries
        .iter()
        .filter(|(_, _, name)| *name == identifier)
        .collect();
    match by_name.as_slice() {
        [(link, _, _)] => Ok(link.to_string()),
        [] => Err(ZoneError::NotFound {
            identifier: identifier.to_string(),
        }),
        many => Err(ZoneError::AmbiguousIdentifier {
            identifier: identifier.to_string(),
            candidates: many.iter().map(|(_, id, _)| id.to_string()).collect(),
        }),
    }
}
