use crate::utils::error::{Result, ZoneError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RESERVED_PREFIX: &str = "__";
pub const AVAILABLE_MEMORY_KEY: &str = "__availableMemory";
pub const CPU_USAGE_KEY: &str = "__cpuUsage";
pub const PLACEMENT_ZONE_TYPE_KEY: &str = "__placementZoneType";
pub const SCHEDULER_ZONE_TYPE: &str = "SCHEDULER";

/// Values the server computes and writes under reserved keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemMetrics {
    pub available_memory: Option<String>,
    pub cpu_usage: Option<String>,
    pub placement_zone_type: Option<String>,
    /// Reserved keys this client does not interpret, carried through untouched.
    pub other: BTreeMap<String, Option<String>>,
}

/// Typed view of a resource pool's `customProperties`.
///
/// The wire format is a single flat string map. Keys with the reserved `__`
/// prefix belong to the server and land in [`SystemMetrics`]; everything else
/// is a user property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeMap<String, Option<String>>>",
    into = "BTreeMap<String, Option<String>>"
)]
pub struct ZoneProperties {
    pub system: SystemMetrics,
    pub user: BTreeMap<String, Option<String>>,
}

impl ZoneProperties {
    /// Builds properties from `key=value` entries supplied by a user.
    ///
    /// Reserved keys are rejected since they would masquerade as system data.
    pub fn from_user_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = ZoneProperties::default();
        for entry in entries {
            let entry = entry.as_ref();
            let (key, value) = entry.split_once('=').ok_or_else(|| ZoneError::ValidationError {
                message: format!("custom property '{}' must be written as key=value", entry),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ZoneError::ValidationError {
                    message: format!("custom property '{}' has an empty key", entry),
                });
            }
            if key.starts_with(RESERVED_PREFIX) {
                return Err(ZoneError::ValidationError {
                    message: format!(
                        "custom property key '{}' uses the reserved '{}' prefix",
                        key, RESERVED_PREFIX
                    ),
                });
            }
            properties
                .user
                .insert(key.to_string(), Some(value.trim().to_string()));
        }
        Ok(properties)
    }

    /// Marks the zone as a scheduler placement zone.
    ///
    /// There is no way to clear the marker here; `false` leaves it as it is.
    pub fn set_scheduler(&mut self, is_scheduler: bool) {
        if is_scheduler {
            self.system.placement_zone_type = Some(SCHEDULER_ZONE_TYPE.to_string());
        }
    }

    pub fn is_scheduler(&self) -> bool {
        self.system.placement_zone_type.as_deref() == Some(SCHEDULER_ZONE_TYPE)
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty()
            && self.system.available_memory.is_none()
            && self.system.cpu_usage.is_none()
            && self.system.placement_zone_type.is_none()
            && self.system.other.is_empty()
    }
}

impl From<BTreeMap<String, Option<String>>> for ZoneProperties {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        let mut properties = ZoneProperties::default();
        for (key, value) in raw {
            match key.as_str() {
                AVAILABLE_MEMORY_KEY => properties.system.available_memory = value,
                CPU_USAGE_KEY => properties.system.cpu_usage = value,
                PLACEMENT_ZONE_TYPE_KEY => properties.system.placement_zone_type = value,
                k if k.starts_with(RESERVED_PREFIX) => {
                    properties.system.other.insert(key, value);
                }
                _ => {
                    properties.user.insert(key, value);
                }
            }
        }
        properties
    }
}

impl From<Option<BTreeMap<String, Option<String>>>> for ZoneProperties {
    fn from(raw: Option<BTreeMap<String, Option<String>>>) -> Self {
        raw.map(ZoneProperties::from).unwrap_or_default()
    }
}

impl From<ZoneProperties> for BTreeMap<String, Option<String>> {
    fn from(properties: ZoneProperties) -> Self {
        let ZoneProperties { system, mut user } = properties;
        let reserved = [
            (AVAILABLE_MEMORY_KEY, system.available_memory),
            (CPU_USAGE_KEY, system.cpu_usage),
            (PLACEMENT_ZONE_TYPE_KEY, system.placement_zone_type),
        ];
        for (key, value) in reserved {
            if value.is_some() {
                user.insert(key.to_string(), value);
            }
        }
        user.extend(system.other);
        user
    }
}
