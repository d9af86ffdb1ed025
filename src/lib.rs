pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, ZoneCommand};

pub use adapters::{HttpTransport, StoreTagRegistry};
pub use config::ClientSettings;
pub use core::mutator::{NewZone, ZoneEdit};
pub use core::service::PlacementZoneService;
pub use domain::model::{EpzSlot, EpzState, PlacementZone, PlacementZoneList, ResourcePoolState};
pub use utils::error::{Result, ZoneError};
