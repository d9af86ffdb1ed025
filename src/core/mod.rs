pub mod listing;
pub mod metrics;
pub mod mutator;
pub mod resolver;
pub mod service;
pub mod tag_set;

pub use crate::domain::model::{EpzSlot, EpzState, PlacementZone, PlacementZoneList, ResourcePoolState};
pub use crate::domain::ports::{ConfigProvider, TagRegistry, Transport};
pub use crate::utils::error::Result;
