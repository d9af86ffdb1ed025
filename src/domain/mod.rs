// Domain layer: zone documents, tags and the ports to the store. No transport code here.

pub mod model;
pub mod ports;
pub mod properties;
pub mod tag;
