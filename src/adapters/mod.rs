// Adapters layer: concrete implementations of the domain ports (HTTP transport, tag registry).

pub mod http;
pub mod tag_registry;

pub use http::HttpTransport;
pub use tag_registry::StoreTagRegistry;
