mod api;
pub use api::router;

mod locks;

mod metrics;
pub use metrics::{LatencySnapshot, MetricsSnapshot};

mod service;
pub use service::{now_ms, Service, ServiceConfig};

mod store;
pub use store::Records;
