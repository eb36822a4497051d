// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod metrics;

pub use health::health_check;
pub use metrics::metrics_handler;
