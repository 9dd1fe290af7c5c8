pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod poller;
pub mod series;
pub mod summary;

pub use error::{DashboardError, FetchError, Result};
pub use poller::{Poller, RefreshOutcome, RefreshReport, ResourceStatus};
