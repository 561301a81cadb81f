pub mod adapter;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod logging;
pub mod record;
pub mod slack;
pub mod template;

pub use adapter::{NotificationAdapter, RecordOutcome, RunSummary};
pub use error::{ForwarderError, Result};
