//! Log records as delivered by the host pipeline, plus the environment
//! snapshot templates can read from.

mod context;
mod types;

pub use context::{EnvironmentSnapshot, RenderContext};
pub use types::{ContainerInfo, LogRecord, SourceStream};
