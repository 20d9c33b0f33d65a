pub mod config;
pub mod error;
pub mod taxonomy;
pub mod types;

pub use config::{CapifyConfig, Credential};
pub use error::{CapifyError, Result};
pub use taxonomy::Taxonomy;
pub use types::*;
