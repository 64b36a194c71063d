pub mod agents;
pub mod analyze;
pub mod config;
pub mod error;
pub mod generate;
pub mod io;
pub mod manifest;
pub mod numbering;
pub mod paths;
pub mod project;
pub mod scan;
pub mod templates;
pub mod types;
pub mod validate;
pub mod writer;

pub use error::{ErrorKind, FlowError, Result};
