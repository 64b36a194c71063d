pub mod agents;
pub mod analyze;
pub mod config;
pub mod context;
pub mod create;
pub mod info;
pub mod init;
pub mod list;
pub mod mcp;
pub mod status;
pub mod validate;
