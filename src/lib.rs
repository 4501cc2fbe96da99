pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod layout;
pub mod orchestrator;
pub mod runner;
pub mod schema;
pub mod storage;
pub mod uploader;
pub mod version;

pub use error::{PublishError, Result};
