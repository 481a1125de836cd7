pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::TrelloClient, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    pipeline::AttachmentPipeline,
};
pub use domain::model::{Attachment, Board, Card, CardParent, CardScope, ExportRow, List};
pub use utils::error::{EtlError, Result};
