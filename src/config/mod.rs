#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::*;

/// 共用的設定檢查，CLI 與 TOML 兩種來源都走這裡
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_credential("api_key", config.api_key())?;
    validate_credential("token", config.token())?;
    validate_board_ids("board_ids", &config.board_ids())?;
    validate_url("base_url", config.base_url())?;
    validate_path("output_path", config.output_path())?;
    validate_file_name("output_file", config.output_file())?;
    validate_range("page_limit", config.page_limit(), 1, 1000)?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;
    validate_positive_number("max_pages", config.max_pages(), 1)?;
    validate_range("concurrent_requests", config.concurrent_requests(), 1, 32)?;

    tracing::debug!("✅ Configuration validation passed");
    Ok(())
}
