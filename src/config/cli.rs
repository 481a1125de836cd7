use crate::adapters::http::{DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, DEFAULT_TIMEOUT_SECS};
use crate::config::validate_provider;
use crate::core::exporter::DEFAULT_OUTPUT_FILE;
use crate::core::paginator::DEFAULT_MAX_PAGES;
use crate::domain::model::CardScope;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "attachment-etl")]
#[command(about = "Export every card attachment of one or more boards to CSV")]
pub struct CliConfig {
    /// API key, sent as the `key` query parameter
    #[arg(long, env = "API_KEY", default_value = "", hide_default_value = true)]
    pub api_key: String,

    /// API token, sent as the `token` query parameter
    #[arg(long, env = "TOKEN", default_value = "", hide_default_value = true)]
    pub token: String,

    /// Comma separated board IDs
    #[arg(long, env = "BOARD_IDS", value_delimiter = ',')]
    pub board_ids: Vec<String>,

    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Add a timestamp to the output file name
    #[arg(long)]
    pub timestamped: bool,

    #[arg(long, value_enum, default_value_t = CardScope::List)]
    pub scope: CardScope,

    /// Page size for board-scoped card requests
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "2")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "500")]
    pub retry_delay_ms: u64,

    #[arg(long, default_value = "4")]
    pub concurrent_requests: usize,

    /// Load settings from a TOML file instead of flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Disable the terminal spinner")]
    pub no_spinner: bool,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("board_ids", &self.board_ids)
            .field("base_url", &self.base_url)
            .field("output_path", &self.output_path)
            .field("output_file", &self.output_file)
            .field("timestamped", &self.timestamped)
            .field("scope", &self.scope)
            .field("concurrent_requests", &self.concurrent_requests)
            .finish_non_exhaustive()
    }
}

impl ConfigProvider for CliConfig {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn board_ids(&self) -> Vec<String> {
        validation::normalize_board_ids(&self.board_ids)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn timestamped(&self) -> bool {
        self.timestamped
    }

    fn card_scope(&self) -> CardScope {
        self.scope
    }

    fn page_limit(&self) -> usize {
        self.page_limit
    }

    fn max_pages(&self) -> usize {
        self.max_pages
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
