use crate::adapters::http::{DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, DEFAULT_TIMEOUT_SECS};
use crate::config::validate_provider;
use crate::core::exporter::DEFAULT_OUTPUT_FILE;
use crate::core::paginator::DEFAULT_MAX_PAGES;
use crate::domain::model::CardScope;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{normalize_board_ids, Validate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub boards: BoardsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    pub token: String,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardsConfig {
    /// 可寫成陣列，或單一逗號分隔字串
    #[serde(deserialize_with = "string_or_vec")]
    pub ids: Vec<String>,
    pub scope: Option<CardScope>,
    pub page_limit: Option<usize>,
    pub max_pages: Option<usize>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    One(String),
    Many(Vec<String>),
}

fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrVec::deserialize(deserializer)? {
        StringOrVec::One(ids) => vec![ids],
        StringOrVec::Many(ids) => ids,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub filename: Option<String>,
    pub timestamped: Option<bool>,
}

impl std::fmt::Debug for TomlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomlConfig")
            .field("base_url", &self.api.base_url)
            .field("boards", &self.boards)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::InvalidConfigValue {
            field: "toml".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_key(&self) -> &str {
        &self.api.key
    }

    fn token(&self) -> &str {
        &self.api.token
    }

    fn board_ids(&self) -> Vec<String> {
        normalize_board_ids(&self.boards.ids)
    }

    fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(".")
    }

    fn output_file(&self) -> &str {
        self.output.filename.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn timestamped(&self) -> bool {
        self.output.timestamped.unwrap_or(false)
    }

    fn card_scope(&self) -> CardScope {
        self.boards.scope.unwrap_or_default()
    }

    fn page_limit(&self) -> usize {
        self.boards.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    fn max_pages(&self) -> usize {
        self.boards.max_pages.unwrap_or(DEFAULT_MAX_PAGES)
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn retry_attempts(&self) -> u32 {
        self.api.retry_attempts.unwrap_or(2)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.api.retry_delay_ms.unwrap_or(500))
    }

    fn concurrent_requests(&self) -> usize {
        self.boards.concurrent_requests.unwrap_or(4)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        // 未展開的 ${VAR} 代表環境變數沒有設定
        for (field, value) in [("api.key", self.api_key()), ("api.token", self.token())] {
            if env_var_pattern().is_match(value) {
                return Err(EtlError::ConfigMissing {
                    field: format!("{} ({})", field, value),
                });
            }
        }
        Ok(())
    }
}
