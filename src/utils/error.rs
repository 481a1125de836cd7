use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Missing configuration: {field}")]
    ConfigMissing { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Network error during {call}: {source}")]
    Network {
        call: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{call} returned HTTP {status}")]
    HttpStatus {
        call: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response of {call}: {source}")]
    Decode {
        call: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Pagination of {parent} stalled at cursor {cursor}")]
    PaginationStalled { parent: String, cursor: String },

    #[error("Pagination of {parent} exceeded {max_pages} pages")]
    PaginationLimit { parent: String, max_pages: usize },

    #[error("Failed to write export file {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch task failed: {message}")]
    Task { message: String },

    #[error("Interrupted by operator")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Export,
    Runtime,
}

/// 嚴重程度，主程式依此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigMissing { .. } | EtlError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::Network { .. } | EtlError::HttpStatus { .. } => ErrorCategory::Network,
            EtlError::Decode { .. }
            | EtlError::PaginationStalled { .. }
            | EtlError::PaginationLimit { .. } => ErrorCategory::Data,
            EtlError::Export { .. } | EtlError::Csv(_) | EtlError::Io(_) => ErrorCategory::Export,
            EtlError::Task { .. } | EtlError::Cancelled => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::Cancelled => ErrorSeverity::Low,
            EtlError::Network { .. } | EtlError::HttpStatus { .. } if self.is_transient() => {
                ErrorSeverity::Medium
            }
            EtlError::ConfigMissing { .. }
            | EtlError::InvalidConfigValue { .. }
            | EtlError::Export { .. }
            | EtlError::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 程序結束碼：中斷 130，其餘依嚴重程度；錯誤一律非零
    pub fn exit_code(&self) -> i32 {
        match (self, self.severity()) {
            (EtlError::Cancelled, _) => 130,
            (_, ErrorSeverity::Medium) => 2,
            (_, ErrorSeverity::Critical) => 3,
            _ => 1,
        }
    }

    /// 是否為可重試的暫時性錯誤（逾時、連線失敗、429、5xx）
    pub fn is_transient(&self) -> bool {
        match self {
            EtlError::Network { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            EtlError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ConfigMissing { .. } => {
                "Set API_KEY, TOKEN and BOARD_IDS in the environment or pass them as flags"
            }
            EtlError::InvalidConfigValue { .. } => "Fix the reported configuration value",
            EtlError::Network { .. } => "Check network connectivity and retry",
            EtlError::HttpStatus { status, .. } if status.as_u16() == 401 => {
                "Verify the API key and token are valid"
            }
            EtlError::HttpStatus { status, .. } if status.as_u16() == 404 => {
                "Verify the board IDs exist and are visible to this token"
            }
            EtlError::HttpStatus { .. } => "The upstream API rejected the request; retry later",
            EtlError::Decode { .. } => "The upstream API returned an unexpected payload",
            EtlError::PaginationStalled { .. } | EtlError::PaginationLimit { .. } => {
                "Raise --max-pages or inspect the board for unusual card ordering"
            }
            EtlError::Export { .. } | EtlError::Csv(_) | EtlError::Io(_) => {
                "Check that the output directory exists, is writable and has free space"
            }
            EtlError::Task { .. } => "Re-run with --verbose and report the log",
            EtlError::Cancelled => "No output was written",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ConfigMissing { field } => format!("Required setting '{}' is missing", field),
            EtlError::Network { call, .. } => format!("Could not reach the API during {}", call),
            EtlError::HttpStatus { call, status } => {
                format!("The API answered {} for {}", status, call)
            }
            EtlError::Export { path, .. } => format!("Could not write {}", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
