use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 輸出檔名不可包含路徑分隔符，避免寫到 output_path 以外
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }
    Ok(())
}

/// 憑證缺失屬於 ConfigMissing，而不是格式錯誤
pub fn validate_credential(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::ConfigMissing {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_board_ids(field_name: &str, board_ids: &[String]) -> Result<()> {
    if board_ids.iter().all(|id| id.trim().is_empty()) {
        return Err(EtlError::ConfigMissing {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 把逗號分隔的 board ID 清單正規化：去除空白、丟棄空段
pub fn normalize_board_ids(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://api.trello.com/1").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_credential_reports_missing() {
        let err = validate_credential("api_key", "   ").unwrap_err();
        assert!(matches!(err, EtlError::ConfigMissing { field } if field == "api_key"));
        assert!(validate_credential("api_key", "abc").is_ok());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("output_file", "attachments.csv").is_ok());
        assert!(validate_file_name("output_file", "../attachments.csv").is_err());
        assert!(validate_file_name("output_file", "").is_err());
    }

    #[test]
    fn test_normalize_board_ids() {
        let raw = vec!["b1, b2,,".to_string(), " b3 ".to_string()];
        assert_eq!(normalize_board_ids(&raw), vec!["b1", "b2", "b3"]);
        assert!(validate_board_ids("board_ids", &normalize_board_ids(&[" , ".to_string()])).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("concurrent_requests", 4, 1, 32).is_ok());
        assert!(validate_range("concurrent_requests", 0, 1, 32).is_err());
        assert!(validate_positive_number("max_pages", 0, 1).is_err());
    }
}
