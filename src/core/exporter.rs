use crate::domain::model::ExportRow;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, TimeZone};
use std::path::Path;

pub const DEFAULT_OUTPUT_FILE: &str = "attachments.csv";

/// 決定輸出檔名；timestamped 時在副檔名前加上時間戳記。
/// 同一秒內重複執行會覆蓋同名檔案。
pub fn output_file_name<Tz>(base: &str, timestamped: bool, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !timestamped {
        return base.to_string();
    }

    let path = Path::new(base);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("attachments");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");
    format!("{}_{}.{}", stem, now.format("%Y-%m-%d_%H-%M-%S"), extension)
}

/// 產生完整 CSV 內容，標頭固定輸出，即使沒有任何資料列
pub fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ExportRow::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| EtlError::Csv(e.into_error().into()))
}

pub async fn export<S: Storage>(storage: &S, file_name: &str, rows: &[ExportRow]) -> Result<String> {
    let data = render_csv(rows)?;
    tracing::debug!("Rendered {} rows ({} bytes) for {}", rows.len(), data.len(), file_name);
    storage.write_file(file_name, &data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(card_id: &str, file: &str) -> ExportRow {
        ExportRow {
            board_name: "Team".to_string(),
            list_name: "Backlog".to_string(),
            card_name: "Task A".to_string(),
            card_id: card_id.to_string(),
            attachment_name: file.to_string(),
            attachment_date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_header_written_without_rows() {
        let data = render_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(data).unwrap().trim_end(),
            "Board,List,Card Name,Card ID,File,Date"
        );
    }

    #[test]
    fn test_render_plain_row() {
        let data = String::from_utf8(render_csv(&[row("C1", "spec.pdf")]).unwrap()).unwrap();
        let lines: Vec<&str> = data.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Team,Backlog,Task A,C1,spec.pdf,2024-01-01");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let data =
            String::from_utf8(render_csv(&[row("C1", "report, \"final\".pdf")]).unwrap()).unwrap();
        assert!(data.contains("\"report, \"\"final\"\".pdf\""));
    }

    #[test]
    fn test_fixed_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(output_file_name("attachments.csv", false, &now), "attachments.csv");
    }

    #[test]
    fn test_timestamped_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            output_file_name("attachments.csv", true, &now),
            "attachments_2024-05-06_07-08-09.csv"
        );
        assert_eq!(output_file_name("export", true, &now), "export_2024-05-06_07-08-09.csv");
    }
}
