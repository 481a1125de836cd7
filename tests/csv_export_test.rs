use anyhow::Result;
use attachment_etl::core::exporter::{export, render_csv};
use attachment_etl::{ExportRow, LocalStorage};
use tempfile::TempDir;

fn row(board: &str, list: &str, card: &str, id: &str, file: &str, date: &str) -> ExportRow {
    ExportRow {
        board_name: board.to_string(),
        list_name: list.to_string(),
        card_name: card.to_string(),
        card_id: id.to_string(),
        attachment_name: file.to_string(),
        attachment_date: date.to_string(),
    }
}

fn tricky_rows() -> Vec<ExportRow> {
    vec![
        row("Team", "Backlog", "Task A", "C1", "spec.pdf", "2024-01-01"),
        row("Team, Inc.", "To \"Do\"", "Multi\nline", "C2", "a,b,c.txt", "2024-01-02"),
        row("Ops", "", "Windows\r\nbreak", "C3", "\"quoted\".png", ""),
        row("  padded  ", "Done", "Ünïcödé ✅", "C4", "x", "2024-12-31T23:59:59.000Z"),
    ]
}

#[test]
fn test_round_trip_through_csv_reader() -> Result<()> {
    let rows = tricky_rows();
    let data = render_csv(&rows)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::None)
        .from_reader(data.as_slice());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(headers, ExportRow::HEADER);

    let parsed: Vec<ExportRow> = reader.deserialize().collect::<Result<_, _>>()?;
    assert_eq!(parsed, rows);
    Ok(())
}

#[tokio::test]
async fn test_export_twice_matches_single_export() -> Result<()> {
    let once_dir = TempDir::new()?;
    let twice_dir = TempDir::new()?;
    let rows = tricky_rows();

    let once = LocalStorage::new(once_dir.path());
    export(&once, "attachments.csv", &rows).await?;

    let twice = LocalStorage::new(twice_dir.path());
    export(&twice, "attachments.csv", &rows).await?;
    export(&twice, "attachments.csv", &rows).await?;

    let expected = std::fs::read(once_dir.path().join("attachments.csv"))?;
    let actual = std::fs::read(twice_dir.path().join("attachments.csv"))?;
    assert_eq!(actual, expected);
    Ok(())
}

#[tokio::test]
async fn test_failed_export_leaves_previous_file_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = LocalStorage::new(dir.path());
    let path = export(&storage, "attachments.csv", &tricky_rows()).await?;
    let before = std::fs::read(&path)?;

    // 目標名稱是目錄時 rename 會失敗
    let blocked = LocalStorage::new(dir.path());
    std::fs::create_dir(dir.path().join("blocked.csv"))?;
    let err = export(&blocked, "blocked.csv", &tricky_rows()).await.unwrap_err();

    assert!(matches!(err, attachment_etl::EtlError::Export { .. }));
    assert_eq!(std::fs::read(&path)?, before);
    // 只剩原本的檔案和擋路的目錄，沒有殘留暫存檔
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 2);
    Ok(())
}
