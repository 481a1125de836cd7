use crate::domain::model::{CardRecord, ExportRow};

/// 每個附件產生一列；沒有附件的卡片不會出現在輸出中。
/// 不過濾、不去重、不排序，順序即抓取順序。
pub fn flatten(records: &[CardRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .flat_map(|record| {
            record.card.attachments.iter().map(move |attachment| ExportRow {
                board_name: record.board_name.clone(),
                list_name: record.list_name.clone(),
                card_name: record.card.name.clone(),
                card_id: record.card.id.clone(),
                attachment_name: attachment.name.clone(),
                attachment_date: attachment.upload_date.clone(),
            })
        })
        .collect()
}
