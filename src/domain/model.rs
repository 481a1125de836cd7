use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "date")]
    pub upload_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(rename = "idList", default, skip_serializing_if = "Option::is_none")]
    pub id_list: Option<String>,
}

/// 卡片的上層容器，決定使用哪一個 cards 端點
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParent {
    List(String),
    Board(String),
}

impl std::fmt::Display for CardParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardParent::List(id) => write!(f, "list {}", id),
            CardParent::Board(id) => write!(f, "board {}", id),
        }
    }
}

/// 走訪方式：逐 list 分頁，或直接對整個 board 分頁
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CardScope {
    #[default]
    List,
    Board,
}

/// 帶著祖先名稱的卡片，作為攤平的輸入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub board_name: String,
    pub list_name: String,
    pub card: Card,
}

/// CSV 的一列，一個附件對應一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Board")]
    pub board_name: String,
    #[serde(rename = "List")]
    pub list_name: String,
    #[serde(rename = "Card Name")]
    pub card_name: String,
    #[serde(rename = "Card ID")]
    pub card_id: String,
    #[serde(rename = "File")]
    pub attachment_name: String,
    #[serde(rename = "Date")]
    pub attachment_date: String,
}

impl ExportRow {
    pub const HEADER: [&'static str; 6] = ["Board", "List", "Card Name", "Card ID", "File", "Date"];
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub boards: usize,
    pub records: Vec<CardRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<ExportRow>,
    pub card_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_card_payload() {
        let payload = serde_json::json!([
            {
                "id": "C1",
                "name": "Task A",
                "idList": "L1",
                "closed": false,
                "attachments": [{"id": "A1", "name": "spec.pdf", "date": "2024-01-01", "bytes": 10}]
            },
            {"id": "C2", "name": "Task B"}
        ]);

        let cards: Vec<Card> = serde_json::from_value(payload).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id_list.as_deref(), Some("L1"));
        assert_eq!(cards[0].attachments[0].upload_date, "2024-01-01");
        assert!(cards[1].attachments.is_empty());
        assert!(cards[1].id_list.is_none());
    }

    #[test]
    fn test_card_parent_display() {
        assert_eq!(CardParent::List("L1".to_string()).to_string(), "list L1");
        assert_eq!(CardParent::Board("B1".to_string()).to_string(), "board B1");
    }
}
