use crate::domain::model::{Card, CardParent};
use crate::domain::ports::CardSource;
use crate::utils::error::{EtlError, Result};

/// Maximum pages to fetch for one parent (safety limit).
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// 把一個 list 或 board 的卡片全部抓完。
///
/// 每頁非空時，以該頁「最後一張」卡片的 ID 作為下一次的 `before` 游標；
/// 上游依 ID 由新到舊排序，所以最後一張就是目前看過最舊的卡片。
/// 空頁即結束。輸出為各頁依序串接的結果。
pub async fn drain_cards<S>(source: &S, parent: &CardParent, max_pages: usize) -> Result<Vec<Card>>
where
    S: CardSource + ?Sized,
{
    let mut cards = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if pages >= max_pages {
            tracing::warn!("Reached pagination limit of {} pages for {}", max_pages, parent);
            return Err(EtlError::PaginationLimit {
                parent: parent.to_string(),
                max_pages,
            });
        }

        let page = source.get_cards(parent, cursor.as_deref()).await?;
        pages += 1;

        let Some(last) = page.last() else {
            break;
        };
        let next_cursor = last.id.clone();

        if cursor.as_deref() == Some(next_cursor.as_str()) {
            return Err(EtlError::PaginationStalled {
                parent: parent.to_string(),
                cursor: next_cursor,
            });
        }

        tracing::debug!("📄 {} page {}: {} cards", parent, pages, page.len());
        cards.extend(page);
        cursor = Some(next_cursor);
    }

    tracing::debug!("📄 {} drained: {} cards in {} pages", parent, cards.len(), pages);
    Ok(cards)
}
