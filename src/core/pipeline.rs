use crate::core::exporter::{self, output_file_name};
use crate::core::paginator::drain_cards;
use crate::domain::model::{
    Card, CardParent, CardRecord, CardScope, ExtractResult, List, TransformResult,
};
use crate::domain::ports::{CardSource, ConfigProvider, Pipeline, Storage};
use crate::domain::services::flatten;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// board → lists → cards → 附件 的匯出流程
pub struct AttachmentPipeline<S: Storage, C: ConfigProvider, A: CardSource> {
    storage: S,
    config: C,
    source: Arc<A>,
}

impl<S, C, A> AttachmentPipeline<S, C, A>
where
    S: Storage,
    C: ConfigProvider,
    A: CardSource + 'static,
{
    pub fn new(storage: S, config: C, source: A) -> Self {
        Self {
            storage,
            config,
            source: Arc::new(source),
        }
    }

    /// 各 list 彼此獨立，以 semaphore 限制同時分頁的數量；結果依 list 原順序組回
    async fn collect_by_list(&self, board_name: &str, lists: Vec<List>) -> Result<Vec<CardRecord>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_requests().max(1)));
        let max_pages = self.config.max_pages();
        let mut tasks = JoinSet::new();

        for (index, list) in lists.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let parent = CardParent::List(list.id.clone());

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| EtlError::Task {
                        message: e.to_string(),
                    })?;
                let cards = drain_cards(source.as_ref(), &parent, max_pages).await?;
                Ok::<_, EtlError>((index, cards))
            });
        }

        let mut drained: Vec<Vec<Card>> = vec![Vec::new(); lists.len()];
        // 任一 list 失敗即返回；JoinSet drop 時會中止其餘仍在執行的請求
        while let Some(joined) = tasks.join_next().await {
            let (index, cards) = joined.map_err(|e| EtlError::Task {
                message: e.to_string(),
            })??;
            tracing::info!("🗂️  {} / {}: {} cards", board_name, lists[index].name, cards.len());
            drained[index] = cards;
        }

        Ok(lists
            .into_iter()
            .zip(drained)
            .flat_map(|(list, cards)| {
                cards.into_iter().map(move |card| CardRecord {
                    board_name: board_name.to_string(),
                    list_name: list.name.clone(),
                    card,
                })
            })
            .collect())
    }

    /// 直接對 board 的 cards 端點分頁，list 名稱由卡片的 idList 對應
    async fn collect_by_board(
        &self,
        board_id: &str,
        board_name: &str,
        lists: &[List],
    ) -> Result<Vec<CardRecord>> {
        let list_names: HashMap<&str, &str> = lists
            .iter()
            .map(|list| (list.id.as_str(), list.name.as_str()))
            .collect();

        let parent = CardParent::Board(board_id.to_string());
        let cards = drain_cards(self.source.as_ref(), &parent, self.config.max_pages()).await?;
        tracing::info!("🗂️  {}: {} cards", board_name, cards.len());

        Ok(cards
            .into_iter()
            .map(|card| {
                let list_name = card
                    .id_list
                    .as_deref()
                    .and_then(|id| list_names.get(id))
                    .map(|name| name.to_string())
                    .unwrap_or_default();
                CardRecord {
                    board_name: board_name.to_string(),
                    list_name,
                    card,
                }
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl<S, C, A> Pipeline for AttachmentPipeline<S, C, A>
where
    S: Storage,
    C: ConfigProvider,
    A: CardSource + 'static,
{
    async fn extract(&self) -> Result<ExtractResult> {
        let board_ids = self.config.board_ids();
        let mut records = Vec::new();

        for board_id in &board_ids {
            let board = self.source.get_board(board_id).await?;
            tracing::info!("📋 Board '{}' ({})", board.name, board_id);

            let lists = self.source.get_lists(board_id).await?;
            tracing::debug!("📋 {} lists on '{}'", lists.len(), board.name);

            let board_records = match self.config.card_scope() {
                CardScope::List => self.collect_by_list(&board.name, lists).await?,
                CardScope::Board => self.collect_by_board(board_id, &board.name, &lists).await?,
            };
            records.extend(board_records);
        }

        Ok(ExtractResult {
            boards: board_ids.len(),
            records,
        })
    }

    async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let rows = flatten(&data.records);
        tracing::debug!(
            "Flattened {} cards into {} attachment rows",
            data.records.len(),
            rows.len()
        );

        Ok(TransformResult {
            rows,
            card_count: data.records.len(),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let file_name = output_file_name(
            self.config.output_file(),
            self.config.timestamped(),
            &chrono::Local::now(),
        );
        exporter::export(&self.storage, &file_name, &result.rows).await
    }
}
