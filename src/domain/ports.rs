use crate::domain::model::{
    Board, Card, CardParent, CardScope, ExtractResult, List, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// 整檔覆寫；失敗時不得留下寫到一半的檔案
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn token(&self) -> &str;
    fn board_ids(&self) -> Vec<String>;
    fn base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn timestamped(&self) -> bool;
    fn card_scope(&self) -> CardScope;
    fn page_limit(&self) -> usize;
    fn max_pages(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn concurrent_requests(&self) -> usize;

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

/// 上游 API 的讀取介面；測試以假實作取代 HTTP
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn get_board(&self, board_id: &str) -> Result<Board>;
    async fn get_lists(&self, board_id: &str) -> Result<Vec<List>>;
    async fn get_cards(&self, parent: &CardParent, before: Option<&str>) -> Result<Vec<Card>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
