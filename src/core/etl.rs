use crate::core::Pipeline;
use crate::utils::error::{EtlError, Result};
use crate::utils::spinner::Spinner;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub boards: usize,
    pub cards: usize,
    pub rows: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    spinner: Spinner,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            spinner: Spinner::hidden(),
        }
    }

    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting attachment export");

        // 任何錯誤經由 `?` 離開時，guard 隨 drop 清除動畫
        let spinner = self.spinner.start("Fetching cards...");

        let extracted = self.pipeline.extract().await?;
        let boards = extracted.boards;
        tracing::info!(
            "Extracted {} cards from {} boards",
            extracted.records.len(),
            boards
        );

        let transformed = self.pipeline.transform(extracted).await?;
        let cards = transformed.card_count;
        let rows = transformed.rows.len();
        tracing::info!("Transformed into {} attachment rows", rows);

        // 匯出前停止動畫，避免和最後的輸出交錯
        spinner.stop();

        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            boards,
            cards,
            rows,
        })
    }

    /// 與 `run` 相同，但 token 被取消時立即放棄；進行中的請求隨 future drop 中止，不會寫出檔案
    pub async fn run_until_cancelled(&self, token: CancellationToken) -> Result<RunSummary> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::warn!("⛔ Export cancelled, no output written");
                Err(EtlError::Cancelled)
            }
            result = self.run() => result,
        }
    }
}
