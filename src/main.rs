use attachment_etl::domain::ports::ConfigProvider;
use attachment_etl::utils::{logger, spinner::Spinner, validation::Validate};
use attachment_etl::{
    AttachmentPipeline, CliConfig, EtlEngine, EtlError, LocalStorage, RunSummary, TomlConfig,
    TrelloClient,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // spinner 先建立，日誌 writer 需要它來收起動畫
    let spinner = Spinner::new(!cli.no_spinner);

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose, &spinner);
    } else {
        logger::init_cli_logger(cli.verbose, &spinner);
    }

    tracing::info!("Starting attachment-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config, spinner).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli, spinner).await,
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ Exported {} attachments from {} cards on {} boards",
                summary.rows,
                summary.cards,
                summary.boards
            );
            println!("✅ Export completed successfully!");
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(EtlError::Cancelled) => {
            eprintln!("⛔ Interrupted, no output written");
            std::process::exit(EtlError::Cancelled.exit_code());
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

async fn run<C>(config: C, spinner: Spinner) -> attachment_etl::Result<RunSummary>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;
    tracing::info!(
        "Boards: {} | scope: {:?} | output: {}/{}",
        config.board_ids().join(","),
        config.card_scope(),
        config.output_path(),
        config.output_file()
    );

    let client = TrelloClient::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path());
    let pipeline = AttachmentPipeline::new(storage, config, client);
    let engine = EtlEngine::new(pipeline).with_spinner(spinner);

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    engine.run_until_cancelled(token).await
}
