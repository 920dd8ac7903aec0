use clap::Parser;
use logic_ledger::config::cli::prompt_source;
use logic_ledger::utils::{logger, validation::Validate};
use logic_ledger::{
    AuditEngine, AuditPipeline, CliConfig, GeminiClassifier, HtmlLedgerSink, LocalStorage,
    LogFormat, Result, SourceFetcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 只補上尚未設定的環境變數
    let dotenv_path = dotenvy::dotenv().ok();

    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting logic-ledger CLI");
    if let Some(path) = &dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    println!("\n--- Logic Auditor v{} ---", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(output_path) => {
            tracing::info!("✅ Audit completed successfully!");
            println!("✅ Audit completed successfully!");
            println!("📁 Ledger saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn run(cli: CliConfig) -> Result<String> {
    // 驗證配置
    cli.validate()?;
    let config = cli.resolve()?;
    config.validate()?;

    let api_key = config.classifier.resolve_api_key()?;

    let source = match cli.source() {
        Some(source) => source,
        None => {
            let stdin = std::io::stdin();
            prompt_source(&mut stdin.lock(), &mut std::io::stdout())?
        }
    };

    let fetcher = SourceFetcher::new(LocalStorage::new(".".to_string()), &config.fetcher)?;
    let classifier = GeminiClassifier::new(&config.classifier, api_key)?;
    let sink = HtmlLedgerSink::new(
        LocalStorage::new(config.output.output_path.clone()),
        config.clone(),
    );

    let pipeline = AuditPipeline::new(fetcher, classifier, sink, source);
    AuditEngine::new(pipeline).run().await
}
