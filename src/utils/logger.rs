use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise the crate logs at info, or debug with `verbose`.
fn audit_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "logic_ledger=debug,info"
    } else {
        "logic_ledger=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(audit_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .without_time()
                .compact(),
        )
        .init();
}

/// 給批次或 CI 環境使用的 JSON 日誌，寫到 stderr 不干擾 stdout
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(audit_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
