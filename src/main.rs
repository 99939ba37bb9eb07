use clap::Parser;
use ml_serve::adapters::http;
use ml_serve::app::build_router;
use ml_serve::domain::ports::ConfigProvider;
use ml_serve::utils::logger::{self, LogFormat};
use ml_serve::utils::validation::Validate;
use ml_serve::{CliConfig, TomlConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            // 載入 TOML 配置
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            run(config).await
        }
        None => run(cli).await,
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日誌
    logger::init_logger(config.verbose(), LogFormat::from_flag(config.json_logs()));

    tracing::info!("🚀 Starting ml-serve ({} service)", config.service_kind());

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    // 模型只在啟動時載入一次，失敗即結束
    let router = match build_router(&config) {
        Ok(router) => router,
        Err(e) => {
            tracing::error!("❌ Failed to load model: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("✅ Listening on {}", listener.local_addr()?);

    http::serve(listener, router, shutdown_signal()).await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
