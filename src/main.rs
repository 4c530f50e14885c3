#[macro_use]
extern crate rust_i18n;

use anyhow::Result;
use clap::Parser;
use tokio::runtime::Runtime;

use draftpilot::cli::Cli;
use draftpilot::config;
use draftpilot::server;

// Initialize i18n for binary crate
i18n!("locales", fallback = "en");

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 根据 verbose 标志设置日志级别
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    let mut app_config = config::load_config(cli.config.as_deref())?;

    // CLI 覆盖配置文件
    if let Some(host) = cli.host {
        app_config.server.host = host;
    }
    if let Some(port) = cli.port {
        app_config.server.port = port;
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        if let Err(e) = server::serve(&app_config).await {
            tracing::error!("{}", e);
            if let Some(suggestion) = e.suggestion() {
                tracing::info!("{}", suggestion);
            }
            std::process::exit(1);
        }
        Ok(())
    })
}
