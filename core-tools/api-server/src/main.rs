// Edithra AI
// Main entry point for the edithra binary

use api_server::cli::{Cli, Command, ConfigAction};
use api_server::ApiServer;
use clap::Parser;
use edithra_engine::config::Config;
use edithra_engine::telemetry::init_telemetry_with_level;
use edithra_engine::EdithraService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let mut config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    let log_level = cli
        .log
        .clone()
        .unwrap_or_else(|| config.effective_log_level().to_string());
    init_telemetry_with_level(&log_level);

    tracing::info!("Edithra v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let bind = config.server.bind_address();
            let service = Arc::new(EdithraService::new(config)?);

            let mut server = ApiServer::new();
            let addr = server.start(service, &bind).await?;
            println!("Edithra AI listening on http://{}", addr);

            tokio::signal::ctrl_c().await?;
            tracing::info!("Received Ctrl-C, shutting down");
            server.stop().await;
            Ok(())
        }

        Command::SelfTest => {
            let service = EdithraService::new(config)?;
            let checks = service.self_test().await;
            let failed = checks.iter().filter(|check| !check.passed).count();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&checks)?);
            } else {
                for check in &checks {
                    let mark = if check.passed { "ok" } else { "FAILED" };
                    println!("{:<12} {:<7} {}", check.name, mark, check.output);
                }
            }

            if failed > 0 {
                anyhow::bail!("{} of {} self-test checks failed", failed, checks.len());
            }
            Ok(())
        }

        Command::Config { action } => match action {
            ConfigAction::Show => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    print!("{}", config.to_toml_string()?);
                }
                Ok(())
            }
            ConfigAction::Path => {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => Config::default_config_path()?,
                };
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
