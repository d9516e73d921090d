use std::sync::Arc;

use clap::Parser;
use tracing::error;

use linkpulse::cli::{Cli, Commands, ConfigCommands};
use linkpulse::config::StaticConfig;
use linkpulse::system::{init_cli_logging, init_logging};

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    // 生成配置不依赖现有配置文件
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = command
    {
        if let Err(e) =
            linkpulse::interfaces::cli::commands::config_generate(output_path, force).await
        {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
        return;
    }

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match command {
        Commands::Serve => {
            // guard 必须存活到进程结束，否则缓冲中的日志会丢失
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = linkpulse::runtime::modes::run_server(config).await {
                error!("Server error: {:#}", e);
                eprintln!("Server error: {:#}", e);
                std::process::exit(1);
            }
        }
        command => {
            if let Err(e) = init_cli_logging() {
                eprintln!("Failed to initialize logging: {:#}", e);
            }

            if let Err(e) = linkpulse::runtime::modes::run_cli(command, config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
    }
}
