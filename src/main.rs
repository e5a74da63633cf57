use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use ferry::cli::commands::migrate::{MigrateCommand, MigrateCommandHandler};
use ferry::cli::commands::serve::{ServeCommand, ServeCommandHandler};
use ferry::cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    sqlx::any::install_default_drivers();

    // CLIをパースして実行
    let cli = Cli::parse();

    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // トレーシングを初期化（RUST_LOG環境変数を優先、--verboseでdebugに引き上げ）
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 非同期ランタイムを作成して実行
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to create Tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Migrate {
            source_url,
            dest_url,
        } => {
            let handler = MigrateCommandHandler::new();
            let command = MigrateCommand {
                source_url,
                dest_url,
            };
            handler.execute(&command).await
        }

        Commands::Serve { dest_url, addr } => {
            let handler = ServeCommandHandler::new();
            let command = ServeCommand { dest_url, addr };
            handler.execute(&command).await
        }
    }
}
