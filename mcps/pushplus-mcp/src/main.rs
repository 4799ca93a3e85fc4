//! PushPlus MCP Server
//!
//! Push notifications through PushPlus (WeChat, WeCom, mail, SMS, webhooks).
//!
//! # Configuration
//! Set `PUSHPLUS_TOKEN` env var (or in `.env`), or configure in `./pushplus-mcp.toml`

use std::process::ExitCode;

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};

use pushplus_mcp::{config, Config, PushPlusClient, PushPlusMcpServer, SendOptions};

#[derive(Parser)]
#[command(name = "pushplus-mcp")]
#[command(version, about = "PushPlus notification MCP server")]
struct Cli {
    /// Print the configuration summary and its validation result, then exit
    #[arg(short, long)]
    config: bool,

    /// Validate the configuration and send a test message, then exit
    #[arg(short, long, conflicts_with = "config")]
    test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    mcp_common::init_tracing("pushplus_mcp", config::debug_requested())?;

    let config = Config::load()?;

    if cli.config {
        return Ok(show_config(&config));
    }
    if cli.test {
        return Ok(send_test_message(&config).await);
    }

    config.ensure_valid()?;

    tracing::info!("Starting PushPlus MCP Server");
    if config.debug {
        tracing::debug!("{}", config.summary());
    }

    let server = PushPlusMcpServer::new(config);
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(ExitCode::SUCCESS)
}

fn show_config(config: &Config) -> ExitCode {
    println!("{}", config.summary());

    let errors = config.validate();
    if errors.is_empty() {
        println!("\n✅ Configuration is valid");
    } else {
        println!("\n❌ Configuration problems:");
        for error in &errors {
            println!("   - {}", error);
        }
    }
    ExitCode::SUCCESS
}

async fn send_test_message(config: &Config) -> ExitCode {
    println!("{}\n", config.summary());

    if let Err(e) = config.ensure_valid() {
        eprintln!("❌ {}", e);
        return ExitCode::FAILURE;
    }

    let client = PushPlusClient::from_config(config);
    let content = format!(
        "This is a test message from {} v{}, sent at {}.",
        config.server_name,
        config.server_version,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    println!("Sending test message...");
    match client
        .send_text("PushPlus MCP test", content, SendOptions::default())
        .await
    {
        Ok(response) if response.is_success() => {
            println!("✅ Test message accepted (code {}): {}", response.code, response.msg);
            if let Some(serial) = response.serial() {
                println!("   Serial: {}", serial);
            }
            ExitCode::SUCCESS
        }
        Ok(response) => {
            println!("❌ Test message rejected (code {}): {}", response.code, response.msg);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("❌ Test message failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
