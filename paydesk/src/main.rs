use anyhow::Result;
use clap::Parser;

use paydesk::commands::{self, Cli};
use paydesk::core::{AppConfig, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    cli.apply(&mut config);

    let _log_guard = paydesk::init_logging(&config.log_level, config.log_dir.as_deref())?;
    tracing::debug!(api = %config.api_base_url, fallback = config.fallback, "PayDesk starting");

    let ctx = AppContext::new(config)?;
    match commands::run(&ctx, cli.command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            tracing::debug!(code = ?e.code, "Command failed");
            eprintln!("Error: {}", e.message);
            if let Some(redirect) = e
                .details
                .as_ref()
                .and_then(|d| d.get("redirect"))
                .and_then(|v| v.as_str())
            {
                eprintln!("(go to {redirect})");
            }
            std::process::exit(1);
        }
    }
}
