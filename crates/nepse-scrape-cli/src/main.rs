//! nepse-scrape — entry point.

use anyhow::Context;
use clap::{CommandFactory, Parser};

use nepse_scrape::{
    acquire, export_history, run_days, BrowserSource, OutputStore, SessionConfig, SiteConfig,
};
use nepse_scrape_cli::cli::{Cli, Commands};
use nepse_scrape_cli::{config, doctor, ConsoleObserver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command_or_default() {
        Commands::Run(args) => {
            let run_config = args.run_config(config::today())?;
            tracing::info!("Data dir: {}", run_config.data_dir.display());

            let mut source = open_source(&args.browser.session_config()).await?;
            let mut console = ConsoleObserver::stdout();
            run_days(&mut source, &run_config, &mut console).await;
            if let Err(e) = source.close().await {
                tracing::warn!("Closing browser failed: {e}");
            }
        }

        Commands::History(args) => {
            let store = OutputStore::new(args.data_dir());
            let mut source = open_source(&args.browser.session_config()).await?;
            let exported =
                export_history(&mut source, &store, &args.from, &args.to, args.max_pages()).await;

            // Close before reporting so a failed export never leaks the browser.
            if let Err(e) = source.close().await {
                tracing::warn!("Closing browser failed: {e}");
            }

            match exported.with_context(|| format!("exporting {}..{}", args.from, args.to))? {
                Some(path) => println!("✅ history saved to {}", path.display()),
                None => println!("⚠  no data for {}..{}", args.from, args.to),
            }
        }

        Commands::Doctor { data_dir, chromium } => {
            let dir = config::resolve_data_dir(data_dir.as_deref());
            if !doctor::run(&dir, chromium)? {
                std::process::exit(1);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "nepse-scrape", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn open_source(session: &SessionConfig) -> anyhow::Result<BrowserSource> {
    let browser = acquire(session)
        .await
        .context("starting Chromium (run `nepse-scrape doctor` to diagnose)")?;
    Ok(BrowserSource::new(Box::new(browser), SiteConfig::default()))
}
