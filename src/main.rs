use chrono::Utc;
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use log::info;
use reqwest::blocking::Client;

mod config;
mod cycle;
mod diff;
mod fetcher;
mod filter;
mod notify;
mod report;
mod storage;

use config::Config;
use cycle::{CycleSettings, RunMode, run_cycle};
use fetcher::{BookingApi, DateWindow};
use filter::Filter;
use notify::{Notifier, Telegram};
use storage::FileStorage;

/// Checks the Peace Palace booking calendar for newly available tours.
///
/// Run it from cron; every invocation does exactly one check.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Which notification to send after the report is written.
    #[arg(long, value_enum, default_value_t = RunMode::None)]
    mode: RunMode,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let client = Client::builder().user_agent(&config.user_agent).build()?;

    let telegram = match config.telegram_credentials() {
        Some((token, chat_id)) => Some(Telegram::new(
            client.clone(),
            config.telegram_api_url.clone(),
            token,
            chat_id,
        )),
        None if args.mode.notifies() => {
            return Err(eyre!(
                "--mode {} needs TELEGRAM_TOKEN and TELEGRAM_CHAT_ID",
                args.mode
            ));
        }
        None => None,
    };

    let source = BookingApi::new(client, config.booking_api_url.clone());
    let mut storage = FileStorage::new(&config.cache_file, &config.output_file);
    let filter = Filter::from_config(&config);
    let settings = CycleSettings {
        filter: &filter,
        window: DateWindow::lookahead(Utc::now().date_naive(), config.lookahead_days)?,
        only_available: config.only_available,
        mode: args.mode,
    };

    let summary = run_cycle(
        &source,
        &mut storage,
        telegram.as_ref().map(|t| t as &dyn Notifier),
        &settings,
    )?;
    info!(
        "Done: {} relevant, {} available, {} new, notified: {}",
        summary.relevant, summary.available, summary.new, summary.notified
    );
    Ok(())
}
