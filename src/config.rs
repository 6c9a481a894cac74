use std::path::PathBuf;

use color_eyre::{Result, eyre::Context};
use reqwest::Url;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    #[serde(default = "enabled")]
    pub include_english: bool,
    #[serde(default = "enabled")]
    pub include_dutch: bool,
    #[serde(default = "enabled")]
    pub include_inside: bool,
    #[serde(default = "enabled")]
    pub include_garden: bool,
    #[serde(default)]
    pub only_available: bool,
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,

    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_booking_api_url")]
    pub booking_api_url: Url,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: Url,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn enabled() -> bool {
    true
}

const fn default_lookahead_days() -> u32 {
    14
}

fn default_cache_file() -> PathBuf {
    "last-available-tickets.json".into()
}

fn default_output_file() -> PathBuf {
    "ticket-report.txt".into()
}

fn default_booking_api_url() -> Url {
    Url::parse("https://tt112apiweb.sites.ticketteam.cloud/DSServerDLL.dll/datasnap/rest/TMethods")
        .expect("default booking api url is valid")
}

fn default_telegram_api_url() -> Url {
    Url::parse("https://api.telegram.org").expect("default telegram api url is valid")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36".into()
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().wrap_err("failed to load config")
    }

    /// Both halves of the Telegram credentials, if configured.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                Some((token.as_str(), chat_id.as_str()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_chat_id: None,
            include_english: true,
            include_dutch: true,
            include_inside: true,
            include_garden: true,
            only_available: false,
            lookahead_days: default_lookahead_days(),
            cache_file: default_cache_file(),
            output_file: default_output_file(),
            booking_api_url: default_booking_api_url(),
            telegram_api_url: default_telegram_api_url(),
            user_agent: default_user_agent(),
        }
    }
}
