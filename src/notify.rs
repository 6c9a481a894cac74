use color_eyre::{Result, eyre::Context};
use log::info;
use reqwest::{Url, blocking::Client};
use serde::Serialize;

/// Longest message body the channel accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

pub trait Notifier {
    /// Delivers `text`; `silent` suppresses the recipient's push alert.
    fn notify(&self, text: &str, silent: bool) -> Result<()>;
}

/// Cuts `text` down to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[derive(Serialize, Debug)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_notification: bool,
}

pub struct Telegram {
    client: Client,
    api_url: Url,
    token: String,
    chat_id: String,
}

impl Telegram {
    pub fn new(client: Client, api_url: Url, token: &str, chat_id: &str) -> Self {
        Self {
            client,
            api_url,
            token: token.to_owned(),
            chat_id: chat_id.to_owned(),
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.as_str().trim_end_matches('/'),
            self.token
        )
    }

    fn payload<'a>(&'a self, text: &'a str, silent: bool) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.chat_id,
            text: truncate_chars(text, MAX_MESSAGE_CHARS),
            parse_mode: "Markdown",
            disable_notification: silent,
        }
    }
}

impl Notifier for Telegram {
    fn notify(&self, text: &str, silent: bool) -> Result<()> {
        self.client
            .post(self.send_message_url())
            .json(&self.payload(text, silent))
            .send()
            .and_then(|res| res.error_for_status())
            // the request url carries the bot token
            .map_err(reqwest::Error::without_url)
            .wrap_err("telegram sendMessage failed")?;

        info!(
            "Sent {} Telegram message",
            if silent { "silent" } else { "push" }
        );
        Ok(())
    }
}
