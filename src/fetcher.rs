use std::fmt;

use chrono::{Days, NaiveDate};
use color_eyre::{Result, eyre::eyre};
use log::{debug, warn};
use reqwest::{Url, blocking::Client, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the booking API keeps its event rows inside the response body.
const ROWS_POINTER: &str = "/result/0/fields/FEvents/fields/Rows";
const LOCALE: &str = "NL";
const VENUE: &str = "W0001000";

pub type Slots = Vec<Slot>;
pub type SlotId = String;

/// One bookable tour occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: SlotId,
    pub date: String,
    pub time: String,
    pub description: String,
    pub available_seats: u32,
}

impl Slot {
    pub const fn is_available(&self) -> bool {
        self.available_seats > 0
    }
}

/// Inclusive range of calendar days asked of the booking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn lookahead(start: NaiveDate, days: u32) -> Result<Self> {
        let end = start
            .checked_add_days(Days::new(days.into()))
            .ok_or_else(|| eyre!("lookahead of {days} days from {start} is out of range"))?;
        Ok(Self { start, end })
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

pub trait SlotSource {
    fn fetch(&self, window: &DateWindow) -> Result<Slots>;
}

pub struct BookingApi {
    client: Client,
    base_url: Url,
}

impl BookingApi {
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn event_group_url(&self, window: &DateWindow) -> String {
        format!(
            "{}/GetListOfEventGroup//1/{}/{}/{LOCALE}/{VENUE}",
            self.base_url.as_str().trim_end_matches('/'),
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
        )
    }
}

impl SlotSource for BookingApi {
    fn fetch(&self, window: &DateWindow) -> Result<Slots> {
        let url = self.event_group_url(window);
        debug!("Fetching event groups from {url}");
        let body: Value = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .json()?;
        Ok(parse_slots(&body))
    }
}

/// Normalizes every row found in a booking API response.
///
/// A body without the expected row array yields no slots; a bad row is
/// skipped without affecting its neighbours.
pub fn parse_slots(body: &Value) -> Slots {
    let Some(rows) = body.pointer(ROWS_POINTER).and_then(Value::as_array) else {
        warn!("Response has no event rows at {ROWS_POINTER}, treating as empty");
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match parse_row(row) {
            Ok(slot) => Some(slot),
            Err(err) => {
                warn!("Skipping event row {index}: {err}");
                None
            }
        })
        .collect()
}

/// Rows are positional: `[date, description, time, seats, id]`.
fn parse_row(row: &Value) -> Result<Slot> {
    let fields = row
        .as_array()
        .ok_or_else(|| eyre!("row is not an array"))?;
    let [date, description, time, seats, id, ..] = fields.as_slice() else {
        return Err(eyre!("row has {} fields, expected 5", fields.len()));
    };

    let id = match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(eyre!("unusable id {other}")),
    };

    Ok(Slot {
        date: text_field(date, "date")?.to_owned(),
        description: text_field(description, "description")?.replace("\\/", "/"),
        time: text_field(time, "time")?.to_owned(),
        available_seats: seat_count(seats, &id),
        id,
    })
}

fn text_field<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| eyre!("{name} is not a string: {value}"))
}

fn seat_count(value: &Value, id: &str) -> u32 {
    let parsed = match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("Slot {id} has unreadable seat count {value}, assuming 0");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(rows: Value) -> Value {
        json!({ "result": [{ "fields": { "FEvents": { "fields": { "Rows": rows } } } }] })
    }

    #[test]
    fn normalizes_a_well_formed_row() {
        let slots = parse_slots(&body(json!([[
            "2024-06-01",
            "Garden Tour (English)",
            "14:00",
            "5",
            "Z9"
        ]])));
        assert_eq!(
            slots,
            vec![Slot {
                id: "Z9".into(),
                date: "2024-06-01".into(),
                time: "14:00".into(),
                description: "Garden Tour (English)".into(),
                available_seats: 5,
            }]
        );
        assert!(slots[0].is_available());
    }

    #[test]
    fn unescapes_slashes_in_description() {
        let slots = parse_slots(&body(json!([[
            "2024-06-01",
            "Rondleiding in het paleis \\/ Inside the palace",
            "10:30",
            "2",
            "A1"
        ]])));
        assert_eq!(
            slots[0].description,
            "Rondleiding in het paleis / Inside the palace"
        );
    }

    #[test]
    fn malformed_seat_count_becomes_zero_without_dropping_the_row() {
        let slots = parse_slots(&body(json!([
            ["2024-06-01", "Garden Tour (English)", "14:00", "sold out", "B1"],
            ["2024-06-02", "Garden Tour (English)", "15:00", " 3 ", "B2"],
            ["2024-06-03", "Garden Tour (English)", "16:00", -4, "B3"]
        ])));
        let seats: Vec<_> = slots.iter().map(|s| s.available_seats).collect();
        assert_eq!(seats, [0, 3, 0]);
        assert!(!slots[0].is_available());
    }

    #[test]
    fn numeric_ids_and_seats_are_accepted() {
        let slots = parse_slots(&body(json!([[
            "2024-06-01",
            "Garden Tour",
            "14:00",
            12,
            40123
        ]])));
        assert_eq!(slots[0].id, "40123");
        assert_eq!(slots[0].available_seats, 12);
    }

    #[test]
    fn broken_rows_are_skipped() {
        let slots = parse_slots(&body(json!([
            ["2024-06-01", "too short"],
            "not a row",
            ["2024-06-01", null, "14:00", "5", "C1"],
            ["2024-06-02", "Garden Tour", "14:00", "5", "C2"]
        ])));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, "C2");
    }

    #[test]
    fn missing_row_path_yields_no_slots() {
        assert!(parse_slots(&json!({})).is_empty());
        assert!(parse_slots(&json!({ "result": [] })).is_empty());
        assert!(parse_slots(&body(json!({ "rows": "nope" }))).is_empty());
    }

    #[test]
    fn builds_event_group_url_for_window() {
        let api = BookingApi::new(
            Client::new(),
            Url::parse("https://example.test/rest/TMethods/").unwrap(),
        );
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let window = DateWindow::lookahead(start, 14).unwrap();
        assert_eq!(
            api.event_group_url(&window),
            "https://example.test/rest/TMethods/GetListOfEventGroup//1/2024-06-01/2024-06-15/NL/W0001000"
        );
    }

    #[test]
    fn window_displays_with_arrow() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let window = DateWindow::lookahead(start, 14).unwrap();
        assert_eq!(window.to_string(), "2024-12-25 → 2025-01-08");
    }
}
