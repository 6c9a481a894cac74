use crate::fetcher::{DateWindow, Slot};

const MARKER_AVAILABLE: &str = "🟢";
const MARKER_SOLD_OUT: &str = "🔴";

pub const NO_NEW_TICKETS: &str = "No new tickets since last check.";
pub const NONE_PLACEHOLDER: &str = "(none)";
pub const NO_TOURS_FOUND: &str = "No tours found.";

/// `date at time: description (n seats)`, shared by the report and every message.
pub fn slot_line(slot: &Slot) -> String {
    format!(
        "{} at {}: {} ({} seats)",
        slot.date, slot.time, slot.description, slot.available_seats
    )
}

/// Backslash-escapes the characters Telegram's legacy Markdown treats as markup.
fn escape_markdown(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            '_' | '*' | '`' | '[' => vec!['\\', c],
            _ => vec![c],
        })
        .collect()
}

/// Same layout as [`slot_line`], with the description made safe for Markdown.
fn message_slot_line(slot: &Slot) -> String {
    slot_line(&Slot {
        description: escape_markdown(&slot.description),
        ..slot.clone()
    })
}

fn status_marker(slot: &Slot) -> &'static str {
    if slot.is_available() {
        MARKER_AVAILABLE
    } else {
        MARKER_SOLD_OUT
    }
}

fn status_line(slot: &Slot) -> String {
    format!("{} {}", status_marker(slot), slot_line(slot))
}

pub fn build_report(new_slots: &[Slot], relevant: &[Slot], window: &DateWindow) -> Vec<String> {
    let mut lines = Vec::with_capacity(new_slots.len() + relevant.len() + 4);

    if new_slots.is_empty() {
        lines.push(NO_NEW_TICKETS.to_owned());
    } else {
        lines.push("🎉 NEW TICKETS AVAILABLE:".to_owned());
        lines.extend(new_slots.iter().map(|slot| format!("- {}", slot_line(slot))));
    }

    lines.push(String::new());
    lines.push(format!("📅 Filtered tours ({window}):"));
    if relevant.is_empty() {
        lines.push(NONE_PLACEHOLDER.to_owned());
    } else {
        lines.extend(relevant.iter().map(status_line));
    }

    lines
}

/// Push alert listing only the new slots.
pub fn urgent_message(new_slots: &[Slot]) -> String {
    let mut message = String::from("🚨 *New Peace Palace tickets available!*\n\n");
    message.push_str(
        &new_slots
            .iter()
            .map(|slot| format!("• {}", message_slot_line(slot)))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    message
}

/// Silent overview of the whole working set. Never empty.
pub fn digest_message(relevant: &[Slot], window: &DateWindow) -> String {
    let header = format!("📅 *Daily tour overview* ({window}):");
    if relevant.is_empty() {
        return format!("{header}\n{NO_TOURS_FOUND}");
    }
    std::iter::once(header)
        .chain(
            relevant
                .iter()
                .map(|slot| format!("{} {}", status_marker(slot), message_slot_line(slot))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}
