use clap::ValueEnum;
use color_eyre::Result;
use log::{error, info};
use strum_macros::Display;

use crate::diff::compute_diff;
use crate::fetcher::{DateWindow, SlotSource};
use crate::filter::{Filter, Partition};
use crate::notify::Notifier;
use crate::report::{build_report, digest_message, urgent_message};
use crate::storage::Storage;

/// Which notification, if any, a run sends.
#[derive(ValueEnum, Display, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
    /// Report and persist only.
    #[default]
    None,
    /// Push alert when new slots appeared.
    New,
    /// Silent overview of every relevant slot.
    All,
}

impl RunMode {
    pub const fn notifies(self) -> bool {
        !matches!(self, Self::None)
    }
}

pub struct CycleSettings<'a> {
    pub filter: &'a Filter,
    pub window: DateWindow,
    pub only_available: bool,
    pub mode: RunMode,
}

#[derive(Debug)]
pub struct CycleSummary {
    pub relevant: usize,
    pub available: usize,
    pub new: usize,
    pub notified: bool,
}

/// One fetch, filter, diff, report, persist, notify pass.
///
/// A failed fetch returns before anything is written. A failed send is
/// logged and does not fail the cycle; a failed write does.
pub fn run_cycle(
    source: &impl SlotSource,
    storage: &mut impl Storage,
    notifier: Option<&dyn Notifier>,
    settings: &CycleSettings<'_>,
) -> Result<CycleSummary> {
    let fetched = source.fetch(&settings.window)?;
    info!("Fetched {} slots for {}", fetched.len(), settings.window);

    let partition = Partition::split(settings.filter.apply(&fetched));
    let previous = storage.load_snapshot()?;
    let diff = compute_diff(&previous, &partition.available);
    let relevant = partition.working_set(settings.only_available);

    let report = build_report(&diff.new_slots, relevant, &settings.window);
    println!("{}", report.join("\n"));
    storage.write_report(&report)?;
    storage.save_snapshot(&partition.available)?;

    let message = match settings.mode {
        RunMode::New if !diff.is_empty() => Some((urgent_message(&diff.new_slots), false)),
        RunMode::All => Some((digest_message(relevant, &settings.window), true)),
        _ => None,
    };

    let mut notified = false;
    if let Some((text, silent)) = message {
        match notifier {
            Some(notifier) => match notifier.notify(&text, silent) {
                Ok(()) => notified = true,
                Err(err) => error!("Failed to send notification: {err:?}"),
            },
            None => error!("Run mode {} needs a notifier, none configured", settings.mode),
        }
    }

    Ok(CycleSummary {
        relevant: relevant.len(),
        available: partition.available.len(),
        new: diff.new_slots.len(),
        notified,
    })
}
