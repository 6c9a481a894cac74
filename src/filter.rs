use log::debug;
use strum::VariantArray;
use strum_macros::{Display, VariantArray};

use crate::config::Config;
use crate::fetcher::{Slot, Slots};

/// A tag recognised by plain substring search in a lower-cased description.
///
/// Matching is not word-aware: `eng` also hits "challenge", `ned` hits
/// "planned". Those false positives are accepted.
pub trait Keywords {
    fn keywords(&self) -> &'static [&'static str];

    fn matches(&self, lower_description: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| lower_description.contains(keyword))
    }
}

#[derive(Display, Debug, VariantArray, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Dutch,
}

impl Keywords for Language {
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::English => &["english", "eng"],
            Self::Dutch => &["dutch", "nederlands", "ned"],
        }
    }
}

#[derive(Display, Debug, VariantArray, Clone, Copy, PartialEq, Eq)]
pub enum TourType {
    #[strum(to_string = "Inside the palace")]
    Inside,
    Garden,
}

impl Keywords for TourType {
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Inside => &["inside the palace", "in het paleis"],
            Self::Garden => &["garden", "tuinrondleiding"],
        }
    }
}

/// Decides which slots are worth reporting.
///
/// A slot is relevant when its description matches one of the enabled
/// languages *and* one of the enabled tour types. An empty group matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub languages: Vec<Language>,
    pub tour_types: Vec<TourType>,
}

impl Filter {
    pub fn from_config(config: &Config) -> Self {
        let languages = Language::VARIANTS
            .iter()
            .copied()
            .filter(|language| match language {
                Language::English => config.include_english,
                Language::Dutch => config.include_dutch,
            })
            .collect();
        let tour_types = TourType::VARIANTS
            .iter()
            .copied()
            .filter(|tour_type| match tour_type {
                TourType::Inside => config.include_inside,
                TourType::Garden => config.include_garden,
            })
            .collect();
        Self {
            languages,
            tour_types,
        }
    }

    pub fn matches_language(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.languages.iter().any(|language| language.matches(&lower))
    }

    pub fn matches_tour_type(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.tour_types.iter().any(|tour_type| tour_type.matches(&lower))
    }

    pub fn is_relevant(&self, slot: &Slot) -> bool {
        self.matches_language(&slot.description) && self.matches_tour_type(&slot.description)
    }

    pub fn apply(&self, slots: &[Slot]) -> Slots {
        let relevant: Slots = slots
            .iter()
            .filter(|slot| self.is_relevant(slot))
            .cloned()
            .collect();
        debug!("{} of {} slots are relevant", relevant.len(), slots.len());
        relevant
    }
}

/// Relevant slots split by availability. `available` is always a subset of `all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub all: Slots,
    pub available: Slots,
}

impl Partition {
    pub fn split(relevant: Slots) -> Self {
        let available = relevant
            .iter()
            .filter(|slot| slot.is_available())
            .cloned()
            .collect();
        Self {
            all: relevant,
            available,
        }
    }

    /// The set the report and notifications are built from.
    pub fn working_set(&self, only_available: bool) -> &[Slot] {
        if only_available {
            &self.available
        } else {
            &self.all
        }
    }
}
