use serde::Deserialize;
use std::collections::BTreeMap;

use crate::contributions::{ContributionGrid, ContributionRecord, NoData};
use crate::placeholder::PlaceholderGrid;

pub mod error;
pub mod file;
pub mod github;

pub use error::*;
pub use file::FileContributions;
pub use github::GithubContributions;

/// Body of a contributions API response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ContributionResponse {
    #[serde(default)]
    pub total: BTreeMap<String, u32>,
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
}

impl ContributionResponse {
    pub const LAST_YEAR_KEY: &'static str = "lastYear";

    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Total reported by the API for the last year, falling back to the sum
    /// of the daily counts.
    pub fn total_contributions(&self) -> u64 {
        match self.total.get(Self::LAST_YEAR_KEY) {
            Some(&total) if total > 0 => total as u64,
            _ => self
                .contributions
                .iter()
                .map(|record| record.count as u64)
                .sum(),
        }
    }
}

pub trait ContributionSource: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<ContributionResponse>;
}

/// Presentation model handed to the UI.
#[derive(Clone, Debug, PartialEq)]
pub enum CalendarModel {
    Contributions(ContributionGrid),
    NoData,
    Placeholder(PlaceholderGrid),
}

impl CalendarModel {
    pub fn from_records(records: &[ContributionRecord]) -> Self {
        match ContributionGrid::build(records) {
            Ok(grid) => CalendarModel::Contributions(grid),
            Err(NoData) => CalendarModel::NoData,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CalendarModel::Placeholder(_))
    }

    pub fn num_weeks(&self) -> usize {
        match self {
            CalendarModel::Contributions(grid) => grid.num_weeks(),
            CalendarModel::Placeholder(grid) => grid.num_weeks(),
            CalendarModel::NoData => 0,
        }
    }
}

/// Outcome of one load: the model plus the response it was built from.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub model: CalendarModel,
    pub response: Option<ContributionResponse>,
}

/// Fetches from `source` and builds a fresh model. Never fails: transport
/// and parse errors yield a placeholder.
pub fn load_calendar(source: &dyn ContributionSource) -> Loaded {
    log::info!("Loading contributions from {}", source.name());

    match source.fetch() {
        Ok(response) => {
            let model = CalendarModel::from_records(&response.contributions);
            if let CalendarModel::NoData = model {
                log::info!("{} returned no contribution data", source.name());
            }
            Loaded {
                model,
                response: Some(response),
            }
        }
        Err(e) => {
            log::error!("Contribution calendar error: {}", e);
            Loaded {
                model: CalendarModel::Placeholder(PlaceholderGrid::random()),
                response: None,
            }
        }
    }
}
