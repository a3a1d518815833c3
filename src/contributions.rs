use chrono::{Datelike, Month, NaiveDate};
use derive_more::Constructor;
use num_traits::FromPrimitive;
use serde::Deserialize;
use std::fmt;

pub const DAYS_PER_WEEK: usize = 7;

/// One day of activity as delivered by the contributions API.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Constructor)]
pub struct ContributionRecord {
    pub date: NaiveDate,
    pub count: u32,
}

/// Intensity bucket used for shading, always in `0..=4`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MAX: Level = Level(4);
    pub const COUNT: usize = 5;

    /// Thresholds match the legend of the GitHub contribution graph.
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Level(0),
            1..=3 => Level(1),
            4..=6 => Level(2),
            7..=9 => Level(3),
            _ => Level(4),
        }
    }

    pub fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Level(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    Filled {
        date: NaiveDate,
        count: u32,
        level: Level,
    },
}

impl GridCell {
    fn from_record(record: &ContributionRecord) -> Self {
        GridCell::Filled {
            date: record.date,
            count: record.count,
            level: Level::from_count(record.count),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GridCell::Filled { date, .. } => Some(*date),
            GridCell::Empty => None,
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            GridCell::Filled { level, .. } => Some(*level),
            GridCell::Empty => None,
        }
    }
}

/// Cells of one calendar column, index 0 is Sunday.
pub type Week = Vec<GridCell>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthLabel {
    pub week_index: usize,
    pub name: &'static str,
}

/// Signals a well-formed but empty record sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no contribution data available")
    }
}

impl std::error::Error for NoData {}

/// Three letter month abbreviation, e.g. `"Jan"`.
pub fn month_name(date: &NaiveDate) -> &'static str {
    Month::from_u32(date.month()).map_or("", |month| &month.name()[..3])
}

/// Weeks of contribution cells plus the month captions above them.
///
/// The last week is left short when the records end mid-week; every other
/// week holds exactly [`DAYS_PER_WEEK`] cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ContributionGrid {
    weeks: Vec<Week>,
    month_labels: Vec<MonthLabel>,
}

impl ContributionGrid {
    pub fn build(records: &[ContributionRecord]) -> Result<Self, NoData> {
        let first = records.first().ok_or(NoData)?;

        let leading = first.date.weekday().num_days_from_sunday() as usize;

        let mut weeks: Vec<Week> = Vec::with_capacity(records.len() / DAYS_PER_WEEK + 2);
        let mut current: Week = vec![GridCell::Empty; leading];

        for record in records {
            current.push(GridCell::from_record(record));

            if current.len() == DAYS_PER_WEEK {
                weeks.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(DAYS_PER_WEEK),
                ));
            }
        }

        if !current.is_empty() {
            weeks.push(current);
        }

        let month_labels = Self::label_months(&weeks);

        log::debug!(
            "Built contribution grid: {} records, {} weeks, {} month labels",
            records.len(),
            weeks.len(),
            month_labels.len()
        );

        Ok(ContributionGrid {
            weeks,
            month_labels,
        })
    }

    fn label_months(weeks: &[Week]) -> Vec<MonthLabel> {
        let mut labels = Vec::new();
        let mut last_seen: Option<(i32, u32)> = None;

        for (week_index, week) in weeks.iter().enumerate() {
            let date = match week.iter().find_map(GridCell::date) {
                Some(date) => date,
                None => continue,
            };

            let month = (date.year(), date.month());
            if last_seen != Some(month) {
                labels.push(MonthLabel {
                    week_index,
                    name: month_name(&date),
                });
                last_seen = Some(month);
            }
        }

        labels
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn month_labels(&self) -> &[MonthLabel] {
        &self.month_labels
    }

    pub fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    pub fn cell(&self, week: usize, weekday: usize) -> Option<&GridCell> {
        self.weeks.get(week).and_then(|w| w.get(weekday))
    }

    pub fn filled_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks
            .iter()
            .flat_map(|week| week.iter())
            .filter(|cell| !cell.is_empty())
    }

    pub fn total_count(&self) -> u64 {
        self.filled_cells()
            .map(|cell| match cell {
                GridCell::Filled { count, .. } => *count as u64,
                GridCell::Empty => 0,
            })
            .sum()
    }

    /// Highest daily count, `None` when every cell is padding.
    pub fn max_count(&self) -> Option<u32> {
        self.filled_cells()
            .filter_map(|cell| match cell {
                GridCell::Filled { count, .. } => Some(*count),
                GridCell::Empty => None,
            })
            .max()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.filled_cells().find_map(GridCell::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks
            .iter()
            .rev()
            .flat_map(|week| week.iter().rev())
            .find_map(GridCell::date)
    }
}
