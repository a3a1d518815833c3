use rand::Rng;

use crate::contributions::{Level, DAYS_PER_WEEK};

/// Synthetic calendar shown when no real contribution data could be loaded.
///
/// Levels are random and carry no dates or counts.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderGrid {
    weeks: Vec<[Level; DAYS_PER_WEEK]>,
}

impl PlaceholderGrid {
    pub const WEEKS: usize = 52;

    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let weeks = (0..Self::WEEKS)
            .map(|_| {
                let mut week = [Level::default(); DAYS_PER_WEEK];
                for day in week.iter_mut() {
                    *day = Level::new(rng.gen_range(0..=Level::MAX.value()))
                        .unwrap_or_default();
                }
                week
            })
            .collect();

        PlaceholderGrid { weeks }
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn weeks(&self) -> &[[Level; DAYS_PER_WEEK]] {
        &self.weeks
    }

    pub fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    pub fn level(&self, week: usize, weekday: usize) -> Option<Level> {
        self.weeks.get(week).and_then(|w| w.get(weekday)).copied()
    }
}
