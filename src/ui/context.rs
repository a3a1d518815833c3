use std::time::{Duration, Instant};

use super::counter::{group_digits, Counter};
use super::heatmap;
use crate::cmds::Cmd;
use crate::contributions::{GridCell, DAYS_PER_WEEK};
use crate::loader::Snapshot;
use crate::provider::CalendarModel;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub week: usize,
    pub weekday: usize,
}

#[derive(Clone, Copy, Debug)]
struct StatCounters {
    total: Counter,
    public_repos: Option<Counter>,
    stars: Option<Counter>,
}

/// State shared between input handling and drawing. Handlers mutate it,
/// `update` advances it once per tick and drawing only reads it.
pub struct Context {
    model: CalendarModel,
    counters: Option<StatCounters>,
    counter_duration: Duration,
    cursor: Cursor,
    scroll: usize,
    loading: bool,
    quit: bool,
    now: Instant,
}

impl Context {
    pub fn new(counter_duration: Duration) -> Self {
        Context {
            model: CalendarModel::NoData,
            counters: None,
            counter_duration,
            cursor: Cursor::default(),
            scroll: 0,
            loading: false,
            quit: false,
            now: Instant::now(),
        }
    }

    pub fn model(&self) -> &CalendarModel {
        &self.model
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn update(&mut self, now: Instant) {
        self.now = now;
    }

    /// Whether any counter still moves, i.e. a tick changes what is drawn.
    pub fn is_animating(&self) -> bool {
        self.counters.as_ref().map_or(false, |counters| {
            !counters.total.is_done(self.now)
                || counters.public_repos.map_or(false, |c| !c.is_done(self.now))
                || counters.stars.map_or(false, |c| !c.is_done(self.now))
        })
    }

    /// Marks a load as in flight. Returns `false` if one already is.
    pub fn begin_loading(&mut self) -> bool {
        if self.loading {
            log::debug!("Refresh ignored, a load is already in flight");
            return false;
        }
        self.loading = true;
        true
    }

    /// Replaces the previous model with a freshly loaded one.
    pub fn set_snapshot(&mut self, snapshot: Snapshot, now: Instant) {
        self.loading = false;
        self.now = now;
        self.model = snapshot.model;
        self.counters = snapshot.stats.as_ref().map(|stats| StatCounters {
            total: Counter::new(stats.total_contributions, now, self.counter_duration),
            public_repos: stats
                .public_repos
                .map(|n| Counter::new(n as u64, now, self.counter_duration)),
            stars: stats
                .stars
                .map(|n| Counter::new(n as u64, now, self.counter_duration)),
        });
        self.scroll = 0;
        self.cursor = self.last_cell();
    }

    /// Applies a navigation or control command. Returns `Cmd::Refresh` if the
    /// caller has to start a load.
    pub fn handle(&mut self, cmd: Cmd) -> Cmd {
        match cmd {
            Cmd::NextWeek => self.move_cursor(1, 0),
            Cmd::PrevWeek => self.move_cursor(-1, 0),
            Cmd::NextDay => self.move_cursor(0, 1),
            Cmd::PrevDay => self.move_cursor(0, -1),
            Cmd::FirstWeek => {
                self.cursor.week = 0;
                self.clamp_cursor();
            }
            Cmd::LastWeek => self.cursor = self.last_cell(),
            Cmd::Refresh => {
                if self.begin_loading() {
                    return Cmd::Refresh;
                }
            }
            Cmd::Exit => self.quit = true,
            Cmd::Noop => {}
        }
        Cmd::Noop
    }

    fn num_weeks(&self) -> usize {
        self.model.num_weeks()
    }

    fn has_cell(&self, week: usize, weekday: usize) -> bool {
        match &self.model {
            CalendarModel::Contributions(grid) => grid
                .cell(week, weekday)
                .map_or(false, |cell| !cell.is_empty()),
            CalendarModel::Placeholder(grid) => grid.level(week, weekday).is_some(),
            CalendarModel::NoData => false,
        }
    }

    fn last_cell(&self) -> Cursor {
        let week = self.num_weeks().saturating_sub(1);
        let weekday = (0..DAYS_PER_WEEK)
            .rev()
            .find(|&day| self.has_cell(week, day))
            .unwrap_or(0);
        Cursor { week, weekday }
    }

    fn move_cursor(&mut self, weeks: isize, days: isize) {
        let week = self.cursor.week as isize + weeks;
        let weekday = self.cursor.weekday as isize + days;

        if week < 0 || weekday < 0 || weekday >= DAYS_PER_WEEK as isize {
            return;
        }

        let (week, weekday) = (week as usize, weekday as usize);
        if self.has_cell(week, weekday) {
            self.cursor = Cursor { week, weekday };
        }
    }

    /// Moves the cursor onto the nearest existing cell of its week.
    fn clamp_cursor(&mut self) {
        let week = self.cursor.week.min(self.num_weeks().saturating_sub(1));
        let weekday = (self.cursor.weekday..DAYS_PER_WEEK)
            .chain((0..self.cursor.weekday).rev())
            .find(|&day| self.has_cell(week, day))
            .unwrap_or(0);
        self.cursor = Cursor { week, weekday };
    }

    /// Keeps the cursor inside a window of `visible_weeks` columns.
    pub fn scroll_to_cursor(&mut self, visible_weeks: usize) {
        if visible_weeks == 0 {
            return;
        }
        if self.cursor.week < self.scroll {
            self.scroll = self.cursor.week;
        } else if self.cursor.week >= self.scroll + visible_weeks {
            self.scroll = self.cursor.week + 1 - visible_weeks;
        }
    }

    pub fn selected_cell(&self) -> Option<&GridCell> {
        match &self.model {
            CalendarModel::Contributions(grid) => grid.cell(self.cursor.week, self.cursor.weekday),
            _ => None,
        }
    }

    /// Text shown under the calendar.
    pub fn status_line(&self) -> String {
        if self.loading {
            return "Loading contributions...".to_owned();
        }
        match &self.model {
            CalendarModel::Contributions(_) => self
                .selected_cell()
                .and_then(heatmap::describe)
                .unwrap_or_default(),
            CalendarModel::Placeholder(_) => "Contribution data".to_owned(),
            CalendarModel::NoData => String::new(),
        }
    }

    pub fn stats_line(&self) -> Option<String> {
        let counters = self.counters.as_ref()?;
        Some(stats_summary(
            counters.total.value_at(self.now),
            counters.public_repos.map(|c| c.value_at(self.now)),
            counters.stars.map(|c| c.value_at(self.now)),
        ))
    }
}

pub fn stats_summary(total: u64, public_repos: Option<u64>, stars: Option<u64>) -> String {
    let mut parts = vec![format!(
        "{} contributions in the last year",
        group_digits(total)
    )];
    if let Some(repos) = public_repos {
        parts.push(format!("{} public repos", group_digits(repos)));
    }
    if let Some(stars) = stars {
        parts.push(format!("{} stars", group_digits(stars)));
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributions::ContributionRecord;
    use crate::placeholder::PlaceholderGrid;
    use crate::stats::ProfileStats;
    use chrono::{Duration as ChronoDuration, NaiveDate};

    fn snapshot(start: (i32, u32, u32), days: usize) -> Snapshot {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        let records: Vec<_> = (0..days)
            .map(|i| ContributionRecord::new(start + ChronoDuration::days(i as i64), i as u32))
            .collect();
        Snapshot {
            model: CalendarModel::from_records(&records),
            stats: Some(ProfileStats {
                total_contributions: 1200,
                public_repos: Some(12),
                stars: None,
            }),
        }
    }

    fn loaded_context() -> (Context, Instant) {
        let now = Instant::now();
        let mut context = Context::new(Duration::from_millis(1000));
        assert!(context.begin_loading());
        // Wednesday 2024-01-03 plus 10 days ends on Friday 2024-01-12
        context.set_snapshot(snapshot((2024, 1, 3), 10), now);
        (context, now)
    }

    #[test]
    fn cursor_starts_on_last_day() {
        let (context, _) = loaded_context();
        assert!(!context.is_loading());
        assert_eq!(context.cursor(), Cursor { week: 1, weekday: 5 });
        assert_eq!(
            context.status_line(),
            "9 contributions on Fri, Jan 12, 2024"
        );
    }

    #[test]
    fn cursor_stays_on_cells() {
        let (mut context, _) = loaded_context();

        context.handle(Cmd::NextDay);
        // Saturday of the short last week does not exist
        assert_eq!(context.cursor(), Cursor { week: 1, weekday: 5 });

        context.handle(Cmd::NextWeek);
        assert_eq!(context.cursor(), Cursor { week: 1, weekday: 5 });

        context.handle(Cmd::PrevWeek);
        assert_eq!(context.cursor(), Cursor { week: 0, weekday: 5 });

        context.handle(Cmd::FirstWeek);
        assert_eq!(context.cursor(), Cursor { week: 0, weekday: 5 });

        for _ in 0..3 {
            context.handle(Cmd::PrevDay);
        }
        assert_eq!(context.cursor(), Cursor { week: 0, weekday: 3 });
        // Tuesday is padding
        context.handle(Cmd::PrevDay);
        assert_eq!(context.cursor(), Cursor { week: 0, weekday: 3 });

        context.handle(Cmd::LastWeek);
        assert_eq!(context.cursor(), Cursor { week: 1, weekday: 5 });
    }

    #[test]
    fn single_load_in_flight() {
        let (mut context, now) = loaded_context();

        assert_eq!(context.handle(Cmd::Refresh), Cmd::Refresh);
        assert_eq!(context.handle(Cmd::Refresh), Cmd::Noop);
        assert_eq!(context.status_line(), "Loading contributions...");

        context.set_snapshot(
            Snapshot {
                model: CalendarModel::NoData,
                stats: None,
            },
            now,
        );
        assert_eq!(context.handle(Cmd::Refresh), Cmd::Refresh);
    }

    #[test]
    fn counters_animate() {
        let (mut context, now) = loaded_context();

        assert_eq!(
            context.stats_line().unwrap(),
            "0 contributions in the last year | 0 public repos"
        );

        assert!(context.is_animating());

        context.update(now + Duration::from_secs(5));
        assert!(!context.is_animating());
        assert_eq!(
            context.stats_line().unwrap(),
            "1,200 contributions in the last year | 12 public repos"
        );
    }

    #[test]
    fn placeholder_has_no_stats() {
        let mut context = Context::new(Duration::from_millis(1000));
        context.set_snapshot(
            Snapshot {
                model: CalendarModel::Placeholder(PlaceholderGrid::random()),
                stats: None,
            },
            Instant::now(),
        );

        assert_eq!(context.stats_line(), None);
        assert!(!context.is_animating());
        assert_eq!(context.status_line(), "Contribution data");
        assert_eq!(context.cursor(), Cursor { week: 51, weekday: 6 });
    }

    #[test]
    fn scrolls_with_cursor() {
        let mut context = Context::new(Duration::from_millis(0));
        context.set_snapshot(snapshot((2024, 1, 7), 70), Instant::now());

        context.scroll_to_cursor(4);
        assert_eq!(context.scroll(), 6);

        context.handle(Cmd::FirstWeek);
        context.scroll_to_cursor(4);
        assert_eq!(context.scroll(), 0);

        context.handle(Cmd::Exit);
        assert!(context.should_quit());
    }
}
