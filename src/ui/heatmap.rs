use termion::color::{Fg, Reset};
use termion::style;

use super::theme::Theme;
use crate::contributions::{ContributionGrid, GridCell, Level, DAYS_PER_WEEK};
use crate::placeholder::PlaceholderGrid;
use crate::provider::CalendarModel;

const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];
const GUTTER_WIDTH: usize = 4;
const CELL_WIDTH: usize = 2;

/// Piece of a drawn row: plain text or one shaded cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Span {
    Text(String),
    Cell { level: Level, selected: bool },
}

pub type Row = Vec<Span>;

pub struct RenderOptions<'a> {
    pub theme: &'a Theme,
    pub color: bool,
    pub first_week: usize,
    pub max_weeks: usize,
    /// Selected `(week, weekday)`.
    pub cursor: Option<(usize, usize)>,
}

impl<'a> RenderOptions<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        RenderOptions {
            theme,
            color: true,
            first_week: 0,
            max_weeks: usize::MAX,
            cursor: None,
        }
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn window(mut self, first_week: usize, max_weeks: usize) -> Self {
        self.first_week = first_week;
        self.max_weeks = max_weeks;
        self
    }

    pub fn cursor(mut self, cursor: Option<(usize, usize)>) -> Self {
        self.cursor = cursor;
        self
    }

    fn visible(&self, num_weeks: usize) -> std::ops::Range<usize> {
        let first = self.first_week.min(num_weeks);
        let last = first.saturating_add(self.max_weeks).min(num_weeks);
        first..last
    }

    fn paint(&self, level: Level, selected: bool) -> String {
        if self.color {
            let glyph = format!(
                "{}{}{}",
                Fg(self.theme.color(level)),
                self.theme.glyph,
                Fg(Reset)
            );
            if selected {
                format!("{}{}{} ", style::Invert, glyph, style::Reset)
            } else {
                format!("{} ", glyph)
            }
        } else {
            plain_cell(level, selected)
        }
    }

    /// Flattens a row into a line of text, with colour escapes if enabled.
    pub fn format_row(&self, row: &[Span]) -> String {
        let line: String = row
            .iter()
            .map(|span| match span {
                Span::Text(text) => text.clone(),
                Span::Cell { level, selected } => self.paint(*level, *selected),
            })
            .collect();
        line.trim_end().to_owned()
    }
}

/// Uncoloured cell, the selected one marked with `<`.
pub fn plain_cell(level: Level, selected: bool) -> String {
    let marker = if selected { '<' } else { ' ' };
    format!("{}{}", Theme::plain_glyph(level), marker)
}

/// Number of week columns that fit into `width` terminal columns.
pub fn weeks_fitting(width: u16) -> usize {
    (width as usize).saturating_sub(GUTTER_WIDTH) / CELL_WIDTH
}

pub fn render(model: &CalendarModel, options: &RenderOptions) -> Vec<String> {
    rows(model, options)
        .iter()
        .map(|row| options.format_row(row))
        .collect()
}

pub fn rows(model: &CalendarModel, options: &RenderOptions) -> Vec<Row> {
    match model {
        CalendarModel::Contributions(grid) => grid_rows(grid, options),
        CalendarModel::Placeholder(grid) => placeholder_rows(grid, options),
        CalendarModel::NoData => vec![vec![Span::Text(
            options.theme.no_data_caption.to_owned(),
        )]],
    }
}

fn month_row(grid: &ContributionGrid, visible: &std::ops::Range<usize>) -> String {
    let mut row = " ".repeat(GUTTER_WIDTH + CELL_WIDTH * visible.len());
    let mut next_free = 0;

    for label in grid
        .month_labels()
        .iter()
        .filter(|label| visible.contains(&label.week_index))
    {
        let column = GUTTER_WIDTH + CELL_WIDTH * (label.week_index - visible.start);
        if column < next_free {
            continue;
        }

        let end = column + label.name.len();
        if end > row.len() {
            row.push_str(&" ".repeat(end - row.len()));
        }
        row.replace_range(column..end, label.name);
        next_free = end + 1;
    }

    row.trim_end().to_owned()
}

fn day_label(label: &str) -> Span {
    Span::Text(format!("{:<width$}", label, width = GUTTER_WIDTH))
}

fn grid_rows(grid: &ContributionGrid, options: &RenderOptions) -> Vec<Row> {
    let visible = options.visible(grid.num_weeks());
    let mut rows = Vec::with_capacity(DAYS_PER_WEEK + 1);

    rows.push(vec![Span::Text(month_row(grid, &visible))]);

    for (weekday, label) in DAY_LABELS.iter().enumerate() {
        let mut row = vec![day_label(label)];

        for week in visible.clone() {
            match grid.cell(week, weekday) {
                Some(GridCell::Filled { level, .. }) => row.push(Span::Cell {
                    level: *level,
                    selected: options.cursor == Some((week, weekday)),
                }),
                Some(GridCell::Empty) | None => row.push(Span::Text("  ".to_owned())),
            }
        }

        rows.push(row);
    }

    rows
}

fn placeholder_rows(grid: &PlaceholderGrid, options: &RenderOptions) -> Vec<Row> {
    let visible = options.visible(grid.num_weeks());
    let mut rows = Vec::with_capacity(DAYS_PER_WEEK + 1);

    for (weekday, label) in DAY_LABELS.iter().enumerate() {
        let mut row = vec![day_label(label)];

        for week in visible.clone() {
            if let Some(level) = grid.level(week, weekday) {
                row.push(Span::Cell {
                    level,
                    selected: options.cursor == Some((week, weekday)),
                });
            }
        }

        rows.push(row);
    }

    rows.push(vec![Span::Text(
        options.theme.placeholder_caption.to_owned(),
    )]);
    rows
}

/// Tooltip for a cell, e.g. `"5 contributions on Wed, Jan 3, 2024"`.
pub fn describe(cell: &GridCell) -> Option<String> {
    match cell {
        GridCell::Filled { date, count, .. } => {
            let amount = match count {
                0 => "No contributions".to_owned(),
                1 => "1 contribution".to_owned(),
                n => format!("{} contributions", n),
            };
            Some(format!("{} on {}", amount, date.format("%a, %b %-d, %Y")))
        }
        GridCell::Empty => None,
    }
}

/// Colour key from level 0 to level 4.
pub fn legend_row() -> Row {
    let mut row = vec![Span::Text("Less ".to_owned())];
    row.extend(
        (0..Level::COUNT as u8)
            .filter_map(Level::new)
            .map(|level| Span::Cell {
                level,
                selected: false,
            }),
    );
    row.push(Span::Text("More".to_owned()));
    row
}

pub fn legend(options: &RenderOptions) -> String {
    options.format_row(&legend_row())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributions::ContributionRecord;
    use chrono::{Duration, NaiveDate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn model(start: NaiveDate, counts: &[u32]) -> CalendarModel {
        let records: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ContributionRecord::new(start + Duration::days(i as i64), count))
            .collect();
        CalendarModel::from_records(&records)
    }

    #[test]
    fn single_wednesday_record() {
        let theme = Theme::default();
        let lines = render(
            &model(date(2024, 1, 3), &[5]),
            &RenderOptions::new(&theme).color(false),
        );

        assert_eq!(lines, vec!["    Jan", "", "Mon", "", "Wed ▒", "", "Fri", ""]);
    }

    #[test]
    fn cursor_is_marked() {
        let theme = Theme::default();
        let lines = render(
            &model(date(2024, 1, 7), &[0, 12]),
            &RenderOptions::new(&theme)
                .color(false)
                .cursor(Some((0, 1))),
        );

        assert_eq!(lines[1], "    ·");
        assert_eq!(lines[2], "Mon █<");
    }

    #[test]
    fn window_hides_labels_outside() {
        let theme = Theme::default();
        // Sunday 2024-01-07 through Saturday 2024-03-02: eight full weeks
        let lines = render(
            &model(date(2024, 1, 7), &[1; 56]),
            &RenderOptions::new(&theme).color(false).window(4, 3),
        );

        // Weeks 4..7 start on Feb 4, Feb 11 and Feb 18
        assert_eq!(lines[0], "    Feb");
        assert_eq!(lines[1], "    ░ ░ ░");
    }

    #[test]
    fn overlapping_labels_are_skipped() {
        let theme = Theme::default();
        // Dec 31 (Sunday) week is labelled Dec, the next week Jan; adjacent
        // columns are only two characters apart.
        let lines = render(
            &model(date(2023, 12, 31), &[0; 14]),
            &RenderOptions::new(&theme).color(false),
        );
        assert_eq!(lines[0], "    Dec");
    }

    #[test]
    fn no_data_caption() {
        let theme = Theme::default();
        let lines = render(&CalendarModel::NoData, &RenderOptions::new(&theme));
        assert_eq!(lines, vec!["No contribution data available".to_owned()]);
    }

    #[test]
    fn placeholder_is_captioned() {
        let theme = Theme::default();
        let model =
            CalendarModel::Placeholder(PlaceholderGrid::generate(&mut StdRng::seed_from_u64(3)));
        let lines = render(&model, &RenderOptions::new(&theme).color(false));

        assert_eq!(lines.len(), DAYS_PER_WEEK + 1);
        assert_eq!(lines[DAYS_PER_WEEK], theme.placeholder_caption);
        assert_eq!(lines[2].chars().count(), GUTTER_WIDTH + CELL_WIDTH * 52 - 1);
    }

    #[test]
    fn coloured_cells_use_level_colour() {
        let theme = Theme::default();
        let lines = render(&model(date(2024, 1, 7), &[10]), &RenderOptions::new(&theme));
        assert!(lines[1].contains(&Fg(theme.color(Level::MAX)).to_string()));
        assert!(lines[1].contains('■'));
    }

    #[test]
    fn tooltips() {
        let cell = GridCell::Filled {
            date: date(2024, 1, 3),
            count: 5,
            level: Level::from_count(5),
        };
        assert_eq!(
            describe(&cell).unwrap(),
            "5 contributions on Wed, Jan 3, 2024"
        );

        let single = GridCell::Filled {
            date: date(2024, 2, 1),
            count: 1,
            level: Level::from_count(1),
        };
        assert_eq!(
            describe(&single).unwrap(),
            "1 contribution on Thu, Feb 1, 2024"
        );
        let idle = GridCell::Filled {
            date: date(2024, 2, 2),
            count: 0,
            level: Level::from_count(0),
        };
        assert_eq!(
            describe(&idle).unwrap(),
            "No contributions on Fri, Feb 2, 2024"
        );
        assert_eq!(describe(&GridCell::Empty), None);
    }

    #[test]
    fn plain_legend() {
        let theme = Theme::default();
        assert_eq!(
            legend(&RenderOptions::new(&theme).color(false)),
            "Less · ░ ▒ ▓ █ More"
        );
    }

    #[test]
    fn fitting_weeks() {
        assert_eq!(weeks_fitting(0), 0);
        assert_eq!(weeks_fitting(80), 38);
    }

    #[test]
    fn rows_carry_cells_without_escapes() {
        let theme = Theme::default();
        let rows = rows(
            &model(date(2024, 1, 7), &[0, 12]),
            &RenderOptions::new(&theme).cursor(Some((0, 1))),
        );

        assert_eq!(
            rows[2],
            vec![
                Span::Text("Mon ".to_owned()),
                Span::Cell {
                    level: Level::MAX,
                    selected: true
                },
            ]
        );
        for row in &rows {
            for span in row {
                if let Span::Text(text) = span {
                    assert!(!text.contains('\x1b'), "escape in {:?}", text);
                }
            }
        }
    }
}
