use std::fmt::Write;

use termion::color::Rgb;
use unsegen::base::*;
use unsegen::widget::*;

use super::heatmap::{plain_cell, Row, Span};
use super::theme::Theme;
use crate::contributions::Level;

/// Draws prepared heatmap rows, one terminal line each.
pub struct CalendarWindow<'a> {
    rows: &'a [Row],
    theme: &'a Theme,
    color: bool,
}

impl<'a> CalendarWindow<'a> {
    pub fn new(rows: &'a [Row], theme: &'a Theme, color: bool) -> Self {
        CalendarWindow { rows, theme, color }
    }

    fn cell_style(&self, level: Level, selected: bool) -> StyleModifier {
        let Rgb(r, g, b) = self.theme.color(level);
        let style = StyleModifier::new().fg_color(Color::Rgb { r, g, b });
        if selected {
            style.invert(true)
        } else {
            style
        }
    }
}

impl Widget for CalendarWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::at_least(self.rows.len()),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);

        for row in self.rows {
            for span in row {
                let written = match span {
                    Span::Text(text) => write!(&mut cursor, "{}", text),
                    Span::Cell { level, selected } if self.color => {
                        let saved_style = cursor.get_style_modifier();
                        cursor.apply_style_modifier(self.cell_style(*level, *selected));
                        let glyph = write!(&mut cursor, "{}", self.theme.glyph);
                        cursor.set_style_modifier(saved_style);
                        glyph.and_then(|_| write!(&mut cursor, " "))
                    }
                    Span::Cell { level, selected } => {
                        write!(&mut cursor, "{}", plain_cell(*level, *selected))
                    }
                };

                if let Err(err) = written {
                    log::warn!("Error while drawing calendar: {}", err);
                }
            }

            cursor.fill_and_wrap_line();
        }
    }
}
