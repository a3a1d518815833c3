use termion::color::Rgb;

use crate::config::ThemeSpec;
use crate::contributions::Level;

/// Plain glyphs used when colours are disabled, lightest first.
pub const PLAIN_GLYPHS: [char; Level::COUNT] = ['·', '░', '▒', '▓', '█'];

#[derive(Clone, Debug)]
pub struct Theme {
    pub levels: [Rgb; Level::COUNT],
    pub glyph: char,
    pub placeholder_caption: &'static str,
    pub no_data_caption: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_spec(&ThemeSpec::default())
    }
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let fallback = ThemeSpec::default();

        let mut levels = [Rgb(0, 0, 0); Level::COUNT];
        for (i, color) in levels.iter_mut().enumerate() {
            *color = parse_hex(&spec.levels[i])
                .or_else(|| {
                    log::warn!("Invalid colour '{}' for level {}", spec.levels[i], i);
                    parse_hex(&fallback.levels[i])
                })
                .unwrap_or(Rgb(0x80, 0x80, 0x80));
        }

        Theme {
            levels,
            glyph: spec.glyph,
            placeholder_caption: "Contribution data unavailable, showing placeholder",
            no_data_caption: "No contribution data available",
        }
    }

    pub fn color(&self, level: Level) -> Rgb {
        self.levels[level.index()]
    }

    pub fn plain_glyph(level: Level) -> char {
        PLAIN_GLYPHS[level.index()]
    }
}

/// Parses `#rrggbb` or `rrggbb`.
pub fn parse_hex(color: &str) -> Option<Rgb> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
}
