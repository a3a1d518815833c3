use std::io::{self, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use termion::terminal_size;
use unsegen::base::Terminal;
use unsegen::widget::{RenderingHints, Widget};

use super::calendar_window::CalendarWindow;
use super::context::{stats_summary, Context};
use super::heatmap::{self, RenderOptions, Row, Span};
use super::theme::Theme;
use crate::cmds::{self, Cmd, KeyMap};
use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::loader::Loader;
use crate::provider::CalendarModel;

const HELP: &str = "h/l week  j/k day  g/G first/last  r refresh  q quit";

/// Name of the worker thread that loads contributions.
pub const LOAD_THREAD: &str = "ghcal-load";

pub struct App {
    theme: Theme,
    key_map: KeyMap,
    color: bool,
    context: Context,
    loader: Arc<Loader>,
}

impl App {
    pub fn new(config: &Config, loader: Loader, color: bool) -> App {
        App {
            theme: Theme::from_spec(&config.theme),
            key_map: cmds::default_key_map(),
            color,
            context: Context::new(config.counter_duration()),
            loader: Arc::new(loader),
        }
    }

    /// Loads on a worker thread; the result arrives as `Event::Loaded`.
    fn spawn_load(&self, sink: &mpsc::Sender<Event>) {
        let loader = Arc::clone(&self.loader);
        let sink = sink.clone();

        let spawned = thread::Builder::new()
            .name(LOAD_THREAD.to_owned())
            .spawn(move || {
                let snapshot = loader.load_or_placeholder();
                let _ = sink.send(Event::Loaded(Box::new(snapshot)));
            });

        if let Err(e) = spawned {
            log::error!("Could not start loading: {}", e);
        }
    }

    fn rows(&mut self, width: u16) -> Vec<Row> {
        let visible_weeks = heatmap::weeks_fitting(width);
        self.context.scroll_to_cursor(visible_weeks);

        let cursor = self.context.cursor();
        let options = RenderOptions::new(&self.theme)
            .window(self.context.scroll(), visible_weeks)
            .cursor(Some((cursor.week, cursor.weekday)));

        let text = |line: String| vec![Span::Text(line)];

        let mut rows = heatmap::rows(self.context.model(), &options);
        rows.push(Vec::new());
        rows.push(heatmap::legend_row());
        rows.push(text(self.context.status_line()));
        if let Some(stats) = self.context.stats_line() {
            rows.push(text(stats));
        }
        rows.push(Vec::new());
        rows.push(text(HELP.to_owned()));
        rows
    }

    fn draw(&mut self, term: &mut Terminal) {
        let root = term.create_root_window();
        let width = root.get_width().raw_value().max(0) as u16;

        let rows = self.rows(width);
        CalendarWindow::new(&rows, &self.theme, self.color).draw(root, RenderingHints::new());

        term.present();
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.context.begin_loading() {
            self.spawn_load(dispatcher.event_sink());
        }

        let mut size = terminal_size().ok();
        let mut redraw = true;

        while !self.context.should_quit() {
            if redraw {
                self.draw(&mut term);
            }

            redraw = match dispatcher.next()? {
                Event::Update => {
                    // Ticks only matter while counters move or after a resize
                    let animating = self.context.is_animating();
                    self.context.update(Instant::now());

                    let new_size = terminal_size().ok();
                    let resized = new_size != size;
                    size = new_size;

                    animating || resized
                }
                Event::Input(key) => {
                    let cmd = cmds::lookup(&self.key_map, &key);
                    if self.context.handle(cmd) == Cmd::Refresh {
                        self.spawn_load(dispatcher.event_sink());
                    }
                    true
                }
                Event::Loaded(snapshot) => {
                    log::info!("Calendar loaded");
                    self.context.set_snapshot(*snapshot, Instant::now());
                    true
                }
            };
        }

        Ok(())
    }
}

/// Renders the calendar once, without a cursor, for non-interactive output.
pub fn show<W: Write>(
    out: &mut W,
    config: &Config,
    loader: &Loader,
    color: bool,
) -> io::Result<()> {
    let theme = Theme::from_spec(&config.theme);
    let snapshot = loader.load();

    let width = terminal_size().map(|(w, _)| w).unwrap_or(u16::MAX);
    let num_weeks = snapshot.model.num_weeks();
    let visible_weeks = heatmap::weeks_fitting(width).min(num_weeks);
    // Show the most recent weeks when the terminal is too narrow.
    let options = RenderOptions::new(&theme)
        .color(color)
        .window(num_weeks - visible_weeks, visible_weeks);

    for line in heatmap::render(&snapshot.model, &options) {
        writeln!(out, "{}", line)?;
    }
    if !matches!(snapshot.model, CalendarModel::NoData) {
        writeln!(out, "{}", heatmap::legend(&options))?;
    }

    if let Some(stats) = &snapshot.stats {
        writeln!(
            out,
            "{}",
            stats_summary(
                stats.total_contributions,
                stats.public_repos.map(u64::from),
                stats.stars.map(u64::from),
            )
        )?;
    }

    Ok(())
}
