pub mod app;
pub mod calendar_window;
pub mod context;
pub mod counter;
pub mod heatmap;
pub mod theme;

pub use app::App;
pub use calendar_window::CalendarWindow;
pub use context::{Context, Cursor};
pub use theme::Theme;
