extern crate ghcal as lib;

use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::loader::Loader;
use lib::ui::app::{self, App, LOAD_THREAD};
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ghcal",
    about = "Heatmap of a GitHub user's contribution calendar in the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "u", long = "user", help = "GitHub user name")]
    pub user: Option<String>,

    #[structopt(
        short = "i",
        long = "input",
        help = "saved contributions API response to show instead of fetching",
        parse(from_os_str)
    )]
    pub input: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "no-color", help = "draw levels with shade characters")]
    pub no_color: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    // Log lines on stderr would tear the full screen view apart.
    let level = if args.show || args.log_file.is_some() {
        DEFAULT_LOG_LEVEL
    } else {
        "off"
    };

    let mut logger = Logger::try_with_env_or_str(level)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file.as_path())?)
            .print_message();
    }

    let _logger = logger.start()?;

    const STDIN: std::os::unix::io::RawFd = 0;
    // Not a terminal in `--show` pipelines
    let orig_attr = termios::tcgetattr(STDIN).ok().map(Mutex::new);

    std::panic::set_hook(Box::new(move |info| {
        // The load worker recovers with a placeholder
        if std::thread::current().name() == Some(LOAD_THREAD) {
            log::error!("{}", info);
            return;
        }

        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Some(Ok(attr)) = orig_attr.as_ref().map(Mutex::lock) {
            let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, &attr);
        }

        println!("ghcal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let loader = Loader::from_config(&config, args.user.as_deref(), args.input.as_deref())?;

    let color = !args.no_color;

    if args.show {
        let stdout = stdout();
        let mut out = stdout.lock();
        app::show(&mut out, &config, &loader, color)?;
        return Ok(());
    }

    let dispatcher = Dispatcher::from_config(&config);
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config, loader, color);

    app.run(dispatcher, term)
}
