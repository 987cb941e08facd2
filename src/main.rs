use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::{TerminalOptions, Viewport};
use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::mpsc;

use clipman::app::{App, AppOptions};
use clipman::clipboard::create_backend;
use clipman::controller::Controller;
use clipman::exit::{ExitStatus, FATAL};
use clipman::history::{CliphistTool, HistoryTool};
use clipman::image::create_image_protocol;
use clipman::instance::{InstanceGuard, default_pid_path};
use clipman::locale::{Vocabulary, resolve_tag, shell_interface_locale};
use clipman::logging::init_logger;
use clipman::storage::{ConfigStorage, TomlConfigStorage, ensure_directories, shell_data_file};
use clipman::ui::Theme;

/// Rows taken by the picker in window mode
const WINDOW_HEIGHT: u16 = 20;

#[derive(Parser)]
#[command(name = "clipman")]
#[command(about = "Clipboard history picker for cliphist", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Hide entry numbers
    #[arg(short = 'n', long = "numbers")]
    numbers: bool,

    /// Open inline below the prompt instead of taking over the screen
    #[arg(short = 'w', long = "window")]
    window: bool,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(status) => status.into(),
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("clipman: {:#}", e);
            ExitCode::from(FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<ExitStatus> {
    let (data_dir, config_dir) = ensure_directories()?;

    let config_storage = TomlConfigStorage::new(config_dir.join("clipman.toml"));
    let config = config_storage.load()?;

    // Logger before anything that may want to report problems
    let (flash_tx, flash_rx) = mpsc::channel();
    if let Err(e) = init_logger(
        &data_dir.join("clipman.log"),
        Some(flash_tx),
        &config.general.log_level,
        &config.general.flash_level,
    ) {
        eprintln!("clipman: logging disabled: {:#}", e);
    }
    log::info!("clipman {} using config {:?}", env!("CARGO_PKG_VERSION"), config_storage.path());

    // Both tools must exist before the picker opens
    let history = CliphistTool::new(&config.tools.history)
        .context("Dependencies check failed, is cliphist installed?")?;
    let clipboard = create_backend(&config.tools.copy)
        .context("Dependencies check failed, is wl-clipboard installed?")?;
    log::info!("Using {} with {}", history.name(), config.tools.copy);

    let forced = Some(config.general.interface_locale.as_str());
    let shell_forced = shell_data_file().ok().and_then(|p| shell_interface_locale(&p));
    let lang_env = env::var("LANG").ok();
    let tag = resolve_tag(forced, shell_forced.as_deref(), lang_env.as_deref());
    let vocabulary = Vocabulary::load(&tag, Some(&config_dir.join("langs")))
        .context("Failed to load UI vocabulary")?;
    log::debug!("Interface locale: {}", vocabulary.lang());

    let theme = Theme::load(&config.general.theme).unwrap_or_else(|e| {
        log::warn!("{}, using default theme", e);
        Theme::default()
    });

    let _instance = match InstanceGuard::acquire(default_pid_path()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            log::warn!("Single instance check skipped: {:#}", e);
            None
        }
    };

    let signal = Arc::new(AtomicUsize::new(0));
    for signum in [
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGHUP,
    ] {
        signal_hook::flag::register_usize(signum, Arc::clone(&signal), signum as usize)
            .with_context(|| format!("Failed to register handler for signal {}", signum))?;
    }

    let controller = Controller::new(
        history,
        clipboard,
        config.preview.limits(),
        config.preview.cache_size,
    );

    let mut terminal = if cli.window {
        ratatui::init_with_options(TerminalOptions {
            viewport: Viewport::Inline(WINDOW_HEIGHT),
        })
    } else {
        ratatui::init()
    };

    let options = AppOptions {
        show_numbers: config.general.show_numbers && !cli.numbers,
        flash_message_duration_ms: config.general.flash_message_duration_ms,
    };
    // Graphics detection reads terminal replies, so it goes before mouse reporting
    let image_protocol = create_image_protocol();
    let mut app = App::new(
        controller,
        vocabulary,
        theme,
        Some(image_protocol),
        Some(flash_rx),
        options,
    );

    if let Err(e) = execute!(io::stdout(), EnableMouseCapture) {
        log::warn!("Mouse capture unavailable: {}", e);
    }

    let result = app.run(&mut terminal, &signal);

    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        log::debug!("Failed to disable mouse capture: {}", e);
    }
    if cli.window
        && let Err(e) = terminal.clear()
    {
        log::debug!("Failed to clear inline viewport: {}", e);
    }
    ratatui::restore();

    let status = result?;
    log::info!("Exiting with status {:?} (code {})", status, status.code());
    Ok(status)
}
