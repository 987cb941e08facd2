use anyhow::{Context, Result, anyhow};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// A log record surfaced in the preview panel
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
    pub timestamp: Instant,
}

/// Logger writing to a rotating file and, above a threshold, to the panel
///
/// The terminal is in raw mode for the whole session, so nothing goes to stderr.
struct ClipmanLogger {
    file: Mutex<RollingFileAppender>,
    file_level: LevelFilter,
    flash: Option<Mutex<Sender<FlashMessage>>>,
    flash_level: LevelFilter,
}

impl ClipmanLogger {
    fn write_file(&self, record: &Record) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        let _ = writeln!(
            file,
            "{} [{}] {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn send_flash(&self, record: &Record) {
        let Some(Ok(tx)) = self.flash.as_ref().map(|m| m.lock()) else {
            return;
        };
        // The receiver is gone once the UI has shut down
        let _ = tx.send(FlashMessage {
            level: record.level(),
            message: record.args().to_string(),
            timestamp: Instant::now(),
        });
    }
}

impl Log for ClipmanLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level.max(self.flash_level)
    }

    fn log(&self, record: &Record) {
        let level = record.level();
        if level <= self.file_level {
            self.write_file(record);
        }
        if level <= self.flash_level {
            self.send_flash(record);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Level names as written in the config; "off" disables, unknown means info
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.trim().to_lowercase().as_str() {
        "warning" => LevelFilter::Warn,
        other => other.parse().unwrap_or(LevelFilter::Info),
    }
}

/// Daily rotated appender keeping three files next to `path`
fn open_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("Invalid log file path {:?}", path))?;
    std::fs::create_dir_all(dir).context("Failed to create log directory")?;

    let prefix = path.file_stem().and_then(|s| s.to_str()).unwrap_or("clipman");
    let suffix = path.extension().and_then(|s| s.to_str()).unwrap_or("log");

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(prefix)
        .filename_suffix(suffix)
        .build(dir)
        .context("Failed to create rotating file appender")
}

/// Install the global logger
pub fn init_logger(
    log_file_path: &Path,
    flash_tx: Option<Sender<FlashMessage>>,
    file_level: &str,
    flash_level: &str,
) -> Result<()> {
    let logger = ClipmanLogger {
        file: Mutex::new(open_appender(log_file_path)?),
        file_level: parse_level(file_level),
        flash: flash_tx.map(Mutex::new),
        flash_level: parse_level(flash_level),
    };
    let max_level = logger.file_level.max(logger.flash_level);

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}
