use std::path::Path;

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config as LogConfig,
};

/// Pattern used when no log4rs configuration file is available.
const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:5})} {t} - {m}{n}";

/// Initialise global logging.
///
/// If `path` exists it is loaded as a log4rs config file; otherwise a console
/// logger at `fallback_level` is installed. Returns `false` if a logger was
/// already installed.
pub fn init(path: impl AsRef<Path>, fallback_level: LevelFilter) -> bool {
    let path = path.as_ref();
    if path.exists() {
        match log4rs::init_file(path, Default::default()) {
            Ok(()) => {
                info!("Initialised logging from {}", path.display());
                return true;
            }
            Err(e) => eprintln!("Failed to load {}: {e}", path.display()),
        }
    }
    init_console(fallback_level)
}

/// Initialise global logging to stderr at the given level, ignoring any
/// config file. Returns `false` if a logger was already installed.
pub fn init_console(level: LevelFilter) -> bool {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level));
    match config {
        Ok(config) => {
            let installed = log4rs::init_config(config).is_ok();
            if installed {
                debug!("Initialised console logging at {level}");
            }
            installed
        }
        Err(e) => {
            eprintln!("Invalid fallback logging config: {e}");
            false
        }
    }
}
