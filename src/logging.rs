//! File logging. The terminal belongs to the UI, so nothing is ever written
//! to stdout or stderr.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::LogSettings;

pub const LOG4RS_FILE: &str = "config/log4rs.yaml";

const ROLL_SIZE: u64 = 5 * 1024 * 1024;
const ROLL_ARCHIVES: u32 = 3;
const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

/// Installs the global logger: `config/log4rs.yaml` when present, otherwise
/// a size-rolled file appender built from `settings`.
pub fn init(workspace_root: &Path, settings: &LogSettings) -> Result<()> {
    let yaml = workspace_root.join(LOG4RS_FILE);
    if yaml.exists() {
        return log4rs::init_file(&yaml, Default::default())
            .with_context(|| format!("failed to load {}", yaml.display()));
    }
    let config = file_config(settings)?;
    log4rs::init_config(config).context("a global logger is already installed")?;
    Ok(())
}

pub fn level(settings: &LogSettings) -> LevelFilter {
    settings.level.parse().unwrap_or(LevelFilter::Info)
}

fn file_config(settings: &LogSettings) -> Result<Config> {
    let archive = format!("{}.{{}}.gz", settings.file.display());
    let roller = FixedWindowRoller::builder()
        .build(&archive, ROLL_ARCHIVES)
        .map_err(|err| anyhow!("invalid log archive pattern {archive}: {err}"))?;
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(ROLL_SIZE)),
        Box::new(roller),
    );
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&settings.file, Box::new(policy))
        .with_context(|| format!("failed to open log file {}", settings.file.display()))?;

    Config::builder()
        .appender(Appender::builder().build("file", Box::new(appender)))
        .build(Root::builder().appender("file").build(level(settings)))
        .context("invalid logging configuration")
}
