pub mod case;
pub mod cli;
pub mod clock;
pub mod settings;
pub mod timer;
pub mod utils;

use clap::Parser;

pub use case::CasePayload;
pub use clock::{Clock, FixedClock, SystemClock};
pub use settings::{DisplaySettings, SettingsStore};
pub use timer::{
    compact_order, format_duration, format_projected_breach, is_breached, progress_order,
    projected_breach_at, remaining_ms, severity_tier, SeverityThresholds, SeverityTier, SlaTarget,
    SlaTimer, SlaTimerStatus, TimerDisplay, TimerTicker,
};

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG, when set, wins over -v
    logger_builder(cli.global.log_level(), std::env::var("RUST_LOG").ok().as_deref()).try_init()?;

    log::debug!("slatrack starting up...");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli::dispatch(cli))
}

fn logger_builder(level: log::LevelFilter, env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Some(filters) = env_filters.filter(|filters| !filters.trim().is_empty()) {
        builder.parse_filters(filters);
    }
    builder
}
