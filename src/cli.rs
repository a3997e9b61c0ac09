//! Clap definitions and handlers for the `slatrack` viewer.

use std::{
    future::Future,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::time;

use crate::case::CasePayload;
use crate::clock::{Clock, SystemClock};
use crate::settings::{DisplaySettings, SettingsStore};
use crate::timer::{SlaTimer, TimerDisplay, TimerTicker};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// slatrack -- render SLA timers from a case payload
#[derive(Debug, Parser)]
#[command(
    name = "slatrack",
    version,
    about = "Render SLA timers from a service-desk case payload",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Display settings file (JSON)
    #[arg(long, env = "SLATRACK_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the case's timers once
    Show(ShowArgs),
    /// Redraw running timers every tick until they stop or Ctrl-C
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Case payload JSON file
    pub case: PathBuf,

    /// Which ordering to render
    #[arg(long, default_value = "progress")]
    pub view: View,

    /// Badge count for the compact view (overrides settings)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Case payload JSON file
    pub case: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Compact,
    Progress,
}

impl GlobalOpts {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn display_settings(&self) -> Result<DisplaySettings> {
        match &self.settings {
            Some(path) => Ok(SettingsStore::new(path.clone())?.display()),
            None => Ok(DisplaySettings::default()),
        }
    }
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let settings = cli.global.display_settings()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match cli.command {
        Command::Show(args) => show(args, &settings, &*clock),
        Command::Watch(args) => watch(args, &settings, clock).await,
    }
}

fn show(args: ShowArgs, settings: &DisplaySettings, clock: &dyn Clock) -> Result<()> {
    let case = CasePayload::load(&args.case)?;
    let now = clock.now();
    let limit = args.limit.unwrap_or(settings.compact_limit);

    let ordered = match args.view {
        View::Compact => case.compact_timers(now, limit),
        View::Progress => case.progress_timers(now),
    };
    let frames: Vec<TimerDisplay> = ordered
        .into_iter()
        .map(|timer| TimerDisplay::from_timer(timer, now, &settings.thresholds))
        .collect();

    let mut out = io::stdout().lock();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&frames)?)?;
    } else {
        write_frames(&mut out, &case, &frames)?;
    }
    Ok(())
}

async fn watch(args: WatchArgs, settings: &DisplaySettings, clock: Arc<dyn Clock>) -> Result<()> {
    let case = CasePayload::load(&args.case)?;
    let mut out = io::stdout();
    run_watch(&case, settings, clock, ctrl_c(), &mut out).await?;
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the watch only
/// ends once every timer has stopped.
async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log_warn!("failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Redraws the case every tick until `shutdown` resolves or no ticker is
/// left running. Returns the number of redraws.
pub async fn run_watch<W, S>(
    case: &CasePayload,
    settings: &DisplaySettings,
    clock: Arc<dyn Clock>,
    shutdown: S,
    out: &mut W,
) -> Result<usize>
where
    W: Write,
    S: Future<Output = ()>,
{
    let ordered: Vec<SlaTimer> = case
        .progress_timers(clock.now())
        .into_iter()
        .cloned()
        .collect();

    let mut tickers: Vec<TimerTicker> = ordered
        .into_iter()
        .map(|timer| TimerTicker::spawn(timer, clock.clone(), settings))
        .collect();
    log_info!("watching {} timers on case {}", tickers.len(), case.id);

    tokio::pin!(shutdown);
    let mut redraw = time::interval(settings.tick_interval());
    let mut redraws = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = redraw.tick() => {}
        }

        let frames: Vec<TimerDisplay> = tickers.iter().map(TimerTicker::latest).collect();
        write_frames(out, case, &frames)?;
        redraws += 1;

        if tickers.iter().all(TimerTicker::is_finished) {
            log_info!("no running timers left on case {}", case.id);
            break;
        }
    }

    for ticker in &mut tickers {
        ticker.stop().await?;
    }
    Ok(redraws)
}

fn write_frames<W: Write>(
    out: &mut W,
    case: &CasePayload,
    frames: &[TimerDisplay],
) -> io::Result<()> {
    match &case.title {
        Some(title) => writeln!(out, "{} - {}", case.id, title)?,
        None => writeln!(out, "{}", case.id)?,
    }
    if frames.is_empty() {
        writeln!(out, "  no SLA timers")?;
    }
    for frame in frames {
        writeln!(out, "{}", frame.summary_line())?;
    }
    writeln!(out)?;
    out.flush()
}
