use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::log_warn;
use crate::timer::SeverityThresholds;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// Redraw cadence for running timers.
    pub tick_interval_ms: u64,
    /// Badges shown in the compact row.
    pub compact_limit: usize,
    pub thresholds: SeverityThresholds,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            compact_limit: 3,
            thresholds: SeverityThresholds::default(),
        }
    }
}

impl DisplaySettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tickIntervalMs must be greater than zero");
        }
        if !self.thresholds.is_valid() {
            bail!(
                "thresholds must ascend within (0, 100]: urgent {} critical {} warning {}",
                self.thresholds.urgent_percent,
                self.thresholds.critical_percent,
                self.thresholds.warning_percent
            );
        }
        Ok(())
    }
}

/// Display settings backed by a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<DisplaySettings>,
}

impl SettingsStore {
    /// Missing file means defaults. An unreadable or invalid file also falls
    /// back to defaults so a bad edit never blocks the viewer.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            match read_settings(&path) {
                Ok(settings) => settings,
                Err(err) => {
                    log_warn!("ignoring settings at {}: {:#}", path.display(), err);
                    DisplaySettings::default()
                }
            }
        } else {
            DisplaySettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn display(&self) -> DisplaySettings {
        self.read().clone()
    }

    pub fn update(&self, settings: DisplaySettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let data = read_settings(&self.path)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &DisplaySettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, DisplaySettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DisplaySettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_settings(path: &Path) -> Result<DisplaySettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: DisplaySettings = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}
