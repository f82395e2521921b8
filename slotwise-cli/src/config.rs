use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slotwise_core::{ScheduleConfig, WorkingWindow};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_slotwise_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schedule: ScheduleSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    /// Relative paths resolve against the working directory.
    pub output_path: PathBuf,
    /// IANA zone used to decide "today".
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub tasks_path: PathBuf,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let base = ScheduleConfig::default();
        Self {
            day_start_hour: base.window.day_start_hour,
            day_end_hour: base.window.day_end_hour,
            output_path: base.output_path,
            timezone: base.timezone,
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            tasks_path: PathBuf::from("data/tasks.json"),
        }
    }
}

impl Config {
    pub fn schedule_config(&self) -> Result<ScheduleConfig> {
        let window = WorkingWindow::new(self.schedule.day_start_hour, self.schedule.day_end_hour)
            .context("config [schedule] working hours")?;
        Ok(ScheduleConfig {
            window,
            output_path: self.schedule.output_path.clone(),
            timezone: self.schedule.timezone.clone(),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_slotwise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = parse_config("[schedule]\nday_start_hour = 8\n").unwrap();
        assert_eq!(cfg.schedule.day_start_hour, 8);
        assert_eq!(cfg.schedule.day_end_hour, 18);
        assert_eq!(cfg.store.tasks_path, PathBuf::from("data/tasks.json"));
        assert_eq!(cfg.schedule.timezone, "UTC");
    }

    #[test]
    fn default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn bad_window_is_rejected() {
        let cfg = parse_config("[schedule]\nday_start_hour = 19\nday_end_hour = 17\n").unwrap();
        assert!(cfg.schedule_config().is_err());

        let ok = Config::default().schedule_config().unwrap();
        assert_eq!(ok.window.minutes(), 540);
        assert_eq!(ok.output_path, PathBuf::from("data/schedule.ics"));
    }
}
