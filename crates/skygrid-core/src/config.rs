use crate::grid::GridBounds;
use crate::record::SourceKind;
use log::warn;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed scenario configuration: grid bounds plus the three data files.
///
/// Data files the configuration never names stay `None`; ingestion reports
/// them as missing and loads the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioConfig {
    pub bounds: GridBounds,
    pub city_path: Option<PathBuf>,
    pub cloud_path: Option<PathBuf>,
    pub pressure_path: Option<PathBuf>,
}

impl ScenarioConfig {
    pub fn sources(&self) -> [(SourceKind, Option<&Path>); 3] {
        [
            (SourceKind::CityLocation, self.city_path.as_deref()),
            (SourceKind::CloudCover, self.cloud_path.as_deref()),
            (SourceKind::Pressure, self.pressure_path.as_deref()),
        ]
    }
}

pub struct ConfigParser;

impl ConfigParser {
    /// Parses a scenario configuration file. Relative data-file paths are
    /// resolved against the configuration file's directory.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(BufReader::new(file), base)
    }

    /// Grid range lines start with `Grid` and carry `=<min>-<max>`; data
    /// files are recognized by their well-known names anywhere in a line,
    /// the whole line being the path. A malformed range is reported and
    /// skipped, leaving the previous bounds in place.
    pub fn parse<R: BufRead>(reader: R, base: &Path) -> Result<ScenarioConfig, ConfigError> {
        let mut config = ScenarioConfig::default();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with("Grid") {
                parse_range_line(trimmed, &mut config.bounds);
            } else if trimmed.contains(SourceKind::CityLocation.file_name()) {
                config.city_path = Some(resolve(base, trimmed));
            } else if trimmed.contains(SourceKind::CloudCover.file_name()) {
                config.cloud_path = Some(resolve(base, trimmed));
            } else if trimmed.contains(SourceKind::Pressure.file_name()) {
                config.pressure_path = Some(resolve(base, trimmed));
            }
        }

        Ok(config)
    }
}

fn parse_range_line(line: &str, bounds: &mut GridBounds) {
    static RANGE_RE: OnceLock<Regex> = OnceLock::new();
    let re = RANGE_RE.get_or_init(|| {
        Regex::new(r"^Grid([XY])_IdxRange\s*=\s*(-?\d+)\s*-\s*(-?\d+)\s*$").unwrap()
    });

    let Some(caps) = re.captures(line) else {
        warn!("malformed grid range line `{line}`; keeping previous bounds");
        return;
    };

    // The regex admits only integers, so overflow is the one parse failure left.
    let (Ok(min), Ok(max)) = (caps[2].parse::<i32>(), caps[3].parse::<i32>()) else {
        warn!("grid range `{line}` does not fit in i32; keeping previous bounds");
        return;
    };

    if max < min {
        warn!("grid range `{line}` has max < min; keeping previous bounds");
        return;
    }

    if &caps[1] == "X" {
        bounds.x_min = min;
        bounds.x_max = max;
    } else {
        bounds.y_min = min;
        bounds.y_max = max;
    }
}

fn resolve(base: &Path, line: &str) -> PathBuf {
    let path = Path::new(line);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
