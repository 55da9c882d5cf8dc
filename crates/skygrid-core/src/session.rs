// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::city::CityRegistry;
use crate::config::ScenarioConfig;
use crate::grid::{GridBounds, WeatherGrid};
use crate::record::{RawRecord, RecordError, SourceKind};
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unable to open {file}: {source}")]
    FileOpen {
        file: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-file ingestion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub stored: usize,
    pub skipped: usize,
}

/// Owns the grid store and city registry for one loaded scenario.
///
/// A session is rebuilt from scratch every time a configuration file is
/// processed; nothing survives from the previous load.
#[derive(Debug)]
pub struct IngestSession {
    pub grid: WeatherGrid,
    pub registry: CityRegistry,
}

impl IngestSession {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            grid: WeatherGrid::new(bounds),
            registry: CityRegistry::new(),
        }
    }

    /// Runs a full ingestion pass over every data file named by `config`,
    /// then computes the per-city averages. Missing or unreadable files are
    /// reported and skipped; the remaining sources still load.
    pub fn run(config: &ScenarioConfig) -> Self {
        let mut session = Self::new(config.bounds);

        for (kind, path) in config.sources() {
            let Some(path) = path else {
                warn!("{} not named by the configuration; skipping", kind.file_name());
                continue;
            };
            match session.ingest_file(path, kind) {
                Ok(stats) => info!(
                    "ingested {} — stored={} skipped={}",
                    path.display(),
                    stats.stored,
                    stats.skipped
                ),
                Err(e) => error!("skipping {}: {}", kind.file_name(), e),
            }
        }

        session.finalize();
        session
    }

    /// Parses and applies every line of one data file.
    pub fn ingest_file(&mut self, path: &Path, kind: SourceKind) -> Result<IngestStats, IngestError> {
        let file = File::open(path).map_err(|source| IngestError::FileOpen {
            file: path.display().to_string(),
            source,
        })?;
        self.ingest_reader(BufReader::new(file), kind)
    }

    pub fn ingest_reader<R: BufRead>(
        &mut self,
        reader: R,
        kind: SourceKind,
    ) -> Result<IngestStats, IngestError> {
        let mut stats = IngestStats::default();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match RawRecord::parse(trimmed, kind).and_then(|record| self.apply(record)) {
                Ok(()) => stats.stored += 1,
                Err(e) => {
                    warn!("dropping {} record: {}", kind.file_name(), e);
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Applies one parsed record. Out-of-bounds coordinates are rejected
    /// before any mutation. Out-of-range percentages and negative city ids
    /// are reported but stored as given.
    pub fn apply(&mut self, record: RawRecord) -> Result<(), RecordError> {
        match record {
            RawRecord::City { x, y, id, size } => {
                let (nx, ny) = self.normalize(x, y)?;
                if id < 0 {
                    warn!("city id {id} is negative, storing as given");
                }
                let cell = self.grid.cell_mut(nx, ny);
                cell.is_city = true;
                cell.city_id = Some(id);
                self.registry.observe(id, size, nx, ny);
                Ok(())
            }
            RawRecord::CloudCover { x, y, value } => {
                let (nx, ny) = self.normalize(x, y)?;
                check_percentage(value);
                self.grid.cell_mut(nx, ny).cloud_cover = value as f32;
                Ok(())
            }
            RawRecord::Pressure { x, y, value } => {
                let (nx, ny) = self.normalize(x, y)?;
                check_percentage(value);
                self.grid.cell_mut(nx, ny).pressure = value as f32;
                Ok(())
            }
        }
    }

    /// Computes the per-city averages; idempotent over unchanged data.
    pub fn finalize(&mut self) {
        crate::forecast::compute_averages(&self.grid, &mut self.registry);
    }

    fn normalize(&self, x: i32, y: i32) -> Result<(usize, usize), RecordError> {
        self.grid
            .bounds()
            .normalize(x, y)
            .ok_or(RecordError::OutOfBounds { x, y })
    }
}

fn check_percentage(value: i32) {
    if !(0..=100).contains(&value) {
        warn!("percentage {value} outside 0-100, storing as given");
    }
}
