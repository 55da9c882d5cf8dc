use crate::city::{City, CityRegistry};
use crate::grid::WeatherGrid;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Three-level classification symbol for percentage values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// `< 35` is low, `< 65` medium, everything else high. The top bucket
    /// is open-ended, so values past 100 still classify.
    pub fn from_value(value: f32) -> Self {
        if value < 35.0 {
            Level::Low
        } else if value < 65.0 {
            Level::Medium
        } else {
            Level::High
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Level::Low => 'L',
            Level::Medium => 'M',
            Level::High => 'H',
        }
    }
}

/// Rain probability for a pressure/cloud level pair, in steps of 10. Low
/// pressure with heavy cloud cover rains the most.
pub fn rain_probability(pressure: Level, cloud: Level) -> u8 {
    use Level::*;
    match (pressure, cloud) {
        (Low, High) => 90,
        (Low, Medium) => 80,
        (Low, Low) => 70,
        (Medium, High) => 60,
        (Medium, Medium) => 50,
        (Medium, Low) => 40,
        (High, High) => 30,
        (High, Medium) => 20,
        (High, Low) => 10,
    }
}

/// Computes mean pressure and cloud cover for every registered city over
/// its one-cell-expanded bounding box, clamped to the grid on each axis.
pub fn compute_averages(grid: &WeatherGrid, registry: &mut CityRegistry) {
    let width = grid.width() as i32;
    let height = grid.height() as i32;

    for city in registry.iter_mut() {
        if !city.has_extent() {
            city.avg_pressure = 0.0;
            city.avg_cloud_cover = 0.0;
            continue;
        }

        let x0 = (city.lower_left.0 - 1).max(0);
        let x1 = (city.top_right.0 + 1).min(width - 1);
        let y0 = (city.lower_left.1 - 1).max(0);
        let y1 = (city.top_right.1 + 1).min(height - 1);

        let mut pressure = 0.0f32;
        let mut cloud = 0.0f32;
        let mut cells = 0u32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let cell = grid.cell(x as usize, y as usize);
                pressure += cell.pressure;
                cloud += cell.cloud_cover;
                cells += 1;
            }
        }

        if cells == 0 {
            city.avg_pressure = 0.0;
            city.avg_cloud_cover = 0.0;
        } else {
            city.avg_pressure = pressure / cells as f32;
            city.avg_cloud_cover = cloud / cells as f32;
        }
        debug!(
            "city {} — cells={} avg_pressure={:.2} avg_cloud_cover={:.2}",
            city.id, cells, city.avg_pressure, city.avg_cloud_cover
        );
    }
}

/// One row of the forecast summary, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityForecast {
    pub id: i32,
    pub name: String,
    pub avg_cloud_cover: f32,
    pub cloud_level: Level,
    pub avg_pressure: f32,
    pub pressure_level: Level,
    pub rain_probability: u8,
}

impl CityForecast {
    pub fn for_city(city: &City) -> Self {
        let cloud_level = Level::from_value(city.avg_cloud_cover);
        let pressure_level = Level::from_value(city.avg_pressure);
        Self {
            id: city.id,
            name: city.size.label().to_string(),
            avg_cloud_cover: city.avg_cloud_cover,
            cloud_level,
            avg_pressure: city.avg_pressure,
            pressure_level,
            rain_probability: rain_probability(pressure_level, cloud_level),
        }
    }
}

/// The exportable forecast summary for every city in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub generated_at: DateTime<Utc>,
    pub cities: Vec<CityForecast>,
}

impl ForecastReport {
    pub fn from_registry(registry: &CityRegistry) -> Self {
        Self {
            generated_at: Utc::now(),
            cities: registry.iter().map(CityForecast::for_city).collect(),
        }
    }

    /// Writes the pretty-printed JSON summary to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("writing {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CitySize;
    use crate::grid::GridBounds;
    use crate::record::SourceKind;
    use crate::session::IngestSession;
    use std::io::Cursor;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(Level::from_value(0.0), Level::Low);
        assert_eq!(Level::from_value(34.999), Level::Low);
        assert_eq!(Level::from_value(35.0), Level::Medium);
        assert_eq!(Level::from_value(64.999), Level::Medium);
        assert_eq!(Level::from_value(65.0), Level::High);
        // The top bucket is open-ended.
        assert_eq!(Level::from_value(150.0), Level::High);
    }

    #[test]
    fn test_rain_probability_table() {
        use Level::*;
        let expected = [
            (Low, High, 90),
            (Low, Medium, 80),
            (Low, Low, 70),
            (Medium, High, 60),
            (Medium, Medium, 50),
            (Medium, Low, 40),
            (High, High, 30),
            (High, Medium, 20),
            (High, Low, 10),
        ];
        for (pressure, cloud, probability) in expected {
            assert_eq!(rain_probability(pressure, cloud), probability);
        }
    }

    #[test]
    fn test_expanded_bounding_box_average() {
        // 5x5 grid, city 7 at (2,2); the surrounding 3x3 block averages
        // (50+60+40+50+50+0+0+0+0)/9.
        let mut session = IngestSession::new(GridBounds::new(0, 4, 0, 4));
        session
            .ingest_reader(Cursor::new("[2,2]-7-Mid_City\n"), SourceKind::CityLocation)
            .unwrap();
        session
            .ingest_reader(
                Cursor::new(
                    "[2,2]-50\n[1,2]-60\n[3,2]-40\n[2,1]-50\n[2,3]-50\n\
                     [1,1]-0\n[3,3]-0\n[1,3]-0\n[3,1]-0\n",
                ),
                SourceKind::Pressure,
            )
            .unwrap();
        session.finalize();

        let city = session.registry.get(7).unwrap();
        assert!((city.avg_pressure - 250.0 / 9.0).abs() < 1e-4);
        assert_eq!(city.avg_cloud_cover, 0.0);
    }

    #[test]
    fn test_bounding_box_clamped_at_grid_edge() {
        // City in the corner: the expansion is clamped to 2x2 cells.
        let mut session = IngestSession::new(GridBounds::new(0, 4, 0, 4));
        session
            .ingest_reader(Cursor::new("[0,0]-1-Small_City\n"), SourceKind::CityLocation)
            .unwrap();
        session
            .ingest_reader(
                Cursor::new("[0,0]-40\n[1,0]-40\n[0,1]-40\n[1,1]-40\n[2,2]-100\n"),
                SourceKind::CloudCover,
            )
            .unwrap();
        session.finalize();

        let city = session.registry.get(1).unwrap();
        assert_eq!(city.avg_cloud_cover, 40.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut session = IngestSession::new(GridBounds::new(0, 4, 0, 4));
        session
            .ingest_reader(Cursor::new("[2,2]-7-Mid_City\n"), SourceKind::CityLocation)
            .unwrap();
        session
            .ingest_reader(Cursor::new("[2,2]-80\n[1,2]-70\n"), SourceKind::Pressure)
            .unwrap();

        session.finalize();
        let first = session.registry.get(7).unwrap().clone();
        session.finalize();
        let second = session.registry.get(7).unwrap().clone();

        assert_eq!(first, second);
    }

    #[test]
    fn test_forecast_row() {
        let mut registry = CityRegistry::new();
        registry.observe(7, CitySize::Mid, 2, 2);
        let grid = WeatherGrid::new(GridBounds::new(0, 4, 0, 4));
        compute_averages(&grid, &mut registry);

        let forecast = CityForecast::for_city(registry.get(7).unwrap());
        assert_eq!(forecast.name, "Mid_City");
        assert_eq!(forecast.cloud_level, Level::Low);
        assert_eq!(forecast.pressure_level, Level::Low);
        assert_eq!(forecast.rain_probability, 70);
    }

    #[test]
    fn test_report_roundtrip() {
        let mut registry = CityRegistry::new();
        registry.observe(3, CitySize::Big, 1, 1);
        let report = ForecastReport::from_registry(&registry);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        report.save(&path).unwrap();

        let loaded: ForecastReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.cities, report.cities);
        assert_eq!(loaded.generated_at, report.generated_at);
    }
}
