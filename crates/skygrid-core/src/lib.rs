pub mod city;
pub mod config;
pub mod forecast;
pub mod grid;
pub mod record;
pub mod render;
pub mod session;

pub use city::{City, CityRegistry, CitySize};
pub use config::{ConfigError, ConfigParser, ScenarioConfig};
pub use forecast::{ForecastReport, Level};
pub use grid::{GridBounds, GridCell, WeatherGrid};
pub use record::{RawRecord, RecordError, SourceKind};
pub use session::{IngestError, IngestSession, IngestStats};
