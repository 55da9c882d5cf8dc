use crate::city::CitySize;
use std::str::FromStr;
use thiserror::Error;

/// Which data file a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    CityLocation,
    CloudCover,
    Pressure,
}

impl SourceKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::CityLocation => "citylocation.txt",
            SourceKind::CloudCover => "cloudcover.txt",
            SourceKind::Pressure => "pressure.txt",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("malformed record `{0}`, expected `[x,y]-<payload>`")]
    Malformed(String),
    #[error("invalid number `{0}`")]
    BadNumber(String),
    #[error("unknown city size label `{0}`")]
    UnknownCitySize(String),
    #[error("coordinates ({x}, {y}) are out of bounds")]
    OutOfBounds { x: i32, y: i32 },
}

/// A parsed data-file line, still in scenario coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawRecord {
    City { x: i32, y: i32, id: i32, size: CitySize },
    CloudCover { x: i32, y: i32, value: i32 },
    Pressure { x: i32, y: i32, value: i32 },
}

impl RawRecord {
    /// Parses one line according to the source it came from.
    ///
    /// City-location payloads are `<id>-<sizeLabel>`; cloud-cover and
    /// pressure payloads are a bare integer percentage. Range validation of
    /// the percentage happens at apply time, not here.
    pub fn parse(line: &str, kind: SourceKind) -> Result<Self, RecordError> {
        let (coords, payload) = line
            .split_once('-')
            .ok_or_else(|| RecordError::Malformed(line.to_string()))?;

        // Strip spaces and brackets before splitting on the comma.
        let coords: String = coords
            .chars()
            .filter(|c| !matches!(c, ' ' | '[' | ']'))
            .collect();
        let (x_str, y_str) = coords
            .split_once(',')
            .ok_or_else(|| RecordError::Malformed(line.to_string()))?;
        let x = parse_int(x_str)?;
        let y = parse_int(y_str)?;

        match kind {
            SourceKind::CityLocation => {
                let (id_str, label) = payload
                    .rsplit_once('-')
                    .ok_or_else(|| RecordError::Malformed(line.to_string()))?;
                let id = parse_int(id_str.trim())?;
                let size = CitySize::from_str(label.trim())
                    .map_err(|e| RecordError::UnknownCitySize(e.0))?;
                Ok(RawRecord::City { x, y, id, size })
            }
            SourceKind::CloudCover => {
                let value = parse_int(payload.trim())?;
                Ok(RawRecord::CloudCover { x, y, value })
            }
            SourceKind::Pressure => {
                let value = parse_int(payload.trim())?;
                Ok(RawRecord::Pressure { x, y, value })
            }
        }
    }
}

fn parse_int(s: &str) -> Result<i32, RecordError> {
    s.parse().map_err(|_| RecordError::BadNumber(s.to_string()))
}
