use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitySize {
    Small,
    Mid,
    Big,
}

impl CitySize {
    /// Severity rank: 1 for small up to 3 for big.
    pub fn rank(&self) -> u8 {
        match self {
            CitySize::Small => 1,
            CitySize::Mid => 2,
            CitySize::Big => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CitySize::Small => "Small_City",
            CitySize::Mid => "Mid_City",
            CitySize::Big => "Big_City",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown city size label `{0}`")]
pub struct ParseCitySizeError(pub String);

impl FromStr for CitySize {
    type Err = ParseCitySizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Small_City" => Ok(CitySize::Small),
            "Mid_City" => Ok(CitySize::Mid),
            "Big_City" => Ok(CitySize::Big),
            s => Err(ParseCitySizeError(s.to_string())),
        }
    }
}

/// Accumulated data for one city id.
///
/// Coordinates are normalized grid indices. The bounding box starts at the
/// sentinel values and only ever grows as location records come in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i32,
    pub size: CitySize,
    pub lower_left: (i32, i32),
    pub top_right: (i32, i32),
    pub avg_pressure: f32,
    pub avg_cloud_cover: f32,
}

impl City {
    fn new(id: i32, size: CitySize) -> Self {
        Self {
            id,
            size,
            lower_left: (i32::MAX, i32::MAX),
            top_right: (i32::MIN, i32::MIN),
            avg_pressure: 0.0,
            avg_cloud_cover: 0.0,
        }
    }

    /// True once at least one cell has been registered.
    pub fn has_extent(&self) -> bool {
        self.lower_left.0 != i32::MAX
    }

    fn grow(&mut self, nx: i32, ny: i32) {
        self.lower_left = (self.lower_left.0.min(nx), self.lower_left.1.min(ny));
        self.top_right = (self.top_right.0.max(nx), self.top_right.1.max(ny));
    }
}

/// City id to accumulated data; iteration is id-ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityRegistry {
    cities: BTreeMap<i32, City>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one occupied cell for `id`, growing its bounding box. The
    /// size label sticks from the first record that names the city.
    pub fn observe(&mut self, id: i32, size: CitySize, nx: usize, ny: usize) {
        let city = self.cities.entry(id).or_insert_with(|| City::new(id, size));
        city.grow(nx as i32, ny as i32);
    }

    pub fn get(&self, id: i32) -> Option<&City> {
        self.cities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut City> {
        self.cities.values_mut()
    }
}
