// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::city::CityRegistry;
use crate::forecast::{CityForecast, Level};
use crate::grid::{GridBounds, GridCell, WeatherGrid};
use std::fmt::Write;

/// Immutable padding configuration, computed once from the grid bounds and
/// threaded into every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayout {
    pub digits: usize,
    pub left_pad: usize,
    pub right_pad: usize,
}

impl MapLayout {
    /// Cell width follows the digit count of the largest x index.
    pub fn for_bounds(bounds: &GridBounds) -> Self {
        let digits = count_digits(bounds.x_max);
        let total = digits - 1;
        let left_pad = total / 2;
        Self {
            digits,
            left_pad,
            right_pad: total - left_pad,
        }
    }

    fn cell(&self, content: &str) -> String {
        format!(
            "{}{:>width$}{}",
            " ".repeat(self.left_pad + 1),
            content,
            " ".repeat(self.right_pad + 1),
            width = self.digits
        )
    }
}

fn count_digits(number: i32) -> usize {
    if number == 0 {
        1
    } else {
        (number.unsigned_abs().ilog10() + 1) as usize
    }
}

/// The five textual views of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    City,
    CloudIndex,
    CloudLevel,
    PressureIndex,
    PressureLevel,
}

impl MapKind {
    pub fn title(&self) -> &'static str {
        match self {
            MapKind::City => "City Map",
            MapKind::CloudIndex => "Cloud Coverage Map (Cloudiness Index)",
            MapKind::CloudLevel => "Cloud Coverage Map (LMH Symbol)",
            MapKind::PressureIndex => "Atmospheric Pressure Map (Pressure Index)",
            MapKind::PressureLevel => "Atmospheric Pressure Map (LMH Symbol)",
        }
    }
}

/// Single-digit index shown on the cloudiness/pressure index maps.
pub fn index_value(value: f32) -> i32 {
    ((value - 1.0).max(0.0) / 10.0) as i32
}

/// Renders one view of the grid: `#` border, y labels down the left side,
/// x labels along the bottom, rows printed from the top y index downwards.
pub fn render_map(grid: &WeatherGrid, kind: MapKind) -> String {
    let layout = MapLayout::for_bounds(grid.bounds());
    let mut out = String::new();

    push_border(&mut out, &layout, grid.width());

    for ny in (0..grid.height()).rev() {
        let _ = write!(out, "{:>width$} #", ny, width = layout.digits);
        for nx in 0..grid.width() {
            out.push_str(&layout.cell(&cell_content(grid.cell(nx, ny), kind)));
        }
        out.push_str(" #\n");
    }

    push_border(&mut out, &layout, grid.width());

    out.push_str(&" ".repeat(layout.digits + 2));
    for nx in 0..grid.width() {
        out.push_str(&layout.cell(&nx.to_string()));
    }
    out.push('\n');

    out
}

fn push_border(out: &mut String, layout: &MapLayout, width: usize) {
    out.push_str(&" ".repeat(layout.digits));
    for _ in 0..width + 2 {
        out.push_str(&layout.cell("#"));
    }
    out.push('\n');
}

/// Only the city map blanks non-city cells; the index and level views show
/// a value for every cell.
fn cell_content(cell: &GridCell, kind: MapKind) -> String {
    match kind {
        MapKind::City => match cell.city_id {
            Some(id) if cell.is_city => id.to_string(),
            _ => String::new(),
        },
        MapKind::CloudIndex => index_value(cell.cloud_cover).to_string(),
        MapKind::PressureIndex => index_value(cell.pressure).to_string(),
        MapKind::CloudLevel => Level::from_value(cell.cloud_cover).symbol().to_string(),
        MapKind::PressureLevel => Level::from_value(cell.pressure).symbol().to_string(),
    }
}

/// Renders the forecast summary for every city, in id order.
pub fn render_summary(registry: &CityRegistry) -> String {
    let mut out = String::new();

    for city in registry.iter() {
        let forecast = CityForecast::for_city(city);
        let _ = write!(
            out,
            "City Name : {}\n\
             City ID : {}\n\
             Average Cloud Cover (ACC) : {:.2} ({})\n\
             Average Pressure (AP) : {:.2} ({})\n\
             Probability of Rain (%) : {}\n",
            forecast.name,
            forecast.id,
            forecast.avg_cloud_cover,
            forecast.cloud_level.symbol(),
            forecast.avg_pressure,
            forecast.pressure_level.symbol(),
            forecast.rain_probability
        );
        out.push_str(rain_art(forecast.rain_probability));
    }

    out
}

/// ASCII rain pictogram for a probability bucket; nothing below 10%.
pub fn rain_art(probability: u8) -> &'static str {
    match probability {
        90 => "~~~~\n~~~~~\n\\\\\\\\\\\n\n",
        80 => "~~~~\n~~~~~\n \\\\\\\\\n\n",
        70 => "~~~~\n~~~~~\n  \\\\\\\n\n",
        60 => "~~~~\n~~~~~\n   \\\\\n\n",
        50 => "~~~~\n~~~~~\n    \\\n\n",
        40 => "~~~~\n~~~~~\n\n",
        30 => "~~~\n~~~~\n\n",
        20 => "~~\n~~~\n\n",
        10 => "~\n~~\n\n",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CitySize;
    use crate::forecast::compute_averages;
    use crate::grid::GridBounds;

    fn two_by_two() -> WeatherGrid {
        let mut grid = WeatherGrid::new(GridBounds::new(0, 1, 0, 1));
        let cell = grid.cell_mut(0, 0);
        cell.is_city = true;
        cell.city_id = Some(7);
        cell.cloud_cover = 50.0;
        cell.pressure = 80.0;
        grid
    }

    #[test]
    fn test_index_value_mapping() {
        assert_eq!(index_value(0.0), 0);
        assert_eq!(index_value(1.0), 0);
        assert_eq!(index_value(10.0), 0);
        assert_eq!(index_value(11.0), 1);
        assert_eq!(index_value(50.0), 4);
        assert_eq!(index_value(100.0), 9);
    }

    #[test]
    fn test_city_map_layout() {
        let map = render_map(&two_by_two(), MapKind::City);
        let lines: Vec<&str> = map.lines().collect();

        assert_eq!(
            lines,
            vec![
                "  #  #  #  # ",
                "1 #       #",
                "0 # 7     #",
                "  #  #  #  # ",
                "    0  1 ",
            ]
        );
    }

    #[test]
    fn test_level_map_shows_every_cell() {
        let map = render_map(&two_by_two(), MapKind::CloudLevel);
        let lines: Vec<&str> = map.lines().collect();

        // (0,0) is medium cloud cover; the three empty cells classify low.
        assert_eq!(lines[1], "1 # L  L  #");
        assert_eq!(lines[2], "0 # M  L  #");
    }

    #[test]
    fn test_index_map_values() {
        let map = render_map(&two_by_two(), MapKind::PressureIndex);
        let lines: Vec<&str> = map.lines().collect();

        assert_eq!(lines[2], "0 # 7  0  #");
    }

    #[test]
    fn test_wide_grid_padding() {
        let layout = MapLayout::for_bounds(&GridBounds::new(0, 12, 0, 3));
        assert_eq!(layout.digits, 2);
        assert_eq!(layout.left_pad, 0);
        assert_eq!(layout.right_pad, 1);
        assert_eq!(layout.cell("5"), "  5  ");
    }

    #[test]
    fn test_summary_format() {
        let mut registry = CityRegistry::new();
        registry.observe(7, CitySize::Mid, 0, 0);
        let mut grid = two_by_two();
        grid.cell_mut(0, 0).cloud_cover = 80.0;
        grid.cell_mut(0, 0).pressure = 80.0;
        compute_averages(&grid, &mut registry);

        let summary = render_summary(&registry);
        assert!(summary.contains("City Name : Mid_City"));
        assert!(summary.contains("City ID : 7"));
        assert!(summary.contains("Average Cloud Cover (ACC) : 20.00 (L)"));
        assert!(summary.contains("Average Pressure (AP) : 20.00 (L)"));
        assert!(summary.contains("Probability of Rain (%) : 70"));
        assert!(summary.contains("~~~~\n~~~~~\n  \\\\\\"));
    }

    #[test]
    fn test_rain_art_shape() {
        assert_eq!(rain_art(90).trim_end().lines().count(), 3);
        assert_eq!(rain_art(90).matches('\\').count(), 5);
        assert_eq!(rain_art(50).matches('\\').count(), 1);
        assert_eq!(rain_art(40).matches('\\').count(), 0);
        assert_eq!(rain_art(0), "");
    }
}
