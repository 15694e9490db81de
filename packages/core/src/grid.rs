//! Snap-to-grid helpers for canvas coordinates

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(default = "default_grid_size")]
    pub size: f64,

    #[serde(default)]
    pub enabled: bool,

    /// Draw the grid overlay on the canvas
    #[serde(default)]
    pub show_grid: bool,
}

fn default_grid_size() -> f64 {
    8.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_grid_size(),
            enabled: false,
            show_grid: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

impl GridConfig {
    pub fn snap_value(&self, value: f64) -> f64 {
        if self.enabled {
            snap_to_grid(value, self.size)
        } else {
            value
        }
    }

    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap_value(point.x), self.snap_value(point.y))
    }

    /// Snapped sizes never shrink below one grid cell
    pub fn snap_size(&self, size: Size) -> Size {
        if !self.enabled || self.size <= 0.0 {
            return size;
        }
        Size {
            width: snap_to_grid(size.width, self.size).max(self.size),
            height: snap_to_grid(size.height, self.size).max(self.size),
        }
    }
}
