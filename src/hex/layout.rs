//! Grid geometry and pixel conversion

use serde::{Deserialize, Serialize};

use crate::hex::azimuth::Azimuth;
use crate::hex::coord::Position;

/// Board dimensions and hex sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Corner radius of a hex in pixels
    pub hex_radius: f64,
    pub margin_left: f64,
    pub margin_top: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_width: 36,
            grid_height: 36,
            hex_radius: 24.0,
            margin_left: 0.0,
            margin_top: 0.0,
        }
    }
}

impl GridConfig {
    pub fn hex_width(&self) -> f64 {
        self.hex_radius * 2.0
    }

    pub fn hex_height(&self) -> f64 {
        self.hex_radius * 3.0_f64.sqrt()
    }

    /// Distance between centers of two cells one hop apart along a column diagonal
    pub fn step_length(&self) -> f64 {
        (0.75 * self.hex_width()).hypot(self.hex_height())
    }
}

/// A point in world (unscrolled, unzoomed) pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state: screen = (world - scroll) * zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn screen_to_world(&self, screen: PixelPosition) -> PixelPosition {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        PixelPosition::new(screen.x / zoom + self.scroll_x, screen.y / zoom + self.scroll_y)
    }
}

/// Center of a cell in world pixels
pub fn position_to_pixel(pos: Position, grid: &GridConfig) -> PixelPosition {
    let hex_height = grid.hex_height();
    let x = grid.margin_left + pos.col as f64 * 0.75 * grid.hex_width();
    let column_shift = if pos.col & 1 == 1 { hex_height / 2.0 } else { 0.0 };
    let y = grid.margin_top + pos.row as f64 * hex_height + column_shift;
    PixelPosition::new(x, y)
}

/// Cell under a screen point, or `None` if it falls outside the grid
pub fn pixel_to_position(
    screen: PixelPosition,
    view: &ViewTransform,
    grid: &GridConfig,
) -> Option<Position> {
    let world = view.screen_to_world(screen);
    let x = world.x - grid.margin_left;
    let y = world.y - grid.margin_top;
    let radius = grid.hex_radius;

    let q = (2.0 / 3.0 * x) / radius;
    let r = (-x / 3.0 + 3.0_f64.sqrt() / 3.0 * y) / radius;
    let (q, r) = hex_round(q, r);

    let pos = Position::from_axial(q, r);
    pos.is_within(grid).then_some(pos)
}

/// Round fractional axial coordinates to the nearest hex
fn hex_round(q: f64, r: f64) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    (rq as i32, rr as i32)
}

/// Facing from a unit's center toward a world point, degrees clockwise from up
pub fn pointer_azimuth(center: PixelPosition, pointer: PixelPosition) -> Azimuth {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return Azimuth::NORTH;
    }
    Azimuth::new(dy.atan2(dx).to_degrees() + 90.0)
}
