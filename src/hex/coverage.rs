//! Trigger fan coverage

use crate::hex::azimuth::Azimuth;
use crate::hex::coord::{adjacent_cells, Position};
use crate::hex::layout::{position_to_pixel, GridConfig};

/// Cells whose centres fall inside a trigger fan.
///
/// The fan is centred on `azimuth` and spans `arc_degrees`. Its reach in pixels
/// is `range` diagonal steps. The origin cell itself is never covered.
pub fn trigger_coverage(
    center: Position,
    azimuth: Azimuth,
    arc_degrees: f64,
    range: u32,
    grid: &GridConfig,
) -> Vec<Position> {
    if range == 0 || arc_degrees <= 0.0 {
        return Vec::new();
    }

    let origin = position_to_pixel(center, grid);
    let reach = range as f64 * grid.step_length();
    let facing = azimuth.screen_angle();
    let half_arc = (arc_degrees / 2.0).min(180.0);

    adjacent_cells(center, range * 2, grid)
        .into_iter()
        .map(|cell| cell.position)
        .filter(|&pos| {
            let px = position_to_pixel(pos, grid);
            let dx = px.x - origin.x;
            let dy = px.y - origin.y;
            if dx.hypot(dy) > reach {
                return false;
            }
            let bearing = dy.atan2(dx).to_degrees().rem_euclid(360.0);
            angle_between(bearing, facing) <= half_arc
        })
        .collect()
}

/// Smallest absolute difference between two angles in degrees
fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}
