//! Hex grid math: coordinates, pixel layout, pathing and trigger fans

pub mod azimuth;
pub mod coord;
pub mod coverage;
pub mod layout;

pub use azimuth::{Azimuth, TriggerDirection};
pub use coord::{adjacent_cells, find_path, hex_distance, invert_position, Position, ReachableCell};
pub use coverage::trigger_coverage;
pub use layout::{
    pixel_to_position, pointer_azimuth, position_to_pixel, GridConfig, PixelPosition,
    ViewTransform,
};
