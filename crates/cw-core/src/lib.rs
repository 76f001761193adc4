pub mod consts;
pub mod geometry;
pub mod helper;
pub mod id;
pub mod model;
pub mod route;

pub use geometry::{
    line_angle_degrees, normalize_border_radius, rect_collision, reduce_line_size,
    segment_point_collision, selection_handles, snap_size, snap_to_grid,
};
pub use helper::NodeGeometry;
pub use id::Key;
pub use model::*;
pub use route::{ConnectorPath, Side, route_connector};
