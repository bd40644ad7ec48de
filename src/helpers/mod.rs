pub mod extreme_points;
pub mod linalg;
