pub mod coord;
pub mod point;
pub mod rect;
pub mod rtree;
pub mod transform;
