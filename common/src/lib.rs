pub mod db;
pub mod geom;
pub mod tiles;
pub mod util;
