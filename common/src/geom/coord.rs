/// Integer database units. All layout geometry is expressed in these.
pub type Coord = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}
