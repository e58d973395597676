/// One of the four quadrants around a tile corner, or the corner of a solid
/// region being extended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    NE,
    NW,
    SE,
    SW,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::NE, Corner::NW, Corner::SE, Corner::SW];

    pub fn is_north(self) -> bool {
        matches!(self, Corner::NE | Corner::NW)
    }

    pub fn is_east(self) -> bool {
        matches!(self, Corner::NE | Corner::SE)
    }

    /// Same latitude, opposite side: NE <-> NW, SE <-> SW.
    pub fn mirror_x(self) -> Corner {
        match self {
            Corner::NE => Corner::NW,
            Corner::NW => Corner::NE,
            Corner::SE => Corner::SW,
            Corner::SW => Corner::SE,
        }
    }

    /// Same side, opposite latitude: NE <-> SE, NW <-> SW.
    pub fn mirror_y(self) -> Corner {
        match self {
            Corner::NE => Corner::SE,
            Corner::SE => Corner::NE,
            Corner::NW => Corner::SW,
            Corner::SW => Corner::NW,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Corner::NE => 0b0001,
            Corner::NW => 0b0010,
            Corner::SE => 0b0100,
            Corner::SW => 0b1000,
        }
    }
}

/// Per-tile record of which horizontal boundary segments touching the tile's
/// corners are final. A marked quadrant means the horizontal edge adjacent
/// to that corner of the tile may not be crossed by a new vertical boundary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoundaryFinalized(u8);

impl BoundaryFinalized {
    pub const NONE: BoundaryFinalized = BoundaryFinalized(0);
    pub const ALL: BoundaryFinalized = BoundaryFinalized(0b1111);

    pub fn is_marked(self, corner: Corner) -> bool {
        self.0 & corner.bit() != 0
    }

    pub fn mark(&mut self, corner: Corner) {
        self.0 |= corner.bit();
    }

    pub fn clear(&mut self, corner: Corner) {
        self.0 &= !corner.bit();
    }

    pub fn set(&mut self, corner: Corner, marked: bool) {
        if marked {
            self.mark(corner);
        } else {
            self.clear(corner);
        }
    }

    pub fn mark_north(&mut self) {
        self.mark(Corner::NW);
        self.mark(Corner::NE);
    }

    pub fn mark_south(&mut self) {
        self.mark(Corner::SW);
        self.mark(Corner::SE);
    }

    pub fn is_full(self) -> bool {
        self == Self::ALL
    }
}

impl std::fmt::Debug for BoundaryFinalized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marked: Vec<&str> = Corner::ALL
            .iter()
            .filter(|c| self.is_marked(**c))
            .map(|c| match c {
                Corner::NE => "NE",
                Corner::NW => "NW",
                Corner::SE => "SE",
                Corner::SW => "SW",
            })
            .collect();
        write!(f, "[{}]", marked.join("|"))
    }
}
