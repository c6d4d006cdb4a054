//! This module holds basic types related to the hexagon grid.
//!
//! ## Coordinate Systems
//!
//! ### Offset Coordinates
//!
//! The world is stored as a rectangle of hexes addressed by column (`x`) and
//! row (`y`), which is what [HexPoint] holds. The layout is "odd-q": hexes
//! have flat tops, and every odd column is shoved down by half a hex relative
//! to the even columns next to it.
//!
//! ```text
//!  ___     ___
//! /0,0\___/2,0\
//! \___/1,0\___/
//! /0,1\___/2,1\
//! \___/1,1\___/
//! ```
//!
//! Because of the shove, the offsets to a hex's six neighbors depend on the
//! parity of its column. See [HexDirection::offset].
//!
//! ### Axial Coordinates
//!
//! External hex-math tooling generally wants axial coordinates (`q`, `r`),
//! where moving in any of the six directions is the same vector no matter
//! where you start. [AxialPoint] converts to and from offset coordinates. The
//! generator itself never uses axial coordinates; they're purely an export
//! format.
//!
//! The conversion uses `r = y - (x - (x & 1)) / 2`. For odd columns the
//! `x & 1` term is the whole parity adjustment; there is no additional shift.
//! This is the only convention under which the offsets in
//! [HexDirection::offset] land on the six unit axial vectors, which the tests
//! in this module check.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// A position on the grid in offset coordinates. See the module-level docs.
/// Points are always non-negative, but may still be outside the bounds of a
/// particular grid.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct HexPoint {
    pub x: u16,
    pub y: u16,
}

impl HexPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Is this hex in an odd column? Odd columns sit half a hex lower than
    /// their even neighbors.
    pub fn is_odd_column(self) -> bool {
        self.x % 2 == 1
    }

    /// Get the point adjacent to this one in the given direction. Returns
    /// `None` if that would put either component below zero. This does
    /// **not** check against any grid's upper bounds.
    pub fn adjacent(self, direction: HexDirection) -> Option<Self> {
        let (dx, dy) = direction.offset(self.is_odd_column());
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if x < 0 || y < 0 || x > i32::from(u16::MAX) || y > i32::from(u16::MAX)
        {
            None
        } else {
            Some(Self::new(x as u16, y as u16))
        }
    }

    /// Get an iterator of every point adjacent to this one that has
    /// non-negative coordinates. The caller is responsible for filtering out
    /// points past the upper edges of the grid.
    pub fn adjacents(self) -> impl Iterator<Item = HexPoint> {
        HexDirection::iter().filter_map(move |dir| self.adjacent(dir))
    }

    /// Convert to axial coordinates
    pub fn to_axial(self) -> AxialPoint {
        let x = i32::from(self.x);
        let y = i32::from(self.y);
        AxialPoint {
            q: x,
            r: y - (x - (x & 1)) / 2,
        }
    }
}

/// A position in axial hex coordinates. See the module-level docs.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[display(fmt = "[{}, {}]", q, r)]
pub struct AxialPoint {
    pub q: i32,
    pub r: i32,
}

impl AxialPoint {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Convert back to offset coordinates. Returns `None` if the point doesn't
    /// map to non-negative offset coordinates.
    pub fn to_offset(self) -> Option<HexPoint> {
        let x = self.q;
        let y = self.r + (self.q - (self.q & 1)) / 2;
        if x < 0 || y < 0 || x > i32::from(u16::MAX) || y > i32::from(u16::MAX)
        {
            None
        } else {
            Some(HexPoint::new(x as u16, y as u16))
        }
    }

    /// Number of steps between two hexes
    pub fn distance_to(self, other: AxialPoint) -> u32 {
        // https://www.redblobgames.com/grids/hexagons/#distances-axial
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + (dq + dr).abs() + dr.abs()) / 2) as u32
    }
}

/// The six directions from a flat-topped hex to its neighbors. Iteration
/// order is clockwise starting from north.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum HexDirection {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl HexDirection {
    /// Offsets (dx, dy) for hexes in even columns
    const EVEN_OFFSETS: [(i32, i32); 6] =
        [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)];
    /// Offsets (dx, dy) for hexes in odd columns, which sit half a hex lower
    const ODD_OFFSETS: [(i32, i32); 6] =
        [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

    /// Get the offset-coordinate step in this direction. The step depends on
    /// whether the hex we're stepping from is in an odd column.
    pub fn offset(self, odd_column: bool) -> (i32, i32) {
        let table = if odd_column {
            &Self::ODD_OFFSETS
        } else {
            &Self::EVEN_OFFSETS
        };
        table[self as usize]
    }

    /// Get the direction that points back the way this one came
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::NorthWest => Self::SouthEast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_adjacent_even_column() {
        let p = HexPoint::new(2, 2);
        let adjacents: Vec<_> = p.adjacents().collect();
        assert_eq!(
            adjacents,
            vec![
                HexPoint::new(2, 1),
                HexPoint::new(3, 1),
                HexPoint::new(3, 2),
                HexPoint::new(2, 3),
                HexPoint::new(1, 2),
                HexPoint::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_adjacent_odd_column() {
        let p = HexPoint::new(3, 2);
        let adjacents: Vec<_> = p.adjacents().collect();
        assert_eq!(
            adjacents,
            vec![
                HexPoint::new(3, 1),
                HexPoint::new(4, 2),
                HexPoint::new(4, 3),
                HexPoint::new(3, 3),
                HexPoint::new(2, 3),
                HexPoint::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_adjacent_at_origin() {
        // Everything that would go negative gets dropped
        let adjacents: Vec<_> = HexPoint::new(0, 0).adjacents().collect();
        assert_eq!(adjacents, vec![HexPoint::new(1, 0), HexPoint::new(0, 1)]);
    }

    #[test]
    fn test_opposite_round_trip() {
        for x in 1..6 {
            for y in 1..6 {
                let p = HexPoint::new(x, y);
                for dir in HexDirection::iter() {
                    let neighbor = p.adjacent(dir).unwrap();
                    assert_eq!(
                        neighbor.adjacent(dir.opposite()),
                        Some(p),
                        "{} -> {} -> back",
                        p,
                        dir
                    );
                }
            }
        }
    }

    #[test]
    fn test_axial_conversion() {
        assert_eq!(HexPoint::new(0, 0).to_axial(), AxialPoint::new(0, 0));
        assert_eq!(HexPoint::new(1, 0).to_axial(), AxialPoint::new(1, 0));
        assert_eq!(HexPoint::new(2, 0).to_axial(), AxialPoint::new(2, -1));
        assert_eq!(HexPoint::new(3, 4).to_axial(), AxialPoint::new(3, 3));
        assert_eq!(HexPoint::new(4, 4).to_axial(), AxialPoint::new(4, 2));
    }

    #[test]
    fn test_axial_round_trip() {
        for x in 0..20 {
            for y in 0..20 {
                let p = HexPoint::new(x, y);
                assert_eq!(p.to_axial().to_offset(), Some(p));
            }
        }
        assert_eq!(AxialPoint::new(-1, 0).to_offset(), None);
    }

    /// The neighbor table and the axial conversion have to agree: every
    /// neighbor must be exactly one axial step away, and each direction must
    /// map to the same axial vector regardless of column parity.
    #[test]
    fn test_neighbors_agree_with_axial() {
        let axial_vectors: HashSet<(i32, i32)> =
            vec![(0, -1), (1, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)]
                .into_iter()
                .collect();

        for x in 1..10 {
            for y in 1..10 {
                let p = HexPoint::new(x, y);
                let a = p.to_axial();
                for dir in HexDirection::iter() {
                    let n = p.adjacent(dir).unwrap().to_axial();
                    assert_eq!(a.distance_to(n), 1, "{} {}", p, dir);
                    let vector = (n.q - a.q, n.r - a.r);
                    assert!(axial_vectors.contains(&vector));

                    // Same direction from an even and odd column gives the
                    // same axial vector
                    let even = HexPoint::new(2, 4);
                    let odd = HexPoint::new(3, 4);
                    let even_vec = {
                        let n = even.adjacent(dir).unwrap().to_axial();
                        let a = even.to_axial();
                        (n.q - a.q, n.r - a.r)
                    };
                    let odd_vec = {
                        let n = odd.adjacent(dir).unwrap().to_axial();
                        let a = odd.to_axial();
                        (n.q - a.q, n.r - a.r)
                    };
                    assert_eq!(even_vec, odd_vec, "{}", dir);
                }
            }
        }
    }
}
