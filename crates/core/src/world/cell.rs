use crate::world::{hex::HexPoint, Terrain};
use serde::Serialize;

/// A world is made of cells. Each cell is one hexagon on the map, and holds
/// the geographic properties generated for that spot.
///
/// Cells can't be constructed directly, they can only be made by the world
/// generation process. See [World::generate](crate::World::generate). They
/// also can't be modified after world generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    // These fields are all pub(super) so they can be accessed by the builder
    /// Position of this cell in the world, in offset coordinates. Every cell
    /// in the world has a unique position.
    pub(super) position: HexPoint,

    /// Normalized elevation. 0 is the deepest ocean in the world, 1 is the
    /// highest peak.
    pub(super) elevation: f64,

    /// Normalized moisture, as synthesized. This does **not** include the
    /// bonus that rivers and lakes get during biome classification.
    pub(super) moisture: f64,

    /// Normalized temperature. Broadly follows latitude, so low rows are
    /// cold and high rows are hot.
    pub(super) temperature: f64,

    /// The terrain label for this cell. Every cell gets exactly one.
    pub(super) terrain: Terrain,

    /// Did any river flow through this cell?
    pub(super) is_river: bool,

    /// Did a river end here because there was nowhere lower to go? A lake
    /// cell is always a river cell too.
    pub(super) is_lake: bool,

    /// Road quality. Roads are placed by downstream tooling, so this is
    /// always 0 straight out of generation.
    pub(super) road_level: u8,

    /// Owning dominion. Political simulation happens downstream, so this is
    /// always `None` straight out of generation.
    pub(super) dominion: Option<u32>,
}

impl Cell {
    pub fn position(&self) -> HexPoint {
        self.position
    }

    /// Elevation in [0,1]
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Moisture in [0,1]
    pub fn moisture(&self) -> f64 {
        self.moisture
    }

    /// Temperature in [0,1]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn is_river(&self) -> bool {
        self.is_river
    }

    pub fn is_lake(&self) -> bool {
        self.is_lake
    }

    pub fn road_level(&self) -> u8 {
        self.road_level
    }

    pub fn dominion(&self) -> Option<u32> {
        self.dominion
    }
}
