//! Export views of a finished [World](crate::World), for consumption by
//! external map tools. These are one-way conversions; nothing here can be
//! loaded back into a world.

use crate::{
    world::{cell::Cell, hex::HexPoint},
    AxialPoint, Terrain,
};
use serde::Serialize;
use strum::Display;

/// A single hex in the format static hex-map viewers expect: axial
/// coordinates, a lowercase terrain name, and an optional water feature.
///
/// ```json
/// {"q": 3, "r": 3, "terrain": "clear", "feature": "River", "details": "Fresh water source"}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxialHex {
    pub q: i32,
    pub r: i32,
    /// Lowercased display name of the terrain, e.g. `"deep sea"`
    pub terrain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<WaterFeature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Notable water on a hex. A hex that's both a river and a lake is reported
/// as a river.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, Serialize)]
pub enum WaterFeature {
    River,
    Lake,
}

impl WaterFeature {
    /// Flavor text that goes along with the feature
    pub fn details(self) -> &'static str {
        match self {
            Self::River => "Fresh water source",
            Self::Lake => "Standing water",
        }
    }
}

impl AxialHex {
    pub fn new(
        position: HexPoint,
        terrain: Terrain,
        is_river: bool,
        is_lake: bool,
    ) -> Self {
        let AxialPoint { q, r } = position.to_axial();
        let feature = if is_river {
            Some(WaterFeature::River)
        } else if is_lake {
            Some(WaterFeature::Lake)
        } else {
            None
        };
        Self {
            q,
            r,
            terrain: terrain.to_string().to_lowercase(),
            feature,
            details: feature.map(|feature| feature.details().to_owned()),
        }
    }
}

impl From<&Cell> for AxialHex {
    fn from(cell: &Cell) -> Self {
        Self::new(
            cell.position(),
            cell.terrain(),
            cell.is_river(),
            cell.is_lake(),
        )
    }
}
