pub mod cell;
pub(crate) mod generate;
pub mod grid;
pub mod hex;

use crate::{
    export::AxialHex,
    timed,
    world::{cell::Cell, generate::WorldBuilder, grid::Grid, hex::HexPoint},
    WorldConfig,
};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use validator::Validate;

/// A fully generated world. Contains a grid of cells as well as the
/// configuration that was used to generate this world.
///
/// A world is read-only once generated. Everything downstream (exporters,
/// weather, whatever else you want to build) only ever gets `&World`.
#[derive(Clone, Debug)]
pub struct World {
    /// The config used to generate this world. World generation is
    /// deterministic based on world config, and once the world has been
    /// generated, the config can never change.
    config: WorldConfig,

    /// The cells that make up this world
    cells: Grid<Cell>,
}

impl World {
    /// Get a reference to the config that defines this world.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn width(&self) -> u16 {
        self.cells.width()
    }

    pub fn height(&self) -> u16 {
        self.cells.height()
    }

    /// Get the cell at a position. Returns `None` if the position is outside
    /// the world.
    pub fn cell(&self, position: HexPoint) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Iterate over every cell, in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Get the full grid of cells, e.g. for neighbor lookups
    pub fn grid(&self) -> &Grid<Cell> {
        &self.cells
    }

    /// Generate a new world with the given config. This operation could take
    /// several seconds, depending on the world size. Returns an error if the
    /// given config is invalid, or if a generation step fails. Step failures
    /// are internal bugs, and the error names the step that failed.
    pub fn generate(config: WorldConfig) -> anyhow::Result<Self> {
        info!("Generating world with config {:#?}", config);

        config.validate().context("invalid config")?;

        let cells = timed!(
            "World generation",
            log::Level::Info,
            WorldBuilder::new(&config).generate_world()
        )?;

        Ok(Self { config, cells })
    }

    /// Convert every cell to the axial-coordinate view used by external
    /// hex-map tools. See [AxialHex].
    pub fn to_axial_hexes(&self) -> Vec<AxialHex> {
        self.cells().map(AxialHex::from).collect()
    }

    /// Serialize the axial view of this world (see [Self::to_axial_hexes])
    /// into a JSON array.
    #[cfg(feature = "json")]
    pub fn to_axial_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.to_axial_hexes())
            .context("error serializing axial hexes")
    }
}

/// The terrain label for a cell. Every cell gets exactly one, based on its
/// elevation, moisture and temperature. The display names are what shows up
/// on a campaign map legend.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    // Water
    #[strum(to_string = "Deep Sea")]
    DeepSea,
    Sea,
    Coast,

    // Land
    Swamp,
    Desert,
    #[strum(to_string = "Clear")]
    Plains,
    Forest,
    Hills,
    Mountains,
    Jungle,
    Glacier,
    #[strum(to_string = "Barren")]
    Badlands,
}

impl Terrain {
    /// Is this open water? Coast counts as water.
    pub fn is_water(self) -> bool {
        matches!(self, Self::DeepSea | Self::Sea | Self::Coast)
    }
}
