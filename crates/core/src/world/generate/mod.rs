mod biome;
pub mod hydrology;
mod layers;
pub mod noise;
mod warp;

use crate::{
    timed,
    util::range::NumRange,
    world::{
        cell::Cell,
        generate::{
            biome::BiomeGenerator, hydrology::HydrologyGenerator,
            layers::LayerGenerator,
        },
        grid::Grid,
        hex::HexPoint,
        Terrain,
    },
    WorldConfig,
};
use anyhow::{anyhow, bail, Context};
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::fmt::Debug;

/// A container for generating a new world. This applies a series of generators
/// in sequence to create the world. These fields are public to allow for
/// disjoint borrowing of multiple fields at once.
///
/// Generators that need to look at more than one cell at a time (e.g. layer
/// normalization, which needs global min/max) compute new values into a
/// separate buffer first, then do a 2nd pass to put those values into the
/// grid. Once you have a mutable reference to one cell in a collection you
/// can't grab references to any others, and doing it this way is usually
/// faster and simpler than reaching for interior mutability anyway.
pub struct WorldBuilder {
    /// This config deterministically controls generation, meaning two worlds
    /// with the same config will always be identical (provided they were
    /// generated on the same version of the code).
    ///
    /// This is public to allow for disjoint borrowing, but please **do not
    /// mutate the config**.
    pub config: WorldConfig,

    /// Seeds for each noise channel, resolved from the config
    pub noise_seeds: NoiseSeeds,

    /// Random stream for hydrology: spring selection and walk tie-breaks. This
    /// is the **only** RNG used during generation. Noise layers are seeded
    /// directly and never draw from it.
    pub rng: Pcg64,

    /// All the cells in the world. These individual cells will be mutated
    /// during world generation, but cells can never be added/removed/moved!
    pub cells: Grid<CellBuilder>,
}

/// The 32-bit seeds that feed the noise functions, one per layer channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NoiseSeeds {
    pub elevation: u32,
    pub moisture: u32,
    pub temperature: u32,
}

impl WorldBuilder {
    pub fn new(config: &WorldConfig) -> Self {
        let cells = timed!("World initialization", {
            Grid::new(config.width, config.height, CellBuilder::new)
        });
        info!("Initialized world with {} cells", cells.len());

        let seeds = &config.seeds;
        Self {
            config: config.clone(),
            noise_seeds: NoiseSeeds {
                elevation: seeds.elevation.to_noise_seed(),
                moisture: seeds.moisture.to_noise_seed(),
                temperature: seeds.temperature.to_noise_seed(),
            },
            rng: Pcg64::seed_from_u64(seeds.hydrology.to_u64()),
            cells,
        }
    }

    /// Generate a world by running a series of generation steps sequentially.
    /// Must be run from a blank slate. Outputs the finalized grid of cells.
    pub fn generate_world(mut self) -> anyhow::Result<Grid<Cell>> {
        // Run each generation step. The order is very important! Hydrology
        // needs final elevations, and biomes need final river/lake flags.
        self.apply_generator(LayerGenerator)?;
        self.apply_generator(HydrologyGenerator)?;
        self.apply_generator(BiomeGenerator)?;

        // Build each cell into its final value
        self.cells.try_map(CellBuilder::build)
    }

    /// A helper to run a generation step on this builder.
    fn apply_generator(
        &mut self,
        generator: impl Debug + Generate,
    ) -> anyhow::Result<()> {
        timed!(&format!("{:?}", generator), generator.generate(self))
            .with_context(|| format!("error in {:?}", generator))
    }
}

/// A type that generates some sort of data for the world. This takes in a set
/// of cells that have some data generated, and mutates the cells to add new
/// data. Generators are chained together, where each one adds some more data
/// until the world is complete.
pub trait Generate {
    /// Apply some generation step to the given world. This can mutate the
    /// world's cells, but can never add/remove cells, or change their
    /// positions in any way. Any failure that occurs in this function should
    /// be considered an internal failure, meaning a bug in the code, rather
    /// than anything invalid about the input (config validation has already
    /// happened by now).
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()>;
}

/// A partially built [Cell]. This should only be used while the world is being
/// generated. After generation is complete, only [Cell] should be used.
/// Since the fields may not be defined yet, the getters all return results that
/// error if the field hasn't been set. This makes it easy to catch bugs where
/// we're trying to use world values that haven't been generated yet.
#[derive(Clone, Debug)]
pub struct CellBuilder {
    position: HexPoint,
    elevation: Option<f64>,
    moisture: Option<f64>,
    temperature: Option<f64>,
    terrain: Option<Terrain>,
    is_river: bool,
    is_lake: bool,
}

impl CellBuilder {
    /// Every scalar field must land in this range
    const SCALAR_RANGE: NumRange = NumRange::normal_range();

    pub fn new(position: HexPoint) -> Self {
        Self {
            position,
            elevation: None,
            moisture: None,
            temperature: None,
            terrain: None,
            is_river: false,
            is_lake: false,
        }
    }

    pub fn position(&self) -> HexPoint {
        self.position
    }

    /// Finalize this builder to create a [Cell]. Returns an error if any fields
    /// on this builder are uninitialized.
    pub fn build(self) -> anyhow::Result<Cell> {
        Ok(Cell {
            position: self.position,
            elevation: self.elevation()?,
            moisture: self.moisture()?,
            temperature: self.temperature()?,
            terrain: self.terrain()?,
            is_river: self.is_river,
            is_lake: self.is_lake,
            road_level: 0,
            dominion: None,
        })
    }

    /// See [Cell::elevation]. Returns an error if elevation is unset.
    pub fn elevation(&self) -> anyhow::Result<f64> {
        self.elevation.ok_or_else(|| {
            anyhow!("elevation not initialized for {}", self.position)
        })
    }

    /// Set the elevation for this cell. Returns an error if the value is
    /// outside [0,1].
    pub fn set_elevation(&mut self, elevation: f64) -> anyhow::Result<()> {
        Self::SCALAR_RANGE
            .ensure_contains(elevation)
            .with_context(|| format!("elevation for {}", self.position))?;
        self.elevation = Some(elevation);
        Ok(())
    }

    /// See [Cell::moisture]. Returns an error if moisture is unset.
    pub fn moisture(&self) -> anyhow::Result<f64> {
        self.moisture.ok_or_else(|| {
            anyhow!("moisture not initialized for {}", self.position)
        })
    }

    /// Set the moisture for this cell. Returns an error if the value is
    /// outside [0,1].
    pub fn set_moisture(&mut self, moisture: f64) -> anyhow::Result<()> {
        Self::SCALAR_RANGE
            .ensure_contains(moisture)
            .with_context(|| format!("moisture for {}", self.position))?;
        self.moisture = Some(moisture);
        Ok(())
    }

    /// See [Cell::temperature]. Returns an error if temperature is unset.
    pub fn temperature(&self) -> anyhow::Result<f64> {
        self.temperature.ok_or_else(|| {
            anyhow!("temperature not initialized for {}", self.position)
        })
    }

    /// Set the temperature for this cell. Returns an error if the value is
    /// outside [0,1].
    pub fn set_temperature(&mut self, temperature: f64) -> anyhow::Result<()> {
        Self::SCALAR_RANGE
            .ensure_contains(temperature)
            .with_context(|| format!("temperature for {}", self.position))?;
        self.temperature = Some(temperature);
        Ok(())
    }

    /// See [Cell::terrain]. Returns an error if terrain is unset.
    pub fn terrain(&self) -> anyhow::Result<Terrain> {
        self.terrain.ok_or_else(|| {
            anyhow!("terrain not initialized for {}", self.position)
        })
    }

    /// Assign the terrain for this cell. Terrain can only be assigned once,
    /// so this returns an error if it's already set.
    pub fn set_terrain(&mut self, terrain: Terrain) -> anyhow::Result<()> {
        if let Some(existing) = self.terrain {
            bail!(
                "cannot set terrain {:?} for {}, already set to {:?}",
                terrain,
                self.position,
                existing
            );
        }
        self.terrain = Some(terrain);
        Ok(())
    }

    pub fn is_river(&self) -> bool {
        self.is_river
    }

    pub fn is_lake(&self) -> bool {
        self.is_lake
    }

    /// Flag this cell as part of a river. There's no way to un-flag it.
    pub fn mark_river(&mut self) {
        self.is_river = true;
    }

    /// Flag this cell as the end of a river. There's no way to un-flag it.
    pub fn mark_lake(&mut self) {
        self.is_lake = true;
    }
}
