//! Hexgen is a hex tile-based terrain generator for tabletop campaign maps.
//! This crate contains all the core generation logic: layered scalar fields
//! (elevation, moisture, temperature), a hydrology pass that carves rivers and
//! lakes, and a rule table that turns those fields into terrain labels.
//! Presentation and persistence are left to whoever consumes the finished
//! [World].
//!
//! ```no_run
//! use hexgen::{World, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let world = World::generate(config).unwrap();
//! println!("{}", world.cells().count());
//! // From here you can display/use the world however you like.
//! ```
//!
//! See [WorldConfig] for details on how the world generation can be customized.

mod config;
pub mod export;
mod util;
pub mod weather;
mod world;

pub use crate::{
    config::{
        ElevationConfig, HydrologyConfig, NoiseLayerConfig, Seed, SeedConfig,
        TemperatureConfig, WarpConfig, WorldConfig,
    },
    util::range::NumRange,
    world::{
        cell::Cell,
        generate::{
            hydrology::WalkOutcome, noise::jitter, noise::IsotropicNoise,
        },
        grid::Grid,
        hex::{AxialPoint, HexDirection, HexPoint},
        Terrain, World,
    },
};
