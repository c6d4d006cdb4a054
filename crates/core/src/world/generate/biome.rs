use crate::world::{
    generate::{CellBuilder, Generate, WorldBuilder},
    Terrain,
};
use rayon::prelude::*;
use strum::{Display, EnumIter};

/// Assigns a terrain label to every cell, based on its elevation, moisture
/// and temperature. Runs after hydrology, because cells with a river or lake
/// count as wetter than their moisture value alone.
#[derive(Copy, Clone, Debug)]
pub struct BiomeGenerator;

impl Generate for BiomeGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        world.cells.par_iter_mut().try_for_each(|cell| {
            let terrain = classify(&ClimateSample::from_cell(cell)?);
            cell.set_terrain(terrain)
        })
    }
}

/// Everything the classifier looks at for a single cell
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClimateSample {
    pub elevation: f64,
    pub moisture: f64,
    pub temperature: f64,
    /// River or lake present. Fresh water makes the area wetter.
    pub fresh_water: bool,
}

impl ClimateSample {
    /// Moisture bonus for cells with fresh water
    const FRESH_WATER_MOISTURE: f64 = 0.2;

    fn from_cell(cell: &CellBuilder) -> anyhow::Result<Self> {
        Ok(Self {
            elevation: cell.elevation()?,
            moisture: cell.moisture()?,
            temperature: cell.temperature()?,
            fresh_water: cell.is_river() || cell.is_lake(),
        })
    }

    /// Moisture as the classifier sees it. This is only used for
    /// classification, and never written back to the cell. Not clamped, since
    /// every threshold it's compared to is below 1 anyway.
    fn effective_moisture(&self) -> f64 {
        if self.fresh_water {
            self.moisture + Self::FRESH_WATER_MOISTURE
        } else {
            self.moisture
        }
    }
}

/// One row of the classification table. Rules are checked in order, and the
/// first one that applies picks the terrain. All comparisons are strict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum BiomeRule {
    /// Elevation below 0.15
    DeepOcean,
    /// Elevation below 0.30
    ShallowSea,
    /// Elevation above 0.85. Cold peaks are glaciers.
    Peaks,
    /// Elevation above 0.70
    Highlands,
    /// Cold flatland
    ArcticFlatland,
    /// Hot flatland
    TropicalFlatland,
    /// Everything else. Always applies, so classification can never fall
    /// through the table.
    TemperateFlatland,
}

impl BiomeRule {
    /// Every rule, in the order they're checked
    pub const RULES: [Self; 7] = [
        Self::DeepOcean,
        Self::ShallowSea,
        Self::Peaks,
        Self::Highlands,
        Self::ArcticFlatland,
        Self::TropicalFlatland,
        Self::TemperateFlatland,
    ];

    /// Check this rule against a sample. Returns the terrain if the rule
    /// applies, `None` if classification should move on to the next rule.
    pub fn apply(self, sample: &ClimateSample) -> Option<Terrain> {
        let e = sample.elevation;
        let t = sample.temperature;
        let m = sample.effective_moisture();
        match self {
            Self::DeepOcean if e < 0.15 => Some(Terrain::DeepSea),
            Self::ShallowSea if e < 0.30 => Some(Terrain::Sea),
            Self::Peaks if e > 0.85 => Some(if t < 0.2 {
                Terrain::Glacier
            } else {
                Terrain::Mountains
            }),
            Self::Highlands if e > 0.70 => Some(Terrain::Hills),
            Self::ArcticFlatland if t < 0.15 => Some(Terrain::Glacier),
            Self::TropicalFlatland if t > 0.8 => Some(if m > 0.6 {
                Terrain::Jungle
            } else if m > 0.3 {
                Terrain::Swamp
            } else {
                Terrain::Desert
            }),
            Self::TemperateFlatland => Some(if m > 0.7 {
                Terrain::Swamp
            } else if m > 0.5 {
                Terrain::Forest
            } else if m > 0.2 {
                Terrain::Plains
            } else {
                Terrain::Badlands
            }),
            _ => None,
        }
    }
}

/// Pick the terrain for a sample, using the first matching rule
pub fn classify(sample: &ClimateSample) -> Terrain {
    classify_with_rule(sample).1
}

/// Like [classify], but also tells you which rule made the call
pub fn classify_with_rule(sample: &ClimateSample) -> (BiomeRule, Terrain) {
    BiomeRule::RULES
        .iter()
        .find_map(|rule| rule.apply(sample).map(|terrain| (*rule, terrain)))
        // TemperateFlatland matches anything, so we always find a rule
        .unwrap_or_else(|| unreachable!("no rule matched {:?}", sample))
}
