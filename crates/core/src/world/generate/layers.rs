use crate::{
    config::WorldConfig,
    timed,
    util::{clamp_unit, range::NumRange},
    world::{
        generate::{
            noise::IsotropicNoise, warp::DomainWarp, Generate, NoiseSeeds,
            WorldBuilder,
        },
        hex::HexPoint,
    },
};
use anyhow::anyhow;
use log::debug;
use rayon::prelude::*;

/// Generates the three scalar layers (elevation, moisture, temperature) for
/// every cell. This runs in two passes:
///
/// 1. Sample raw values for every cell, in parallel. Raw values go into a
///    separate buffer, never into the cells.
/// 2. Once every cell is sampled, rescale each layer by its observed min/max
///    so the full [0,1] range is used, then couple the layers together
///    (high ground is colder and drier, etc.).
///
/// Pass 2 can't start until pass 1 is completely done, since it needs the
/// global min/max.
#[derive(Copy, Clone, Debug)]
pub struct LayerGenerator;

impl Generate for LayerGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let samplers = LayerSamplers::new(&world.config, &world.noise_seeds);

        // Pass 1
        let raw: Vec<Layers> = timed!(
            "Layer sampling",
            world
                .cells
                .par_iter()
                .map(|cell| samplers.sample(cell.position()))
                .collect()
        );

        let ranges = ObservedRanges::observe(&raw)?;
        debug!(
            "Observed ranges: elevation={} moisture={} temperature={}",
            ranges.elevation, ranges.moisture, ranges.temperature
        );

        // Pass 2
        world.cells.par_iter_mut().zip(raw.par_iter()).try_for_each(
            |(cell, raw)| {
                let layers = couple(ranges.normalize(raw));
                cell.set_elevation(layers.elevation)?;
                cell.set_moisture(layers.moisture)?;
                cell.set_temperature(layers.temperature)?;
                Ok(())
            },
        )
    }
}

/// One value for each scalar layer
#[derive(Copy, Clone, Debug, PartialEq)]
struct Layers {
    elevation: f64,
    moisture: f64,
    temperature: f64,
}

/// All the noise functions needed for pass 1, built once per world
struct LayerSamplers {
    warp: DomainWarp,
    continent: IsotropicNoise,
    detail: IsotropicNoise,
    moisture: IsotropicNoise,
    temperature: IsotropicNoise,
    continent_weight: f64,
    temperature_noise_weight: f64,
    height: f64,
}

impl LayerSamplers {
    /// Seed offset for the elevation detail layer, so it doesn't match the
    /// continent layer
    const DETAIL_SEED_OFFSET: u32 = 101;

    fn new(config: &WorldConfig, seeds: &NoiseSeeds) -> Self {
        Self {
            warp: DomainWarp::new(&config.warp, seeds),
            continent: IsotropicNoise::new(
                seeds.elevation,
                &config.elevation.continent,
            ),
            detail: IsotropicNoise::new(
                seeds.elevation.wrapping_add(Self::DETAIL_SEED_OFFSET),
                &config.elevation.detail,
            ),
            moisture: IsotropicNoise::new(seeds.moisture, &config.moisture),
            temperature: IsotropicNoise::new(
                seeds.temperature,
                &config.temperature.noise,
            ),
            continent_weight: config.elevation.continent_weight,
            temperature_noise_weight: config.temperature.noise_weight,
            height: f64::from(config.height),
        }
    }

    /// Get the raw (pass 1) values for a cell. Each value is clamped to
    /// [0,1], but not yet stretched to cover the full range.
    fn sample(&self, position: HexPoint) -> Layers {
        let point = self.warp.warp(position.x, position.y);

        let (x, y) = point.elevation;
        let elevation = self.continent_weight * self.continent.sample(x, y)
            + (1.0 - self.continent_weight) * self.detail.sample(x, y);

        let (x, y) = point.moisture;
        let moisture = self.moisture.sample(x, y);

        // Latitude gradient: first row is coldest, last row is hottest
        let (x, y) = point.temperature;
        let latitude = f64::from(position.y) / self.height;
        let temperature = latitude
            + self.temperature_noise_weight * self.temperature.sample(x, y);

        Layers {
            elevation: clamp_unit((elevation + 1.0) / 2.0),
            moisture: clamp_unit((moisture + 1.0) / 2.0),
            temperature: clamp_unit(temperature),
        }
    }
}

/// Min/max of each layer across the whole world, after pass 1
#[derive(Copy, Clone, Debug)]
struct ObservedRanges {
    elevation: NumRange,
    moisture: NumRange,
    temperature: NumRange,
}

impl ObservedRanges {
    fn observe(raw: &[Layers]) -> anyhow::Result<Self> {
        let observe = |f: fn(&Layers) -> f64| {
            NumRange::observe(raw.iter().map(f))
                .ok_or_else(|| anyhow!("no cells to observe"))
        };
        Ok(Self {
            elevation: observe(|l| l.elevation)?,
            moisture: observe(|l| l.moisture)?,
            temperature: observe(|l| l.temperature)?,
        })
    }

    /// Stretch raw values so that the observed range maps onto [0,1]
    fn normalize(&self, raw: &Layers) -> Layers {
        let stretch = |range: NumRange, value: f64| {
            range.value(value).normalize().clamp().inner()
        };
        Layers {
            elevation: stretch(self.elevation, raw.elevation),
            moisture: stretch(self.moisture, raw.moisture),
            temperature: stretch(self.temperature, raw.temperature),
        }
    }
}

/// Couple the normalized layers together. The order of these adjustments
/// matters, since later ones read values produced by earlier ones.
fn couple(normalized: Layers) -> Layers {
    // Push lowlands down and highlands up
    let elevation = clamp_unit(normalized.elevation.powf(1.2));

    // High ground is colder
    let mut temperature =
        clamp_unit(normalized.temperature - 0.35 * (elevation - 0.5));

    let mut moisture = normalized.moisture;
    if elevation > 0.65 {
        moisture = clamp_unit(moisture * 0.85);
    }
    if elevation < 0.35 {
        moisture = clamp_unit(moisture + (0.35 - elevation) * 0.6);
    }
    if temperature > 0.75 {
        moisture = clamp_unit(moisture - (temperature - 0.75) * 0.6);
    }
    if temperature < 0.20 {
        moisture = clamp_unit(moisture + (0.20 - temperature) * 0.25);
    }
    moisture = clamp_unit(moisture.powf(1.1));

    // Wet areas run a bit cooler, dry areas a bit hotter
    if moisture > 0.78 {
        temperature -= 0.04;
    } else if moisture < 0.20 {
        temperature += 0.03;
    }
    temperature = clamp_unit(temperature);

    Layers {
        elevation,
        moisture,
        temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Seed, SeedConfig};
    use assert_approx_eq::assert_approx_eq;

    fn layers(elevation: f64, moisture: f64, temperature: f64) -> Layers {
        Layers {
            elevation,
            moisture,
            temperature,
        }
    }

    #[test]
    fn test_couple_midrange() {
        // Nothing special happens in the middle of every range, other than
        // the exponents
        let out = couple(layers(0.5, 0.5, 0.5));
        let elevation = 0.5f64.powf(1.2);
        assert_approx_eq!(out.elevation, elevation);
        assert_approx_eq!(out.temperature, 0.5 - 0.35 * (elevation - 0.5));
        assert_approx_eq!(out.moisture, 0.5f64.powf(1.1));
    }

    #[test]
    fn test_couple_highlands() {
        let out = couple(layers(1.0, 0.8, 0.5));
        assert_approx_eq!(out.elevation, 1.0);
        // Cooled by altitude
        assert_approx_eq!(out.temperature, 0.325);
        // Dried by altitude
        assert_approx_eq!(out.moisture, (0.8f64 * 0.85).powf(1.1));
    }

    #[test]
    fn test_couple_lowland_hot() {
        let out = couple(layers(0.0, 0.1, 1.0));
        assert_approx_eq!(out.elevation, 0.0);
        // Warmed by low altitude but capped
        // 1.0 - 0.35 * -0.5 = 1.175 -> 1.0
        // moisture: 0.1 + 0.21 = 0.31, then - 0.15 = 0.16, then ^1.1
        let moisture = 0.16f64.powf(1.1);
        assert_approx_eq!(out.moisture, moisture);
        // Dry, so warmer, but already capped
        assert_approx_eq!(out.temperature, 1.0);
    }

    #[test]
    fn test_couple_wet_cools() {
        // Cold lowland gets moisture boosts, pushing it past the wet cutoff
        let out = couple(layers(0.0, 0.9, 0.0));
        // temperature: 0 + 0.175 = 0.175, which is < 0.20
        // moisture: 0.9 + 0.21 -> 1.0, + 0.00625 -> 1.0, ^1.1 = 1.0
        assert_approx_eq!(out.moisture, 1.0);
        assert_approx_eq!(out.temperature, 0.175 - 0.04);
    }

    #[test]
    fn test_normalize_stretches() {
        let raw = vec![layers(0.2, 0.4, 0.3), layers(0.6, 0.4, 0.5)];
        let ranges = ObservedRanges::observe(&raw).unwrap();
        let low = ranges.normalize(&raw[0]);
        let high = ranges.normalize(&raw[1]);
        assert_approx_eq!(low.elevation, 0.0);
        assert_approx_eq!(high.elevation, 1.0);
        assert_approx_eq!(low.temperature, 0.0);
        assert_approx_eq!(high.temperature, 1.0);
        // Flat layer uses the fallback span, so it just shifts to 0
        assert_approx_eq!(low.moisture, 0.0);
        assert_approx_eq!(high.moisture, 0.0);

        assert!(ObservedRanges::observe(&[]).is_err());
    }

    #[test]
    fn test_generate_fills_every_cell() {
        let config = WorldConfig {
            width: 12,
            height: 10,
            seeds: SeedConfig::from_master(&Seed::Int(77)),
            ..Default::default()
        };
        let mut world = WorldBuilder::new(&config);
        LayerGenerator.generate(&mut world).unwrap();

        let mut elevations = Vec::new();
        for cell in world.cells.iter() {
            for value in vec![
                cell.elevation().unwrap(),
                cell.moisture().unwrap(),
                cell.temperature().unwrap(),
            ] {
                assert!((0.0..=1.0).contains(&value));
            }
            elevations.push(cell.elevation().unwrap());
        }

        // Renormalization stretches elevation over the full range
        let range = NumRange::observe(elevations).unwrap();
        assert_approx_eq!(range.min, 0.0);
        assert_approx_eq!(range.max, 1.0);
    }

    #[test]
    fn test_generate_latitude_gradient() {
        let config = WorldConfig {
            width: 60,
            height: 60,
            seeds: SeedConfig::from_master(&Seed::from("lat")),
            ..Default::default()
        };
        let mut world = WorldBuilder::new(&config);
        LayerGenerator.generate(&mut world).unwrap();

        let row_mean = |y: u16| {
            let total: f64 = (0..config.width)
                .map(|x| {
                    world.cells[HexPoint::new(x, y)].temperature().unwrap()
                })
                .sum();
            total / f64::from(config.width)
        };
        // First row is the cold edge, last row is the hot edge
        let first = row_mean(0);
        let last = row_mean(config.height - 1);
        assert!(first < 0.5, "first row too warm: {}", first);
        assert!(last > 0.5, "last row too cold: {}", last);
        assert!(first < last);
    }
}
