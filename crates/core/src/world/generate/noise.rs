use crate::config::NoiseLayerConfig;
use ::noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use std::f64::consts::PI;

/// Cheap, stateless pseudo-random value in [0,1) for a point. This is the
/// classic shader hash: the same `(x, y, seed)` always gives the same value,
/// and it never touches a random stream. Used for sub-cell jitter, where we
/// want noise that's uncorrelated between neighboring cells.
pub fn jitter(x: f64, y: f64, seed: f64) -> f64 {
    let raw = ((x + seed * 0.37) * 12.9898 + (y + seed * 0.71) * 78.233)
        .sin()
        * 43758.5453123;
    let fraction = raw - raw.floor();
    // Float rounding can land exactly on 1.0 for tiny negative inputs
    if fraction < 1.0 {
        fraction
    } else {
        0.0
    }
}

/// Multi-octave Perlin noise that hides the axis-aligned artifacts Perlin is
/// known for. Each point is sampled under three rotations (0°, 60° and 120°),
/// each with its own seed, and the results are averaged. Output is roughly in
/// [-1,1].
///
/// The underlying fractal sources are built once up front, so construct one of
/// these per layer and reuse it for every cell.
#[derive(Clone, Debug)]
pub struct IsotropicNoise {
    /// Input coordinates are divided by this before sampling
    scale: f64,
    /// One fBm source per rotation, paired with the rotation's (cos, sin)
    sources: Vec<(Fbm<Perlin>, f64, f64)>,
}

impl IsotropicNoise {
    /// Number of rotated copies that get averaged together
    const ROTATIONS: u32 = 3;
    /// Seed step between rotated copies
    const SEED_STEP: u32 = 97;

    pub fn new(seed_base: u32, config: &NoiseLayerConfig) -> Self {
        let sources = (0..Self::ROTATIONS)
            .map(|i| {
                let angle = f64::from(i) * PI / 3.0;
                let fbm = Fbm::<Perlin>::new(
                    seed_base.wrapping_add(Self::SEED_STEP * i),
                )
                .set_octaves(config.octaves)
                .set_frequency(1.0)
                .set_lacunarity(config.lacunarity)
                .set_persistence(config.persistence);
                (fbm, angle.cos(), angle.sin())
            })
            .collect();
        Self {
            scale: config.scale,
            sources,
        }
    }

    /// Get the noise value at a point
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let total: f64 = self
            .sources
            .iter()
            .map(|(fbm, cos, sin)| {
                let rx = x * cos - y * sin;
                let ry = x * sin + y * cos;
                fbm.get([rx / self.scale, ry / self.scale])
            })
            .sum();
        total / self.sources.len() as f64
    }
}
