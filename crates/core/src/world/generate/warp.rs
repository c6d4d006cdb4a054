use crate::{
    config::WarpConfig,
    world::generate::{
        noise::{jitter, IsotropicNoise},
        NoiseSeeds,
    },
};
use std::f64::consts::FRAC_PI_4;

/// A 2D coordinate in noise space
pub type NoisePoint = (f64, f64);

/// Where to sample each layer for a single cell. Each layer gets its own
/// perturbed coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WarpedPoint {
    pub elevation: NoisePoint,
    pub moisture: NoisePoint,
    pub temperature: NoisePoint,
}

/// Turns grid positions into noise-space sample positions. Sampling the hex
/// grid directly makes the row/column structure visible in the output, so
/// every position is:
///
/// 1. Laid out in true hex spacing
/// 2. Jittered by a small stateless hash offset
/// 3. Displaced by low-frequency noise (one field for elevation, one for
///    moisture; temperature borrows a fraction of the elevation field)
/// 4. Rotated 45° so no remaining structure lines up with the axes
#[derive(Clone, Debug)]
pub struct DomainWarp {
    config: WarpConfig,
    /// Jitter seed, taken from the elevation channel
    jitter_seed: f64,
    elevation_x: IsotropicNoise,
    elevation_y: IsotropicNoise,
    moisture_x: IsotropicNoise,
    moisture_y: IsotropicNoise,
}

impl DomainWarp {
    /// Vertical distance between row centers in a hex layout
    const ROW_SPACING: f64 = 0.866_025_403_784_438_6; // √3/2
    /// Extra damping on the elevation displacement
    const ELEVATION_DAMPING: f64 = 0.8;
    /// Offsets for the y-component samples, so they're decorrelated from x
    const ELEVATION_Y_OFFSET: NoisePoint = (997.0, 421.0);
    const MOISTURE_Y_OFFSET: NoisePoint = (503.0, 211.0);

    pub fn new(config: &WarpConfig, seeds: &NoiseSeeds) -> Self {
        let elevation = seeds.elevation;
        let moisture = seeds.moisture;
        Self {
            config: *config,
            jitter_seed: f64::from(elevation),
            elevation_x: IsotropicNoise::new(
                elevation.wrapping_add(13),
                &config.elevation_noise,
            ),
            elevation_y: IsotropicNoise::new(
                elevation.wrapping_add(37),
                &config.elevation_noise,
            ),
            moisture_x: IsotropicNoise::new(
                moisture.wrapping_add(19),
                &config.moisture_noise,
            ),
            moisture_y: IsotropicNoise::new(
                moisture.wrapping_add(41),
                &config.moisture_noise,
            ),
        }
    }

    /// Rotate a point 45° counterclockwise about the origin
    fn rotate((x, y): NoisePoint) -> NoisePoint {
        let (sin, cos) = FRAC_PI_4.sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }

    /// Hex-spaced, jittered position for a cell, before any noise
    /// displacement
    pub fn base(&self, x: u16, y: u16) -> NoisePoint {
        let offset = if y % 2 == 1 { 0.5 } else { 0.0 };
        let bx = f64::from(x) + offset;
        let by = f64::from(y) * Self::ROW_SPACING;

        let jx = jitter(bx, by, self.jitter_seed + 0.1234);
        let jy = jitter(bx, by, self.jitter_seed + 987.654);
        (
            bx + (jx - 0.5) * self.config.jitter_strength_x,
            by + (jy - 0.5) * self.config.jitter_strength_y,
        )
    }

    /// Get the layer sample positions for a cell
    pub fn warp(&self, x: u16, y: u16) -> WarpedPoint {
        let (bx, by) = self.base(x, y);

        // Elevation displacement is sampled in rotated space
        let (rx, ry) = Self::rotate((bx, by));
        let (ox, oy) = Self::ELEVATION_Y_OFFSET;
        let strength =
            self.config.elevation_strength * Self::ELEVATION_DAMPING;
        let wx = self.elevation_x.sample(rx, ry) * strength;
        let wy = self.elevation_y.sample(rx + ox, ry + oy) * strength;

        // Moisture displacement is sampled in unrotated space
        let (ox, oy) = Self::MOISTURE_Y_OFFSET;
        let strength = self.config.moisture_strength;
        let mx = self.moisture_x.sample(bx, by) * strength;
        let my = self.moisture_y.sample(bx + ox, by + oy) * strength;

        let t = self.config.temperature_factor;
        WarpedPoint {
            elevation: Self::rotate((bx + wx, by + wy)),
            moisture: Self::rotate((bx + mx, by + my)),
            temperature: Self::rotate((bx + wx * t, by + wy * t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn seeds() -> NoiseSeeds {
        NoiseSeeds {
            elevation: 1234,
            moisture: 5678,
            temperature: 9012,
        }
    }

    #[test]
    fn test_rotate() {
        let (x, y) = DomainWarp::rotate((1.0, 0.0));
        assert_approx_eq!(x, FRAC_PI_4.cos());
        assert_approx_eq!(y, FRAC_PI_4.sin());
    }

    #[test]
    fn test_base_without_jitter() {
        let config = WarpConfig {
            jitter_strength_x: 0.0,
            jitter_strength_y: 0.0,
            ..Default::default()
        };
        let warp = DomainWarp::new(&config, &seeds());
        let (x, y) = warp.base(2, 0);
        assert_approx_eq!(x, 2.0);
        assert_approx_eq!(y, 0.0);
        // Odd rows get shoved half a cell to the right
        let (x, y) = warp.base(2, 3);
        assert_approx_eq!(x, 2.5);
        assert_approx_eq!(y, 3.0 * 3f64.sqrt() / 2.0);
    }

    #[test]
    fn test_jitter_bounded() {
        let config = WarpConfig::default();
        let warp = DomainWarp::new(&config, &seeds());
        for x in 0..20 {
            for y in 0..20 {
                let (bx, by) = warp.base(x, y);
                let offset = if y % 2 == 1 { 0.5 } else { 0.0 };
                let dx = bx - (f64::from(x) + offset);
                let dy = by - f64::from(y) * DomainWarp::ROW_SPACING;
                assert!(dx.abs() <= config.jitter_strength_x / 2.0);
                assert!(dy.abs() <= config.jitter_strength_y / 2.0);
            }
        }
    }

    #[test]
    fn test_no_displacement() {
        // With every strength at zero, all three layers sample the rotated
        // base position
        let config = WarpConfig {
            elevation_strength: 0.0,
            moisture_strength: 0.0,
            ..Default::default()
        };
        let warp = DomainWarp::new(&config, &seeds());
        let point = warp.warp(5, 7);
        let expected = DomainWarp::rotate(warp.base(5, 7));
        for (x, y) in
            vec![point.elevation, point.moisture, point.temperature]
        {
            assert_approx_eq!(x, expected.0);
            assert_approx_eq!(y, expected.1);
        }
    }

    #[test]
    fn test_warp_deterministic() {
        let config = WarpConfig::default();
        let a = DomainWarp::new(&config, &seeds());
        let b = DomainWarp::new(&config, &seeds());
        assert_eq!(a.warp(10, 11), b.warp(10, 11));
    }
}
