//! Daily weather for a single hex. Weather isn't part of world generation:
//! it's a pure function of a seed, a position and a day, layered on top of a
//! finished world's climate values. It never touches the generator's random
//! stream, so sampling weather can't change the world and vice versa.

use crate::{util::clamp_unit, Cell, HexPoint, Seed};
use anyhow::ensure;
use derive_more::Display;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use std::f64::consts::PI;
use strum::EnumIter;

/// Number of days in a year: 12 months of 28 days each
pub const DAYS_IN_YEAR: u16 = 336;
pub const DAYS_IN_MONTH: u16 = 28;
pub const MONTH_NAMES: [&str; 12] = [
    "Nuwmont",
    "Vatermont",
    "Thaumont",
    "Flaurmont",
    "Yarthmont",
    "Klarmont",
    "Felmont",
    "Fyrmont",
    "Ambyrmont",
    "Sviftmont",
    "Eirmont",
    "Kaldmont",
];

/// A day in the year, as it would be written in a campaign journal
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "{} {}", month, day)]
pub struct CalendarDate {
    pub month: &'static str,
    /// Day of the month, starting at 1
    pub day: u16,
}

impl CalendarDate {
    /// Convert a 0-based day of the year to a date. Returns an error if the
    /// day isn't in the year.
    pub fn from_day_of_year(day_of_year: u16) -> anyhow::Result<Self> {
        ensure_day_of_year(day_of_year)?;
        Ok(Self {
            month: MONTH_NAMES[usize::from(day_of_year / DAYS_IN_MONTH)],
            day: day_of_year % DAYS_IN_MONTH + 1,
        })
    }
}

fn ensure_day_of_year(day_of_year: u16) -> anyhow::Result<()> {
    ensure!(
        day_of_year < DAYS_IN_YEAR,
        "day of year {} is outside [0, {})",
        day_of_year,
        DAYS_IN_YEAR
    );
    Ok(())
}

/// Overall weather for a day
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::Display, EnumIter, Serialize,
)]
pub enum WeatherCondition {
    Clear,
    Overcast,
    #[strum(to_string = "Light Rain")]
    LightRain,
    /// Mud slows travel
    #[strum(to_string = "Heavy Rain")]
    HeavyRain,
    /// Travel stops
    Storm,
    #[strum(to_string = "Light Snow")]
    LightSnow,
    /// Travel is halved
    #[strum(to_string = "Heavy Snow")]
    HeavySnow,
    /// Travel stops
    Blizzard,
    /// Travelers need double water
    Heatwave,
}

/// The weather for one hex on one day
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DailyWeather {
    pub temperature_f: i32,
    pub condition: WeatherCondition,
    pub wind_speed_mph: u32,
    /// Multiplier on overland movement. 1.0 is normal speed, 0.0 means no
    /// travel is possible.
    pub movement_penalty: f64,
}

impl DailyWeather {
    /// A short note on how this weather affects travelers, if it does at all
    pub fn effect(&self) -> Option<String> {
        if self.condition == WeatherCondition::Heatwave {
            Some("Water x2".into())
        } else if self.movement_penalty < 1.0 {
            Some(format!("Move x{}", self.movement_penalty))
        } else {
            None
        }
    }
}

/// The climate values that weather is derived from, all in [0,1]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalClimate {
    pub temperature: f64,
    pub moisture: f64,
    pub elevation: f64,
}

impl From<&Cell> for LocalClimate {
    fn from(cell: &Cell) -> Self {
        Self {
            temperature: cell.temperature(),
            moisture: cell.moisture(),
            elevation: cell.elevation(),
        }
    }
}

/// Samples deterministic daily weather. The same seed, hex and day always
/// give the same weather.
#[derive(Copy, Clone, Debug)]
pub struct WeatherSampler {
    global_seed: u64,
}

impl WeatherSampler {
    /// Spread between the coldest and hottest possible temperatures, in °F
    const TEMPERATURE_SPAN_F: f64 = 130.0;
    const MIN_TEMPERATURE_F: f64 = -20.0;
    const FREEZING_F: i32 = 32;
    const HEATWAVE_F: i32 = 90;
    /// Strength of the seasonal temperature swing
    const SEASON_STRENGTH: f64 = 0.25;
    /// Max daily temperature fluctuation, in either direction
    const DAILY_VARIANCE: f64 = 0.05;
    /// Days strictly inside this range are the wet season
    const WET_SEASON: (u16, u16) = (50, 100);
    const WINDY_ELEVATION: f64 = 0.7;

    pub fn new(global_seed: &Seed) -> Self {
        Self {
            global_seed: global_seed.to_u64(),
        }
    }

    /// Temperature shift for a day of the year, in [-0.25, 0.25]. Day 0 is
    /// midwinter, the middle of the year is midsummer.
    pub fn season_modifier(day_of_year: u16) -> f64 {
        let radians =
            f64::from(day_of_year) / f64::from(DAYS_IN_YEAR) * 2.0 * PI;
        -radians.cos() * Self::SEASON_STRENGTH
    }

    /// Seed for a single hex on a single day. Primes on x and y keep
    /// neighboring hexes from getting correlated seeds.
    fn local_seed(&self, position: HexPoint, day_of_year: u16) -> u64 {
        (self.global_seed.wrapping_add(u64::from(position.x) * 73_856_093)
            ^ (u64::from(position.y) * 19_349_663))
            ^ u64::from(day_of_year)
    }

    /// Get the weather for a hex on a day. Returns an error if the day isn't
    /// in the year (see [DAYS_IN_YEAR]).
    pub fn sample(
        &self,
        position: HexPoint,
        day_of_year: u16,
        climate: &LocalClimate,
    ) -> anyhow::Result<DailyWeather> {
        ensure_day_of_year(day_of_year)?;
        let mut rng =
            Pcg64::seed_from_u64(self.local_seed(position, day_of_year));

        // Temperature
        let variance =
            rng.gen_range(-Self::DAILY_VARIANCE..Self::DAILY_VARIANCE);
        let factor = clamp_unit(
            climate.temperature + Self::season_modifier(day_of_year) + variance,
        );
        let temperature_f = (Self::MIN_TEMPERATURE_F
            + factor * Self::TEMPERATURE_SPAN_F) as i32;

        // Precipitation, on a 2d6 bell curve. Wet places roll higher.
        let moisture_modifier = (climate.moisture * 8.0 - 4.0) as i32;
        let (wet_start, wet_end) = Self::WET_SEASON;
        let season_modifier =
            if wet_start < day_of_year && day_of_year < wet_end {
                1
            } else {
                0
            };
        let roll = roll_2d6(&mut rng) + moisture_modifier + season_modifier;
        let (condition, movement_penalty) =
            Self::condition(roll, temperature_f, climate.moisture);

        // Wind, also 2d6. Mountains are windier.
        let mut wind_roll = roll_2d6(&mut rng);
        if climate.elevation > Self::WINDY_ELEVATION {
            wind_roll += 2;
        }
        let wind_speed_mph = match wind_roll {
            2 => 0,
            roll if roll < 10 => rng.gen_range(5..=20),
            _ => rng.gen_range(30..=70),
        };

        Ok(DailyWeather {
            temperature_f,
            condition,
            wind_speed_mph,
            movement_penalty,
        })
    }

    /// Get the weather for a generated cell on a day
    pub fn sample_cell(
        &self,
        cell: &Cell,
        day_of_year: u16,
    ) -> anyhow::Result<DailyWeather> {
        self.sample(cell.position(), day_of_year, &LocalClimate::from(cell))
    }

    /// Sample a cell's weather across the whole year, every `interval` days
    /// starting on day 0
    pub fn sample_year(
        &self,
        cell: &Cell,
        interval: u16,
    ) -> anyhow::Result<Vec<(CalendarDate, DailyWeather)>> {
        ensure!(interval > 0, "sampling interval must be positive");
        (0..DAYS_IN_YEAR)
            .step_by(usize::from(interval))
            .map(|day| -> anyhow::Result<(CalendarDate, DailyWeather)> {
                Ok((
                    CalendarDate::from_day_of_year(day)?,
                    self.sample_cell(cell, day)?,
                ))
            })
            .collect()
    }

    /// Map a precipitation roll onto a condition and its movement penalty
    fn condition(
        roll: i32,
        temperature_f: i32,
        moisture: f64,
    ) -> (WeatherCondition, f64) {
        let freezing = temperature_f <= Self::FREEZING_F;
        if roll >= 10 {
            match (freezing, roll >= 12) {
                (true, true) => (WeatherCondition::Blizzard, 0.0),
                (true, false) => (WeatherCondition::HeavySnow, 0.5),
                (false, true) => (WeatherCondition::Storm, 0.0),
                (false, false) => (WeatherCondition::HeavyRain, 0.66),
            }
        } else if roll >= 8 {
            if freezing {
                (WeatherCondition::LightSnow, 1.0)
            } else {
                (WeatherCondition::LightRain, 1.0)
            }
        } else if roll <= 3 && temperature_f > Self::HEATWAVE_F {
            (WeatherCondition::Heatwave, 1.0)
        } else if roll >= 6 && moisture > 0.7 {
            (WeatherCondition::Overcast, 1.0)
        } else {
            (WeatherCondition::Clear, 1.0)
        }
    }
}

fn roll_2d6(rng: &mut impl Rng) -> i32 {
    rng.gen_range(1..=6) + rng.gen_range(1..=6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const TEMPERATE: LocalClimate = LocalClimate {
        temperature: 0.5,
        moisture: 0.6,
        elevation: 0.4,
    };

    #[test]
    fn test_calendar() {
        let date = CalendarDate::from_day_of_year(0).unwrap();
        assert_eq!(date.to_string(), "Nuwmont 1");
        let date = CalendarDate::from_day_of_year(29).unwrap();
        assert_eq!(date.to_string(), "Vatermont 2");
        let date = CalendarDate::from_day_of_year(335).unwrap();
        assert_eq!(date.to_string(), "Kaldmont 28");
        assert!(CalendarDate::from_day_of_year(336).is_err());
    }

    #[test]
    fn test_season_modifier() {
        assert_approx_eq!(WeatherSampler::season_modifier(0), -0.25);
        assert_approx_eq!(WeatherSampler::season_modifier(168), 0.25);
        assert_approx_eq!(WeatherSampler::season_modifier(84), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let sampler = WeatherSampler::new(&Seed::Int(42));
        let position = HexPoint::new(50, 50);
        for day in vec![0, 14, 99, 335] {
            assert_eq!(
                sampler.sample(position, day, &TEMPERATE).unwrap(),
                sampler.sample(position, day, &TEMPERATE).unwrap()
            );
        }
    }

    #[test]
    fn test_day_out_of_range() {
        let sampler = WeatherSampler::new(&Seed::Int(42));
        let err = sampler
            .sample(HexPoint::new(0, 0), DAYS_IN_YEAR, &TEMPERATE)
            .unwrap_err();
        assert_eq!(err.to_string(), "day of year 336 is outside [0, 336)");
    }

    #[test]
    fn test_sample_bounds() {
        let sampler = WeatherSampler::new(&Seed::from("misty isles"));
        let climates = vec![
            TEMPERATE,
            LocalClimate {
                temperature: 0.0,
                moisture: 0.0,
                elevation: 0.9,
            },
            LocalClimate {
                temperature: 1.0,
                moisture: 1.0,
                elevation: 0.1,
            },
        ];
        for climate in &climates {
            for day in (0..DAYS_IN_YEAR).step_by(7) {
                let weather =
                    sampler.sample(HexPoint::new(3, 8), day, climate).unwrap();
                assert!((-20..=110).contains(&weather.temperature_f));
                assert!(
                    weather.wind_speed_mph == 0
                        || (5..=70).contains(&weather.wind_speed_mph)
                );
                assert!((0.0..=1.0).contains(&weather.movement_penalty));
            }
        }
    }

    #[test]
    fn test_condition_table() {
        use WeatherCondition::*;
        let condition = WeatherSampler::condition;
        assert_eq!(condition(12, 20, 0.5), (Blizzard, 0.0));
        assert_eq!(condition(10, 32, 0.5), (HeavySnow, 0.5));
        assert_eq!(condition(13, 70, 0.5), (Storm, 0.0));
        assert_eq!(condition(11, 33, 0.5), (HeavyRain, 0.66));
        assert_eq!(condition(8, 0, 0.5), (LightSnow, 1.0));
        assert_eq!(condition(9, 50, 0.5), (LightRain, 1.0));
        assert_eq!(condition(3, 91, 0.5), (Heatwave, 1.0));
        assert_eq!(condition(3, 90, 0.5), (Clear, 1.0));
        assert_eq!(condition(6, 60, 0.71), (Overcast, 1.0));
        assert_eq!(condition(6, 60, 0.7), (Clear, 1.0));
        assert_eq!(condition(5, 60, 0.9), (Clear, 1.0));
    }

    #[test]
    fn test_effect() {
        let weather = DailyWeather {
            temperature_f: 60,
            condition: WeatherCondition::HeavyRain,
            wind_speed_mph: 10,
            movement_penalty: 0.66,
        };
        assert_eq!(weather.effect().as_deref(), Some("Move x0.66"));
        let weather = DailyWeather {
            condition: WeatherCondition::Heatwave,
            movement_penalty: 1.0,
            ..weather
        };
        assert_eq!(weather.effect().as_deref(), Some("Water x2"));
        let weather = DailyWeather {
            condition: WeatherCondition::Clear,
            ..weather
        };
        assert_eq!(weather.effect(), None);
    }
}
