use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexgen::{
    timed,
    weather::{DailyWeather, WeatherSampler},
    HexPoint, Seed, SeedConfig, World, WorldConfig,
};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// Number of days between weather samples for `--weather`
const WEATHER_INTERVAL: u16 = 14;

/// CLI for generating hex-grid campaign maps
#[derive(Debug, StructOpt)]
#[structopt(name = "hexgen")]
struct Opt {
    /// Path to a config file that defines the world to be generated. Supported
    /// formats: JSON, TOML. If not given, the default config is used.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Master seed for the world. Every channel seed (elevation, moisture,
    /// temperature, hydrology) is derived from this, replacing any seeds in
    /// the config file. Can be a number or any string.
    #[structopt(short, long, parse(from_str))]
    seed: Option<Seed>,

    /// Override the number of hex columns in the world
    #[structopt(long)]
    width: Option<u16>,

    /// Override the number of hex rows in the world
    #[structopt(long)]
    height: Option<u16>,

    /// If given, the generated world will be saved to this directory. The
    /// exact files that appear in the directory are defined by the output
    /// formats. See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the world in. Supported formats:
    ///
    /// axial - JSON array of hexes in axial coordinates, with terrain and
    ///   water features. This is what static hex-map viewers consume
    ///
    /// cfg - The full config object used for the world, in TOML format. Use
    ///   this to regenerate the same world later
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// Print a year of weather for the hex at this position, given as `x,y`
    /// in offset coordinates
    #[structopt(long, parse(try_from_str = parse_point))]
    weather: Option<HexPoint>,

    /// Seed for weather sampling. Weather is seeded separately from terrain,
    /// so the same map can have different weather.
    #[structopt(long, default_value = "42", parse(from_str))]
    weather_seed: Seed,

    /// The logging level to use during world generation. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export every hex in axial coordinates, as JSON
    Axial,
    /// Export the world's full config in a human-readable file
    Cfg,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Axial => "json",
            Self::Cfg => "toml",
        }
    }
}

/// Parse an `x,y` pair into a position
fn parse_point(s: &str) -> anyhow::Result<HexPoint> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected x,y but got {:?}", s))?;
    Ok(HexPoint::new(
        x.trim().parse().context("invalid x")?,
        y.trim().parse().context("invalid y")?,
    ))
}

fn load_config(config_path: &Path) -> anyhow::Result<WorldConfig> {
    // Load config
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Build the world config from the config file (if any) plus command line
/// overrides
fn build_config(opt: &Opt) -> anyhow::Result<WorldConfig> {
    let mut config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = &opt.seed {
        config.seeds = SeedConfig::from_master(seed);
    }
    if let Some(width) = opt.width {
        config.width = width;
    }
    if let Some(height) = opt.height {
        config.height = height;
    }
    Ok(config)
}

/// Generate an output form of the world in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    world: &World,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        world: &World,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(match output_format {
            OutputFormat::Axial => world.to_axial_json()?.into_bytes(),
            OutputFormat::Cfg => {
                // Serialize just the world config via toml
                toml::to_string_pretty(world.config())
                    .context("error serializing config")?
                    .into_bytes()
            }
        })
    }

    let output_file_path = output_dir
        .join("world")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, world)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Print a year of weather for one hex
fn print_weather(
    world: &World,
    position: HexPoint,
    weather_seed: &Seed,
) -> anyhow::Result<()> {
    let cell = world
        .cell(position)
        .ok_or_else(|| anyhow!("{} is outside the world", position))?;
    info!(
        "Weather for {} ({}, {})",
        position,
        cell.terrain(),
        position.to_axial()
    );

    let sampler = WeatherSampler::new(weather_seed);
    for (date, weather) in sampler.sample_year(cell, WEATHER_INTERVAL)? {
        let DailyWeather {
            temperature_f,
            condition,
            wind_speed_mph,
            ..
        } = weather;
        let effect = weather.effect().unwrap_or_default();
        println!(
            "{:<14} {:>4}F  {:<11} wind {:>2} mph  {}",
            date.to_string(),
            temperature_f,
            condition.to_string(),
            wind_speed_mph,
            effect
        );
    }
    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = build_config(&opt)?;
    let world = World::generate(config)?;

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = &opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(output_dir)?;

        for output_format in &opt.output_formats {
            gen_output(output_dir, *output_format, &world)?;
        }
    }

    if let Some(position) = opt.weather {
        print_weather(&world, position, &opt.weather_seed)?;
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
