// in-crate modules
mod config;

// in-crate imports
use config::*;

// this crate's library
use tsl_light::{Family, Gain, IntegrationTime, Tsl, variant};

// my libraries
use xdg_dirs::{dirs, xdg_location_of, xdg_user_dir};

// STD
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::{fs, thread, time};

// 3rd party libraries
use anyhow::Context;
use clap::{Parser, Subcommand, command};
use ftdi_embedded_hal as hal;
use log::{debug, info, warn};

const CONFIG_PATH: &str = "tsl-light/config.ron";

const DEFAULT_CONFIG: &str = r#"
(
sensor: (
    model: Tsl2561,
    time: Some(402),
    gain: Some(1),
),
adapter: (
    vid: 0x0403,
    pid: 0x6014,
),
interval_ms: 1000,
)
"#;

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    #[command(about = "(default) Periodically read the light level and print it in lux.")]
    Read {
        #[arg(short = 'n', long, help = "Stop after this many readings")]
        count: Option<u32>,
    },

    #[command(
        about = "Check configuration file syntax and print out the sensor settings that will be applied."
    )]
    Check,

    #[command(about = "Generate a default config file")]
    GenConfig,

    #[command(about = "List the supported sensor models")]
    Models,

    #[command(about = "Power down the sensor")]
    Sleep,
}

#[derive(Debug, Parser, PartialEq)]
#[command(about = "Read ambient light from a TSL2561 or TSL4531 sensor over an FTDI USB-I2C bridge", version)]
struct Args {
    #[arg(
        global = true,
        short,
        long = "config",
        help = format!("Path to configuration file. Defaults to `{CONFIG_PATH}` under the user's config directory."),
    )]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    /// Get the config path, and verify the file exists. This is the either the path passed as an arg, or from the XDG directory if not specified.
    ///
    /// This returns error if the path does not exist.
    fn get_config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config_path {
            Some(path) => path
                .canonicalize()
                .with_context(|| format!("Could not open config file `{0}`", path.display())),
            None => xdg_location_of(&dirs::CONFIG, CONFIG_PATH)
                .with_context(|| "Could not open config file"),
        }
    }
}

/// Load the configuration based on arguments.
/// Uses the file supplied to the CLI, or in the default location if not specified, or the default config if there is no file.
fn get_config(args: &Args) -> anyhow::Result<Config> {
    match args.get_config_path() {
        Ok(path) => {
            info!("Reading config from {path}", path = path.display());
            Config::read_from_file(path)
        }
        Err(err) => {
            warn!("Config file not found in any standard locations, using default configuration.");
            warn!("  Config search error: {err}");
            Config::from_str(DEFAULT_CONFIG)
        }
    }
}

/// Driver errors carry the bus error type, which need not be `Send + Sync`, so flatten them to a message.
fn driver_error<E: Debug>(e: tsl_light::Error<E>) -> anyhow::Error {
    anyhow::anyhow!("{e}")
}

/// Open the FTDI bridge and initialize the sensor as configured.
fn open_sensor(config: &Config) -> anyhow::Result<Tsl<hal::I2c<ftdi::Device>>> {
    let device = ftdi::find_by_vid_pid(config.adapter.vid, config.adapter.pid)
        .interface(ftdi::Interface::A)
        .open()?;
    let i2c = hal::FtHal::init_default(device)?.i2c()?;

    let sensor = &config.sensor;
    let tsl = Tsl::init(
        i2c,
        sensor.model.variant(),
        sensor.address(),
        sensor.time(),
        sensor.gain(),
    )
    .map_err(driver_error)
    .with_context(|| format!("Failed to initialize {0:?}", sensor.model))?;

    info!("Initialized {tsl}");
    Ok(tsl)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    debug!("args = {args:?}");

    // process commands
    match args.command {
        // Primary behaviour: repeatedly read the light level
        None => read_loop(&args, None),
        Some(Command::Read { count }) => read_loop(&args, count),

        // Test config file: make sure it exists, can be read, and can be parsed
        Some(Command::Check) => check_config(&args),

        // Generate config file: if the file does not already exist, write
        Some(Command::GenConfig) => gen_config_file(&args),

        Some(Command::Models) => list_models(),

        Some(Command::Sleep) => sleep_sensor(&args),
    }
}

/// Verify the config file: Make sure it can be found at the expected location (passed through CLI or using XDG config location), and parses properly.
fn check_config(args: &Args) -> anyhow::Result<()> {
    // Try to _find_ the config file
    let path = args
        .get_config_path()
        .with_context(|| "Failed to find config file")?;

    // Try to _parse_ the config file
    println!("Attempting to load config from `{0}`", path.display());
    let config = Config::read_from_file(path).with_context(|| "Failed to parse configuration")?;

    println!("Successfully read config: {config:#?}");

    // Resolve defaults and validate them against the model, without touching the hardware
    let sensor = &config.sensor;
    let variant = sensor.model.variant();
    let family = variant.family();

    println!("\nSensor {0} at address {1:#04X}", variant.name, sensor.address());

    let time = sensor.time();
    match IntegrationTime::from_ms(family, time) {
        Some(t) => println!("  Integration time: {0} ms", t.ms()),
        None => anyhow::bail!(
            "Integration time {time} ms not supported by {0}, expected one of {1:?}",
            variant.name,
            family.supported_times()
        ),
    }

    match (family, sensor.gain) {
        (Family::Tsl2561, _) => {
            let gain = sensor.gain().unwrap_or(1);
            if Gain::from_value(gain).is_none() {
                anyhow::bail!("Gain {gain} not supported, expected 1 or 16");
            }
            println!("  Gain: {gain}x");
        }
        (Family::Tsl4531, Some(gain)) => {
            println!("  Gain: {gain}x ignored, {0} has no gain setting", variant.name)
        }
        (Family::Tsl4531, None) => {}
    }

    println!(
        "  Adapter: {0:04x}:{1:04x}, reading every {2} ms",
        config.adapter.vid, config.adapter.pid, config.interval_ms
    );

    Ok(())
}

/// Generate a default configuration file, at the expected location based on args or environment variables.
fn gen_config_file(args: &Args) -> anyhow::Result<()> {
    // CLI arg path, or default from environment
    let path = args
        .config_path
        .clone()
        .map_or_else(|| xdg_user_dir(&dirs::CONFIG, CONFIG_PATH), Ok)
        .with_context(|| "Could not determine location for config file")?;

    // Create parent directory path if applicable
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create parent directory of the new config file {0}",
                path.display()
            )
        })?;
    }

    // Create the new file and write the default contents
    let mut file = File::create_new(&path)
        .with_context(|| format!("Failed to create new config file {0}", path.display()))?;

    write!(file, "{}", DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write the new config file {0}", path.display()))?;

    println!("Wrote default config to {0}", path.display());
    Ok(())
}

fn list_models() -> anyhow::Result<()> {
    for v in variant::ALL {
        let gain = v
            .default_gain
            .map_or_else(|| "-".to_string(), |g| format!("{g}x"));
        println!(
            "{0:<10} address={1:#04X} time={2}ms gain={3} formula={4:?}",
            v.name, v.address, v.default_time, gain, v.formula
        );
    }
    Ok(())
}

/// Default behaviour: read config, then read the sensor every `interval_ms` until `count` readings are done (forever if `None`).
fn read_loop(args: &Args, count: Option<u32>) -> anyhow::Result<()> {
    let config = get_config(args)?;
    debug!("Loaded configuration: {config:?}");

    let mut sensor = open_sensor(&config)?;
    let interval = time::Duration::from_millis(config.interval_ms);

    let mut taken = 0;
    loop {
        let reading = sensor.read_lux().map_err(driver_error)?;
        if reading.stale {
            warn!("No broadband light detected, repeating last valid reading");
        }
        println!("{reading}");

        taken += 1;
        if count.is_some_and(|n| taken >= n) {
            return Ok(());
        }

        thread::sleep(interval);
    }
}

fn sleep_sensor(args: &Args) -> anyhow::Result<()> {
    let config = get_config(args)?;
    let mut sensor = open_sensor(&config)?;
    sensor.sleep().map_err(driver_error)?;
    println!("{sensor} powered down");
    Ok(())
}
