//! Movement - Wristwatch Firmware
//!
//! Main firmware binary for RP2040 boards carrying a segment LCD, three
//! buttons, a piezo buzzer and an RGB LED. Faces run on the board-agnostic
//! `movement-core` runtime; this crate binds it to the hardware.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use movement_core::config::{parse_config, WatchConfig};
use movement_core::display::LcdVariant;
use movement_core::event::Button;
use movement_core::registry::RegistryError;
use movement_core::{FaceRegistry, Movement, Runtime};
use movement_faces::{
    ClockFace, CoinFlipFace, DaysSinceFace, DeadlineFace, PinFace, ProbabilityFace, SchoolFace,
    SetLocationFace, WordleFace,
};
use movement_hal::Ht1621;
use movement_hal_rp2040::flash::{FlashError, FlashStorage};
use movement_hal_rp2040::gpio::{Button as ButtonPin, OutputLine};
use movement_hal_rp2040::pwm::{Output as PwmOutputPin, PwmChannel, LED_PERIOD_US};

use crate::config::{ConfigError, ConfigPersistence};
use crate::entropy::EntropyRng;
use crate::files::SharedFs;

mod channels;
mod clock;
mod config;
mod entropy;
mod files;
mod tasks;
mod zones;

/// Embedded default configuration (compiled into firmware)
/// Edit watch.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../watch.toml");

#[cfg(feature = "custom-lcd")]
const LCD_VARIANT: LcdVariant = LcdVariant::Custom;
#[cfg(not(feature = "custom-lcd"))]
const LCD_VARIANT: LcdVariant = LcdVariant::Classic;

/// Buzzer period before the first note (A4)
const BUZZER_IDLE_PERIOD_US: u32 = 2_273;

// Everything the runtime borrows must live forever
static FS: StaticCell<SharedFs> = StaticCell::new();
static RNG: StaticCell<EntropyRng> = StaticCell::new();
static RUNTIME: StaticCell<Runtime<'static>> = StaticCell::new();

static CLOCK_FACE: StaticCell<ClockFace> = StaticCell::new();
static SCHOOL_FACE: StaticCell<SchoolFace> = StaticCell::new();
static DEADLINE_FACE: StaticCell<DeadlineFace> = StaticCell::new();
static DAYS_SINCE_FACE: StaticCell<DaysSinceFace> = StaticCell::new();
static WORDLE_FACE: StaticCell<WordleFace> = StaticCell::new();
static COIN_FLIP_FACE: StaticCell<CoinFlipFace> = StaticCell::new();
static PROBABILITY_FACE: StaticCell<ProbabilityFace> = StaticCell::new();
static SET_LOCATION_FACE: StaticCell<SetLocationFace> = StaticCell::new();
static PIN_FACE: StaticCell<PinFace> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Movement firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Configuration, settings and face files all come out of flash
    let mut persistence = ConfigPersistence::new(FlashStorage::new(p.FLASH, p.DMA_CH0));
    let config = load_config(&mut persistence).await;
    let stored_settings = match persistence.load_settings().await {
        Ok(settings) => {
            info!("Restored settings from flash");
            Some(settings)
        }
        Err(ConfigError::Flash(FlashError::NotFound)) => None,
        Err(e) => {
            warn!("Ignoring stored settings: {:?}", e);
            None
        }
    };
    let loaded = persistence.load_files().await;
    info!("Loaded {} face files", loaded);
    let storage = persistence.into_storage();

    info!("LCD variant {:?}", LCD_VARIANT);
    let fs = FS.init(SharedFs);
    let rng = RNG.init(EntropyRng::new(Instant::now().as_ticks() as u32));
    let mut movement = Movement::new(LCD_VARIANT, config.settings, fs, rng, &zones::ZONES);
    movement.apply_config(&config);
    if let Some(settings) = stored_settings {
        movement.set_settings(settings);
        movement.take_settings_dirty();
    }

    let registry = match build_registry(config.secondary_face) {
        Ok(registry) => registry,
        Err(e) => defmt::panic!("Face registry rejected: {:?}", e),
    };
    info!("{} faces registered", registry.len());
    let runtime = match Runtime::new(registry, movement) {
        Ok(runtime) => RUNTIME.init(runtime),
        Err(e) => defmt::panic!("Runtime rejected the registry: {:?}", e),
    };
    runtime.boot(clock::now());
    info!("Runtime booted");

    // Segment LCD controller (CS=GPIO2, WR=GPIO3, DATA=GPIO4)
    let lcd = Ht1621::new(
        OutputLine::new(Output::new(p.PIN_2, Level::High)),
        OutputLine::new(Output::new(p.PIN_3, Level::High)),
        OutputLine::new(Output::new(p.PIN_4, Level::Low)),
        Delay,
    );

    // Piezo on GPIO14, LED red/green/blue on GPIO16/18/20
    let buzzer = PwmChannel::new(
        Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, PwmConfig::default()),
        PwmOutputPin::A,
        BUZZER_IDLE_PERIOD_US,
    );
    let led = [
        PwmChannel::new(
            Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, PwmConfig::default()),
            PwmOutputPin::A,
            LED_PERIOD_US,
        ),
        PwmChannel::new(
            Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, PwmConfig::default()),
            PwmOutputPin::A,
            LED_PERIOD_US,
        ),
        PwmChannel::new(
            Pwm::new_output_a(p.PWM_SLICE2, p.PIN_20, PwmConfig::default()),
            PwmOutputPin::A,
            LED_PERIOD_US,
        ),
    ];
    let outputs = tasks::Outputs { lcd, buzzer, led };

    // Buttons are active high (LIGHT=GPIO10, MODE=GPIO11, ALARM=GPIO12)
    let light = ButtonPin::new(Input::new(p.PIN_10, Pull::Down));
    let mode = ButtonPin::new(Input::new(p.PIN_11, Pull::Down));
    let alarm = ButtonPin::new(Input::new(p.PIN_12, Pull::Down));

    info!("Hardware initialized");

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::fast_tick_task()).unwrap();
    spawner.spawn(tasks::button_task(light, Button::Light)).unwrap();
    spawner.spawn(tasks::button_task(mode, Button::Mode)).unwrap();
    spawner.spawn(tasks::button_task(alarm, Button::Alarm)).unwrap();
    spawner.spawn(tasks::storage_task(storage)).unwrap();
    spawner.spawn(tasks::runtime_task(runtime, outputs)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Register every face; the order is the MODE button order
fn build_registry(secondary: Option<u8>) -> Result<FaceRegistry<'static>, RegistryError> {
    let mut registry = FaceRegistry::new();
    registry.register(CLOCK_FACE.init(ClockFace::new()))?;
    registry.register(SCHOOL_FACE.init(SchoolFace::new()))?;
    registry.register(DEADLINE_FACE.init(DeadlineFace::new()))?;
    registry.register(DAYS_SINCE_FACE.init(DaysSinceFace::new(0)))?;
    registry.register(WORDLE_FACE.init(WordleFace::new()))?;
    registry.register(COIN_FLIP_FACE.init(CoinFlipFace::new()))?;
    registry.register(PROBABILITY_FACE.init(ProbabilityFace::new()))?;
    registry.register(SET_LOCATION_FACE.init(SetLocationFace::new()))?;
    registry.register(PIN_FACE.init(PinFace::new()))?;

    if let Err(e) = registry.set_secondary(secondary) {
        warn!("Secondary face {:?} rejected: {:?}", secondary, e);
    }
    Ok(registry)
}

/// Load configuration from flash, falling back to the embedded watch.toml
async fn load_config(persistence: &mut ConfigPersistence<'_>) -> WatchConfig {
    match persistence.load().await {
        Ok(config) => {
            info!("Loaded configuration from flash");
            config
        }
        Err(ConfigError::Flash(FlashError::NotFound)) => {
            info!("No configuration in flash, using embedded defaults");
            embedded_config()
        }
        Err(e) => {
            warn!("Configuration in flash rejected: {:?}, using embedded defaults", e);
            embedded_config()
        }
    }
}

/// Parse the watch.toml compiled into the image
///
/// build.rs has already validated it, so a failure here means the parser
/// and the build script disagree.
fn embedded_config() -> WatchConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            WatchConfig::default()
        }
    }
}
