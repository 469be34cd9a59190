//! PetCare Controller: main entry point
//!
//! Hexagonal architecture with a single cooperative tick loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Board (GpioActuators + sensors)   SoftRtc      LineReader     │
//! │  (ActuatorPort + SensorPort)       (ClockPort)  (serial in)    │
//! │  SerialEventSink (EventSink)       JsonConfigFile (ConfigPort) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  protocol · ControlContext · Reconciler · status       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the host the board is simulated and the process exits once stdin is
//! closed and drained, so scripted sessions terminate.
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use petcare::adapters::config_file::JsonConfigFile;
use petcare::adapters::serial::{LineReader, SerialEventSink};
use petcare::adapters::time::SoftRtc;
use petcare::app::ports::ConfigPort;
use petcare::app::service::AppService;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap + logging ───────────────────────
    #[cfg(feature = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(feature = "espidf"))]
    petcare::adapters::log_sink::init_host_logger(log::LevelFilter::Info).context("installing logger")?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PetCare v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let store = JsonConfigFile::new(std::env::args_os().nth(1).map(PathBuf::from));
    let config = store.load().context("loading configuration")?;
    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));

    // ── 3. Adapters ───────────────────────────────────────────
    #[cfg(feature = "espidf")]
    let mut hw = petcare::adapters::hardware::esp::board()?;
    #[cfg(not(feature = "espidf"))]
    let mut hw = petcare::adapters::sim::SimHardware::default();

    let mut clock = SoftRtc::default();
    let mut input = LineReader::stdin().context("starting serial reader")?;
    let mut sink = SerialEventSink::new(std::io::stdout());

    // ── 4. Application core ───────────────────────────────────
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut sink);
    info!("System ready. Entering tick loop.");

    // ── 5. Tick loop ──────────────────────────────────────────
    loop {
        let line = input.poll_line();
        app.tick(line.as_deref(), &mut hw, &mut clock, &mut sink);

        #[cfg(not(feature = "espidf"))]
        if line.is_none() && input.is_closed() {
            info!("Input closed after {} ticks, shutting down", app.tick_count());
            return Ok(());
        }

        std::thread::sleep(tick);
    }
}
