//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                    |
//! |---------------|--------------------|--------------------------------|
//! | `config_file` | ConfigPort         | JSON file on disk / SPIFFS     |
//! | `hardware`    | ActuatorPort       | embedded-hal pins + servo PWM  |
//! |               | SensorPort (esp)   | ESP32 ADC1 oneshot             |
//! | `log_sink`    | EventSink          | Diagnostic log                 |
//! | `serial`      | EventSink          | Status JSON lines on stdout    |
//! | `sim`         | all of the above   | In-memory board for host runs  |
//! | `time`        | ClockPort          | Monotonic timer + offset       |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod sim;
pub mod time;
