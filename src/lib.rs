//! PetCare controller library.
//!
//! Exposes the domain and adapter modules for the binary, integration
//! tests, and fuzz targets.  ESP-IDF code is gated behind the `espidf`
//! feature inside each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod protocol;
pub mod reservoir;
pub mod schedule;
pub mod sensors;
pub mod status;
pub mod time;
