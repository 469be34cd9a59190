//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the controller's rules together: instruction
//! handling, schedule reconciliation, and status reporting.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
