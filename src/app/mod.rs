//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for both processes: the
//! classification-driven actuation service (controller) and the
//! drain-then-render service with manual override (dashboard).
//! All interaction with the broker, model file, and terminal happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without a network.

pub mod commands;
pub mod dashboard;
pub mod events;
pub mod ports;
pub mod service;
