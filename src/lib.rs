//! Smart garden controller and dashboard library.
//!
//! Exposes the pure-logic modules and the adapters used by the two
//! binaries (`garden-controller`, `garden-dashboard`) so integration tests
//! can drive the same code paths with mock ports.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fsm;
pub mod handoff;
pub mod telemetry;
