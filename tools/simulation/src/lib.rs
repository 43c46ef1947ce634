//! Simulation tooling for the matching engine
//!
//! Generates deterministic random command scripts for the console front
//! end. A fixed seed always produces the same script, which makes a
//! generated session reproducible end to end.

pub mod generator;

pub use generator::{generate_script, CommandGenerator, GeneratorConfig};
