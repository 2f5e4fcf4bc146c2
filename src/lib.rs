//! Randomized conformance testbench for valid/ready/last stream interfaces.

pub mod config;
pub mod driver;
mod error;
pub mod junit;
pub mod models;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod signal;
pub mod sim_if;
pub mod testbench;
pub mod trace;
pub mod utils;

pub use error::{TbError, TbResult};
