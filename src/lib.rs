//! Downloads the Met Office DataPoint hourly observations and serves them
//! as a flat tab-separated file.

#[macro_use]
extern crate log;

pub mod api;
pub mod config;
pub mod error;
pub mod providers;
pub mod retry;
pub mod timestep;
pub mod tsv;
