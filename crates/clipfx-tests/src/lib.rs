//! Integration test crate for ClipFx.
//!
//! This crate exists solely to hold cross-crate integration tests: color
//! properties end to end, CPU/GPU parity and the async LUT path.

#[cfg(test)]
mod async_lut;

#[cfg(test)]
mod color_properties;

#[cfg(test)]
mod config;

#[cfg(test)]
mod parity;
