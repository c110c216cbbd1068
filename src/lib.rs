#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod analog;
pub mod commands;
mod config;
pub mod constants;
mod driver;
pub mod emulator;
mod error;
pub mod status;

pub use config::Config;
pub use driver::Mcp4725;
#[cfg(feature = "async")]
pub use driver::async_i2c::Mcp4725Async;
pub use error::FrameError;
