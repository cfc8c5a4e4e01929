//! AHTxx Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Aosong AHT10, AHT15,
//! AHT20, AHT21, AHT25, AM2301B and AM2311B temperature and humidity sensors,
//! built on top of the [`embedded-hal`] traits.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - CRC-8 verification of AHT2x frames
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! The driver talks to the sensor through the [`Transport`] trait. [`I2cBus`]
//! implements it for any [`I2c`] bus; timing uses [`DelayNs`].
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs protocol failures
//!
//! # Example
//! ```ignore
//! let mut aht = Ahtxx::new_aht2x(I2cBus::new(i2c), delay);
//! aht.initialize(100_000)?;
//! let reading = aht.read()?;
//! let humidity = aht.read_humidity(ReadMode::Stored)?;
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod ahtxx;
pub mod bus;
pub mod checksum;
pub mod error;
pub mod frame;

pub use ahtxx::{ALTERNATE_ADDRESS, Ahtxx, DEFAULT_ADDRESS, Mode, ReadMode, Reading};
pub use bus::{I2cBus, Transport};
pub use error::{AhtError, Status};
pub use frame::{RawFrame, Variant};
