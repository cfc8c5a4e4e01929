//! Raw measurement frame and value decoding.
//!
//! A frame is `{status, RH, RH, RH|T, T, T, CRC}`. Humidity and temperature
//! are 20-bit unsigned fields sharing the nibbles of byte 3; the trailing CRC
//! byte is only sent by the AHT2x family.

use core::fmt::Debug;

use crate::checksum::crc8;
use crate::error::AhtError;

/// Largest frame any supported sensor sends.
pub const MAX_FRAME_SIZE: usize = 7;

/// Status byte bit: measurement in progress.
pub const STATUS_BUSY: u8 = 0x80;

/// Status byte bit: calibration coefficients loaded.
pub const STATUS_CALIBRATED: u8 = 0x08;

/// Full scale of a 20-bit field, 2^20.
const FULL_SCALE: f32 = 1_048_576.0;

/// Sensor family, fixed by the part fitted on the board.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// AHT10, AHT15. Six byte frame, no checksum.
    Aht1x,
    /// AHT20, AHT21, AHT25, AM2301B, AM2311B. Seven byte frame with CRC-8.
    Aht2x,
}

impl Variant {
    /// Number of bytes in a measurement frame.
    pub const fn frame_size(self) -> usize {
        match self {
            Variant::Aht1x => 6,
            Variant::Aht2x => 7,
        }
    }

    /// Register that takes the mode and calibration controls.
    pub const fn init_register(self) -> u8 {
        match self {
            Variant::Aht1x => 0xE1,
            Variant::Aht2x => 0xBE,
        }
    }

    /// Whether the frame ends with a CRC-8 byte.
    pub const fn has_checksum(self) -> bool {
        matches!(self, Variant::Aht2x)
    }
}

/// The last frame read from the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl RawFrame {
    /// A zeroed frame of `len` bytes.
    pub(crate) const fn empty(len: usize) -> Self {
        RawFrame {
            bytes: [0; MAX_FRAME_SIZE],
            len,
        }
    }

    /// Builds a frame from exactly the bytes received, at most [`MAX_FRAME_SIZE`].
    pub(crate) fn from_slice(data: &[u8]) -> Self {
        let mut frame = Self::empty(data.len());
        frame.bytes[..data.len()].copy_from_slice(data);
        frame
    }

    /// The frame bytes in the order received.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Status byte (byte 0).
    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    pub fn is_busy(&self) -> bool {
        self.status() & STATUS_BUSY != 0
    }

    /// 20-bit humidity field: bytes 1 and 2, then the high nibble of byte 3.
    pub fn raw_humidity(&self) -> u32 {
        let [_, b1, b2, b3, ..] = self.bytes;
        (u32::from(b1) << 12) | (u32::from(b2) << 4) | (u32::from(b3) >> 4)
    }

    /// 20-bit temperature field: the low nibble of byte 3, then bytes 4 and 5.
    pub fn raw_temperature(&self) -> u32 {
        let [_, _, _, b3, b4, b5, ..] = self.bytes;
        (u32::from(b3 & 0x0F) << 16) | (u32::from(b4) << 8) | u32::from(b5)
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        humidity_from_raw(self.raw_humidity())
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f32 {
        temperature_from_raw(self.raw_temperature())
    }

    /// The trailing CRC byte, if this frame carries one.
    pub fn checksum(&self) -> Option<u8> {
        (self.len == MAX_FRAME_SIZE).then(|| self.bytes[MAX_FRAME_SIZE - 1])
    }

    /// Compares the CRC-8 of bytes 0..6 with byte 6.
    ///
    /// Frames without a checksum byte always pass.
    pub fn verify_checksum<E: Debug>(&self) -> Result<(), AhtError<E>> {
        let Some(received) = self.checksum() else {
            return Ok(());
        };
        let computed = crc8(&self.bytes[..MAX_FRAME_SIZE - 1]);
        if computed == received {
            Ok(())
        } else {
            Err(AhtError::ChecksumMismatch { received, computed })
        }
    }
}

/// Converts a 20-bit humidity field to relative humidity in percent.
///
/// The sensor may report slightly outside 0..100 % after long exposure to
/// high humidity, the value is not clamped.
pub fn humidity_from_raw(raw: u32) -> f32 {
    raw as f32 / FULL_SCALE * 100.0
}

/// Converts a 20-bit temperature field to degrees Celsius.
pub fn temperature_from_raw(raw: u32) -> f32 {
    raw as f32 / FULL_SCALE * 200.0 - 50.0
}
