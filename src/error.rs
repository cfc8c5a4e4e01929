use core::fmt::Debug;

/// Possible errors from the AHTxx driver.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AhtError<E>
where
    E: Debug,
{
    /// The transport failed, usually because the sensor did not acknowledge.
    #[error("bus error: {0:?}")]
    Bus(E),
    /// The sensor delivered a different number of bytes than requested.
    #[error("expected {expected} bytes, received {received}")]
    DataLength { expected: usize, received: usize },
    /// The sensor was still measuring after the measurement delay.
    #[error("sensor busy")]
    Busy,
    /// Checksum did not match the received data.
    #[error("crc mismatch: received {received:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { received: u8, computed: u8 },
    /// The status register does not report loaded calibration data.
    #[error("sensor not calibrated (status {status:#04x})")]
    NotCalibrated { status: u8 },
    /// The stored frame is not trusted, the status explains why.
    #[error("no valid measurement stored ({0:?})")]
    NoValidData(Status),
}

impl<E: Debug> From<E> for AhtError<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}

/// Outcome of the most recent bus operation.
///
/// Only [`Status::Ok`] means the stored frame may be decoded.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Last measurement was read and validated.
    Ok,
    /// No measurement has been taken since construction, initialization or reset.
    NoData,
    /// The busy flag was still set in the received frame.
    Busy,
    /// The sensor did not acknowledge a transfer.
    AckFailure,
    /// Fewer or more bytes arrived than the frame size demands.
    DataLengthMismatch,
    /// Computed CRC-8 does not match the received one.
    ChecksumMismatch,
    /// Calibration bit was clear after initialization or reset.
    NotCalibrated,
}

impl Status {
    /// Numeric status code as reported by the vendor libraries.
    ///
    /// `NoData` shares code 0 with `Ok`, `NotCalibrated` has no vendor
    /// equivalent and uses 5.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok | Status::NoData => 0x00,
            Status::Busy => 0x01,
            Status::AckFailure => 0x02,
            Status::DataLengthMismatch => 0x03,
            Status::ChecksumMismatch => 0x04,
            Status::NotCalibrated => 0x05,
        }
    }

    /// Status recorded for a failed operation.
    pub(crate) fn of<E: Debug>(error: &AhtError<E>) -> Self {
        match error {
            AhtError::Bus(_) => Status::AckFailure,
            AhtError::DataLength { .. } => Status::DataLengthMismatch,
            AhtError::Busy => Status::Busy,
            AhtError::ChecksumMismatch { .. } => Status::ChecksumMismatch,
            AhtError::NotCalibrated { .. } => Status::NotCalibrated,
            AhtError::NoValidData(status) => *status,
        }
    }
}
