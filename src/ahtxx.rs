use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use crate::bus::Transport;
use crate::error::{AhtError, Status};
use crate::frame::{MAX_FRAME_SIZE, RawFrame, STATUS_BUSY, STATUS_CALIBRATED, Variant};

/// Factory address of every AHTxx part.
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// Address of an AHT1x with its AD0 pin tied high.
pub const ALTERNATE_ADDRESS: u8 = 0x39;

const STATUS_REG: u8 = 0x71;
const START_MEASUREMENT_REG: u8 = 0xAC;
const START_MEASUREMENT_CTRL: u8 = 0x33;
const START_MEASUREMENT_CTRL_NOP: u8 = 0x00;
const SOFT_RESET_REG: u8 = 0xBA;
const INIT_CTRL_CAL_ON: u8 = 0x08;
const INIT_CTRL_NOP: u8 = 0x00;

// Datasheet minimums, in milliseconds.
const POWER_ON_DELAY_MS: u32 = 100;
const CMD_DELAY_MS: u32 = 10;
const MEASUREMENT_DELAY_MS: u32 = 80;
const SOFT_RESET_DELAY_MS: u32 = 20;

/// Measurement mode written to the initialization register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// One measurement per trigger, then sleep.
    Normal,
    /// Continuous measurement.
    Cycle,
    Command,
}

impl Mode {
    const fn control(self) -> u8 {
        match self {
            Mode::Normal => 0x00,
            Mode::Cycle => 0x20,
            Mode::Command => 0x40,
        }
    }
}

/// Where a decoded value comes from.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Run a full measurement cycle first.
    Measure,
    /// Decode the stored frame without touching the bus.
    Stored,
}

/// Reading decoded from a single frame.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

/// Driver for the AHT1x/AHT2x temperature and humidity sensors.
pub struct Ahtxx<BUS, D> {
    bus: BUS,
    delay: D,
    address: u8,
    variant: Variant,
    frame: RawFrame,
    status: Status,
}

impl<BUS, DELAY, E> Ahtxx<BUS, DELAY>
where
    BUS: Transport<Error = E>,
    DELAY: DelayNs,
    E: Debug,
{
    /// Creates a new instance of the driver.
    ///
    /// No bus traffic happens until [`Ahtxx::initialize`] is called.
    ///
    /// # Arguments
    ///
    /// * `bus` - The bus the sensor is attached to, owned by the driver.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `address` - 7-bit bus address, usually [`DEFAULT_ADDRESS`].
    /// * `variant` - Sensor family fitted on the board.
    pub fn new(bus: BUS, delay: DELAY, address: u8, variant: Variant) -> Self {
        Ahtxx {
            bus,
            delay,
            address,
            variant,
            frame: RawFrame::empty(variant.frame_size()),
            status: Status::NoData,
        }
    }

    /// AHT10/AHT15 at the default address.
    pub fn new_aht1x(bus: BUS, delay: DELAY) -> Self {
        Self::new(bus, delay, DEFAULT_ADDRESS, Variant::Aht1x)
    }

    /// AHT20/AHT21/AHT25 at the default address.
    pub fn new_aht2x(bus: BUS, delay: DELAY) -> Self {
        Self::new(bus, delay, DEFAULT_ADDRESS, Variant::Aht2x)
    }

    /// Configures the bus and brings the sensor into normal mode.
    ///
    /// Waits the power-on delay, writes the normal mode and calibration
    /// controls, then checks the calibration bit of the status register.
    ///
    /// # Errors
    ///
    /// * `AhtError::Bus` if the sensor does not acknowledge.
    /// * `AhtError::NotCalibrated` if the calibration bit is clear.
    pub fn initialize(&mut self, clock_hz: u32) -> Result<(), AhtError<E>> {
        let result = self.power_up(clock_hz);
        self.finish_setup(result)
    }

    /// Restarts the sensor without a power cycle.
    ///
    /// All sensor registers return to their defaults, so the normal mode
    /// and calibration check of [`Ahtxx::initialize`] are repeated. The
    /// stored frame is no longer trusted afterwards.
    pub fn soft_reset(&mut self) -> Result<(), AhtError<E>> {
        let result = self.reset_sequence();
        self.finish_setup(result)
    }

    /// Writes the calibration control plus `mode` to the initialization register.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), AhtError<E>> {
        self.delay.delay_ms(CMD_DELAY_MS);
        let controls = [
            self.variant.init_register(),
            INIT_CTRL_CAL_ON | mode.control(),
            INIT_CTRL_NOP,
        ];
        self.bus.write(self.address, &controls).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("ahtxx: mode {} not acknowledged", mode);
            AhtError::Bus(e)
        })
    }

    pub fn set_normal_mode(&mut self) -> Result<(), AhtError<E>> {
        self.set_mode(Mode::Normal)
    }

    pub fn set_cycle_mode(&mut self) -> Result<(), AhtError<E>> {
        self.set_mode(Mode::Cycle)
    }

    pub fn set_command_mode(&mut self) -> Result<(), AhtError<E>> {
        self.set_mode(Mode::Command)
    }

    /// Reads the status register.
    ///
    /// Bit 7 is the busy flag, bit 3 the calibration flag. Under normal
    /// conditions the sensor reports `0x18`, or `0x98` while measuring.
    pub fn read_status_register(&mut self) -> Result<u8, AhtError<E>> {
        self.delay.delay_ms(CMD_DELAY_MS);
        self.bus.write(self.address, &[STATUS_REG])?;
        self.read_status_byte()
    }

    /// Reads the status register and tests the calibration bit.
    pub fn is_calibrated(&mut self) -> Result<bool, AhtError<E>> {
        Ok(self.read_status_register()? & STATUS_CALIBRATED != 0)
    }

    /// Runs a measurement cycle and decodes both values from the same frame.
    pub fn read(&mut self) -> Result<Reading, AhtError<E>> {
        self.measure()?;
        Ok(Reading {
            temperature: self.frame.temperature(),
            relative_humidity: self.frame.humidity(),
        })
    }

    /// Temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// With [`ReadMode::Measure`], any measurement error. With
    /// [`ReadMode::Stored`], `AhtError::NoValidData` unless the last
    /// measurement succeeded.
    pub fn read_temperature(&mut self, mode: ReadMode) -> Result<f32, AhtError<E>> {
        if mode == ReadMode::Measure {
            self.measure()?;
        }
        self.trusted_frame().map(RawFrame::temperature)
    }

    /// Relative humidity in percent.
    ///
    /// Not clamped: after long exposure above 80 % RH the sensor may drift
    /// slightly outside 0..100 %. Errors as for [`Ahtxx::read_temperature`].
    pub fn read_humidity(&mut self, mode: ReadMode) -> Result<f32, AhtError<E>> {
        if mode == ReadMode::Measure {
            self.measure()?;
        }
        self.trusted_frame().map(RawFrame::humidity)
    }

    /// Triggers a measurement, waits for it and reads and validates the frame.
    ///
    /// On success [`Ahtxx::status`] is `Status::Ok` and the new frame can
    /// be decoded with [`ReadMode::Stored`]. A frame of the wrong length is
    /// discarded and the previous frame kept.
    pub fn measure(&mut self) -> Result<(), AhtError<E>> {
        let result = self.measurement_cycle();
        self.status = match &result {
            Ok(()) => Status::Ok,
            Err(err) => Status::of(err),
        };
        result
    }

    /// Outcome of the last measurement, initialization or reset.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The last frame stored, trusted only while the status is `Status::Ok`.
    pub fn frame(&self) -> &RawFrame {
        &self.frame
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Changes the sensor family. The stored frame is dropped.
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.frame = RawFrame::empty(variant.frame_size());
        self.status = Status::NoData;
    }

    /// Returns the bus and delay provider.
    pub fn release(self) -> (BUS, DELAY) {
        (self.bus, self.delay)
    }

    fn power_up(&mut self, clock_hz: u32) -> Result<(), AhtError<E>> {
        self.bus.set_clock_rate(clock_hz)?;
        self.delay.delay_ms(POWER_ON_DELAY_MS);
        self.configure()
    }

    fn reset_sequence(&mut self) -> Result<(), AhtError<E>> {
        self.bus.write(self.address, &[SOFT_RESET_REG])?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        self.configure()
    }

    fn configure(&mut self) -> Result<(), AhtError<E>> {
        self.set_normal_mode()?;
        let status = self.read_status_register()?;
        if status & STATUS_CALIBRATED == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("ahtxx: calibration bit clear (status {=u8:#x})", status);
            return Err(AhtError::NotCalibrated { status });
        }
        Ok(())
    }

    fn finish_setup(&mut self, result: Result<(), AhtError<E>>) -> Result<(), AhtError<E>> {
        self.status = match &result {
            Ok(()) => Status::NoData,
            Err(err) => Status::of(err),
        };
        result
    }

    fn measurement_cycle(&mut self) -> Result<(), AhtError<E>> {
        self.trigger_measurement()?;
        self.wait_while_busy()?;
        self.read_frame()
    }

    fn trigger_measurement(&mut self) -> Result<(), AhtError<E>> {
        let command = [
            START_MEASUREMENT_REG,
            START_MEASUREMENT_CTRL,
            START_MEASUREMENT_CTRL_NOP,
        ];
        self.bus.write(self.address, &command).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("ahtxx: measurement trigger not acknowledged");
            AhtError::Bus(e)
        })
    }

    /// Checks the busy flag once, and if set waits out the rest of the
    /// measurement time. The frame is read afterwards either way.
    fn wait_while_busy(&mut self) -> Result<(), AhtError<E>> {
        self.delay.delay_ms(CMD_DELAY_MS);
        let status = self.read_status_byte()?;
        if status & STATUS_BUSY != 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("ahtxx: busy, waiting for measurement");
            self.delay.delay_ms(MEASUREMENT_DELAY_MS - CMD_DELAY_MS);
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<(), AhtError<E>> {
        let expected = self.variant.frame_size();
        let mut buffer = [0; MAX_FRAME_SIZE];
        let received = self.bus.read(self.address, &mut buffer[..expected])?;
        if received != expected {
            #[cfg(feature = "defmt")]
            defmt::warn!("ahtxx: expected {} bytes, received {}", expected, received);
            return Err(AhtError::DataLength { expected, received });
        }

        self.frame = RawFrame::from_slice(&buffer[..expected]);

        if self.frame.is_busy() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ahtxx: still busy after measurement delay");
            return Err(AhtError::Busy);
        }

        if self.variant.has_checksum() {
            self.frame.verify_checksum::<E>()?;
        }
        Ok(())
    }

    fn read_status_byte(&mut self) -> Result<u8, AhtError<E>> {
        let mut status = [0; 1];
        let received = self.bus.read(self.address, &mut status)?;
        if received != 1 {
            return Err(AhtError::DataLength {
                expected: 1,
                received,
            });
        }
        Ok(status[0])
    }

    fn trusted_frame(&self) -> Result<&RawFrame, AhtError<E>> {
        match self.status {
            Status::Ok => Ok(&self.frame),
            status => Err(AhtError::NoValidData(status)),
        }
    }
}
