/// A TSL2561 or TSL4531 sensor on an I2C bus, with convenience methods to configure it and
/// read light levels.
use std::fmt;

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::codec::{self, Family, Gain, IntegrationTime};
use crate::error::Error;
use crate::lux::Measurement;
use crate::register::{self, COMMAND_BIT, mask, power};
use crate::variant::{FormulaKind, Variant};

pub struct Tsl<I: I2c> {
    i2c: I,
    address: SevenBitAddress,
    variant: &'static Variant,

    // config values, kept in step with the CONFIG register by the setters
    time: IntegrationTime,
    /// `None` for the TSL4531 family
    gain: Option<Gain>,
    time_multiplier: f64,
    gain_multiplier: f64,

    /// Last valid lux value, `None` until one has been read
    last_lux: Option<f64>,
}

impl<I: I2c> Tsl<I> {
    /// Initialize a sensor at the model's default address, integration time and gain.
    pub fn new(i2c: I, variant: &'static Variant) -> Result<Self, Error<I::Error>> {
        Self::init(
            i2c,
            variant,
            variant.address,
            variant.default_time,
            variant.default_gain,
        )
    }

    /// Power on the sensor and apply the integration time, then the gain.
    ///
    /// `gain` is ignored for models without a gain setting.
    pub fn init(
        i2c: I,
        variant: &'static Variant,
        address: SevenBitAddress,
        time: u16,
        gain: Option<u16>,
    ) -> Result<Self, Error<I::Error>> {
        let family = variant.family();
        // validate before touching the bus
        let time = IntegrationTime::from_ms(family, time).ok_or(Error::InvalidTime {
            time,
            supported: family.supported_times(),
        })?;

        let mut tsl = Tsl {
            i2c,
            address,
            variant,
            time,
            gain: None,
            time_multiplier: time.multiplier(),
            gain_multiplier: 1.0,
            last_lux: None,
        };

        // devices are powered down after a power reset
        tsl.wake()?;
        tsl.apply_time(time)?;
        if family.has_gain() {
            tsl.set_gain(gain.unwrap_or(1))?;
        }

        Ok(tsl)
    }

    /// Give back the bus.
    pub fn release(self) -> I {
        self.i2c
    }

    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    pub fn family(&self) -> Family {
        self.variant.family()
    }

    pub fn wake(&mut self) -> Result<(), Error<I::Error>> {
        self.write8(register::CONTROL, power::ON)
    }

    /// Power down the sensor. Call [`Tsl::wake`] before reading again.
    pub fn sleep(&mut self) -> Result<(), Error<I::Error>> {
        self.write8(register::CONTROL, power::OFF)
    }

    /// Set the integration time in ms.
    pub fn set_time(&mut self, time: u16) -> Result<(), Error<I::Error>> {
        let family = self.family();
        let time = IntegrationTime::from_ms(family, time).ok_or(Error::InvalidTime {
            time,
            supported: family.supported_times(),
        })?;
        self.apply_time(time)
    }

    fn apply_time(&mut self, time: IntegrationTime) -> Result<(), Error<I::Error>> {
        let config = self.read8(register::CONFIG)?;
        self.write8(
            register::CONFIG,
            codec::update_field(config, mask::TIME, time.bits()),
        )?;

        self.time = time;
        self.time_multiplier = time.multiplier();
        Ok(())
    }

    /// Read the integration time back from the sensor.
    ///
    /// Returns `None` if the register holds a pattern this driver never writes.
    pub fn get_time(&mut self) -> Result<Option<IntegrationTime>, Error<I::Error>> {
        let config = self.read8(register::CONFIG)?;
        Ok(IntegrationTime::from_config(self.family(), config))
    }

    /// Set the gain: 1 or 16. Only the TSL2561 family has a gain setting.
    pub fn set_gain(&mut self, gain: u16) -> Result<(), Error<I::Error>> {
        if !self.family().has_gain() {
            return Err(Error::GainUnsupported);
        }
        let gain = Gain::from_value(gain).ok_or(Error::InvalidGain(gain))?;

        let config = self.read8(register::CONFIG)?;
        self.write8(
            register::CONFIG,
            codec::update_field(config, mask::GAIN, gain.bits()),
        )?;

        self.gain = Some(gain);
        self.gain_multiplier = gain.multiplier();
        Ok(())
    }

    /// Read the gain back from the sensor.
    pub fn get_gain(&mut self) -> Result<Gain, Error<I::Error>> {
        if !self.family().has_gain() {
            return Err(Error::GainUnsupported);
        }
        let config = self.read8(register::CONFIG)?;
        Ok(Gain::from_config(config))
    }

    /// Integration time as last configured through this handle
    pub fn time(&self) -> IntegrationTime {
        self.time
    }

    /// Gain as last configured through this handle
    pub fn gain(&self) -> Option<Gain> {
        self.gain
    }

    /// Combined factor applied to raw counts before the lux calculation
    pub fn scaling(&self) -> f64 {
        self.time_multiplier * self.gain_multiplier
    }

    /// Last valid lux value, unrounded. `None` if no valid reading has been taken yet.
    pub fn last_lux(&self) -> Option<f64> {
        self.last_lux
    }

    /// Read the raw broadband (ch0) and infrared (ch1) counts of a TSL2561.
    pub fn raw_channels(&mut self) -> Result<(u16, u16), Error<I::Error>> {
        let ch0 = self.read16(register::CH0_LO)?;
        let ch1 = self.read16(register::CH1_LO)?;
        Ok((ch0, ch1))
    }

    /// Read the raw data word of a TSL4531.
    pub fn raw_data(&mut self) -> Result<u16, Error<I::Error>> {
        self.read16(register::DATA_LO)
    }

    /// Read the current light level.
    ///
    /// When the TSL2561 reports no broadband light (ch0 == 0) the ratio formula is undefined; the
    /// last valid value is reported again with [`Measurement::stale`] set. Before any valid
    /// reading that value is 0.
    pub fn read_lux(&mut self) -> Result<Measurement, Error<I::Error>> {
        let lux = match self.variant.formula {
            FormulaKind::Ratio(formula) => {
                let (ch0, ch1) = self.raw_channels()?;
                let scaling = self.scaling();
                formula.calculate(scaling * ch0 as f64, scaling * ch1 as f64)
            }
            FormulaKind::Simple => {
                let data = self.raw_data()?;
                Some(self.time_multiplier * data as f64)
            }
        };

        if let Some(lux) = lux {
            self.last_lux = Some(lux);
        }
        Ok(Measurement::new(self.last_lux.unwrap_or(0.0), lux.is_none()))
    }

    fn read8(&mut self, register: u8) -> Result<u8, Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.read_bytes(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Little endian word starting at `register`
    fn read16(&mut self, register: u8) -> Result<u16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.read_bytes(register, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_bytes(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | register], buf)
            .map_err(Error::I2c)
    }

    fn write8(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.write_bytes(register, &[value])
    }

    fn write_bytes(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I::Error>> {
        let mut buf = Vec::with_capacity(1 + data.len());
        buf.push(COMMAND_BIT | register);
        buf.extend_from_slice(data);
        self.i2c.write(self.address, &buf).map_err(Error::I2c)
    }
}

impl<I: I2c> fmt::Display for Tsl<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}(slave={1:#04X})", self.variant.name, self.address)
    }
}
