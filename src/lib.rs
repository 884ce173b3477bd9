//! Driver for the TSL2561 and TSL4531 families of ambient light sensors.
//!
//! The sensors are accessed over any [`embedded_hal::i2c::I2c`] bus. A [`Tsl`] handle powers the
//! chip on, configures integration time and gain, and converts the raw channel counts into lux
//! using the vendor's formula for the chip package.
//!
//! ```rust,ignore
//! use tsl_light::{Tsl, variant};
//!
//! let mut sensor = Tsl::new(i2c, &variant::TSL2561_CS)?;
//! sensor.set_time(101)?;
//! let reading = sensor.read_lux()?;
//! println!("{reading}");
//! ```

pub mod codec;
pub mod device;
pub mod error;
pub mod lux;
pub mod register;
pub mod variant;

#[cfg(test)]
mod fake;

pub use codec::{Family, Gain, IntegrationTime};
pub use device::Tsl;
pub use error::Error;
pub use lux::{LuxFormula, Measurement};
pub use variant::{FormulaKind, Variant};
