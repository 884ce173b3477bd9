use std::fmt;

/// Errors returned by the driver, generic over the bus error type.
#[derive(Debug)]
pub enum Error<E> {
    /// The bus transport failed. The underlying error is passed through untouched.
    I2c(E),
    /// Integration time (ms) not supported by the chip family
    InvalidTime {
        time: u16,
        supported: &'static [u16],
    },
    /// Gain value other than 1 or 16
    InvalidGain(u16),
    /// The chip family has no gain setting (TSL4531)
    GainUnsupported,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C transfer failed: {e:?}"),
            Error::InvalidTime { time, supported } => {
                write!(f, "Time {time} out of range {supported:?}")
            }
            Error::InvalidGain(gain) => write!(f, "Gain {gain} out of range [1, 16]"),
            Error::GainUnsupported => write!(f, "Sensor has no gain setting"),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e: Error<()> = Error::InvalidTime {
            time: 50,
            supported: &[14, 101, 402],
        };
        assert_eq!("Time 50 out of range [14, 101, 402]", e.to_string());

        let e: Error<()> = Error::InvalidGain(4);
        assert_eq!("Gain 4 out of range [1, 16]", e.to_string());
    }
}
