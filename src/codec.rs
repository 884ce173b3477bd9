/// Encoding of integration time and gain into the CONFIG register bit-fields, and the
/// multipliers the lux calculation uses to scale raw counts back to the reference setting
/// (402ms / 400ms integration, 16x gain).
use crate::register::mask;

/// Chip family, which decides the supported integration times and whether gain exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Tsl2561,
    Tsl4531,
}

impl Family {
    /// Supported integration times in ms
    pub const fn supported_times(self) -> &'static [u16] {
        match self {
            Family::Tsl2561 => &[14, 101, 402],
            Family::Tsl4531 => &[100, 200, 400],
        }
    }

    pub const fn integration_times(self) -> &'static [IntegrationTime] {
        match self {
            Family::Tsl2561 => &[
                IntegrationTime::Ms14,
                IntegrationTime::Ms101,
                IntegrationTime::Ms402,
            ],
            Family::Tsl4531 => &[
                IntegrationTime::Ms100,
                IntegrationTime::Ms200,
                IntegrationTime::Ms400,
            ],
        }
    }

    pub const fn has_gain(self) -> bool {
        matches!(self, Family::Tsl2561)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    // TSL2561
    Ms14,
    Ms101,
    Ms402,
    // TSL4531
    Ms100,
    Ms200,
    Ms400,
}

impl IntegrationTime {
    pub const fn family(self) -> Family {
        match self {
            IntegrationTime::Ms14 | IntegrationTime::Ms101 | IntegrationTime::Ms402 => {
                Family::Tsl2561
            }
            IntegrationTime::Ms100 | IntegrationTime::Ms200 | IntegrationTime::Ms400 => {
                Family::Tsl4531
            }
        }
    }

    pub const fn ms(self) -> u16 {
        match self {
            IntegrationTime::Ms14 => 14,
            IntegrationTime::Ms101 => 101,
            IntegrationTime::Ms402 => 402,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms400 => 400,
        }
    }

    /// Field value within the CONFIG register (low two bits)
    pub const fn bits(self) -> u8 {
        match self {
            IntegrationTime::Ms14 => 0x00,
            IntegrationTime::Ms101 => 0x01,
            IntegrationTime::Ms402 => 0x02,
            IntegrationTime::Ms400 => 0x00,
            IntegrationTime::Ms200 => 0x01,
            IntegrationTime::Ms100 => 0x02,
        }
    }

    /// Factor applied to raw counts so shorter integrations read on the same scale as the
    /// longest one.
    pub fn multiplier(self) -> f64 {
        match self {
            IntegrationTime::Ms402 => 1.0,
            IntegrationTime::Ms101 => 322.0 / 81.0,
            IntegrationTime::Ms14 => 322.0 / 11.0,
            IntegrationTime::Ms400 => 1.0,
            IntegrationTime::Ms200 => 2.0,
            IntegrationTime::Ms100 => 4.0,
        }
    }

    pub fn from_ms(family: Family, ms: u16) -> Option<Self> {
        family
            .integration_times()
            .iter()
            .copied()
            .find(|t| t.ms() == ms)
    }

    /// Decode the time field of a CONFIG register value.
    ///
    /// Returns `None` for a bit pattern that does not correspond to any time of the family,
    /// e.g. if something else wrote the register.
    pub fn from_config(family: Family, config: u8) -> Option<Self> {
        let bits = config & mask::TIME;
        family
            .integration_times()
            .iter()
            .copied()
            .find(|t| t.bits() == bits)
    }
}

/// TSL2561 gain. At 1x the device is 16 times less sensitive, so readings get scaled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    X1,
    X16,
}

impl Gain {
    pub const fn from_value(gain: u16) -> Option<Self> {
        match gain {
            1 => Some(Gain::X1),
            16 => Some(Gain::X16),
            _ => None,
        }
    }

    pub const fn value(self) -> u16 {
        match self {
            Gain::X1 => 1,
            Gain::X16 => 16,
        }
    }

    /// Field value within the CONFIG register (bit 4)
    pub const fn bits(self) -> u8 {
        match self {
            Gain::X1 => 0x00,
            Gain::X16 => 0x10,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Gain::X1 => 16.0,
            Gain::X16 => 1.0,
        }
    }

    /// The gain field is a single bit, so every register value decodes.
    pub const fn from_config(config: u8) -> Self {
        if config & mask::GAIN != 0 {
            Gain::X16
        } else {
            Gain::X1
        }
    }
}

/// Replace the bits selected by `mask` in `current` with `bits`, leaving everything else alone.
pub const fn update_field(current: u8, mask: u8, bits: u8) -> u8 {
    (current & !mask) | (bits & mask)
}
