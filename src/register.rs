/// Register map shared by the TSL2561 and TSL4531 families.
///
/// Every register address goes out on the bus OR'd with [`COMMAND_BIT`].

pub const COMMAND_BIT: u8 = 0x80;

// Registers common to both families
pub const CONTROL: u8 = 0x00;
pub const CONFIG: u8 = 0x01;

// TSL2561 data registers (little endian words)
pub const CH0_LO: u8 = 0x0C;
pub const CH1_LO: u8 = 0x0E;

// TSL4531 data register (little endian word)
pub const DATA_LO: u8 = 0x04;

/// Values written to [`CONTROL`]
pub mod power {
    pub const ON: u8 = 0x03;
    pub const OFF: u8 = 0x00;
}

/// Bit-fields within [`CONFIG`]
pub mod mask {
    pub const TIME: u8 = 0x03;
    pub const GAIN: u8 = 0x10;
}
