/// In-memory register store standing in for a sensor on the bus.
///
/// The first byte of a write selects the register (command bit stripped), any further bytes are
/// stored to consecutive registers. Reads return consecutive registers from the selected one;
/// registers never written read as 0.
use std::collections::HashMap;
use std::convert::Infallible;

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::register::{self, COMMAND_BIT};

#[derive(Debug, Default)]
pub struct FakeBus {
    registers: HashMap<u8, u8>,
    pointer: u8,
    last_address: Option<SevenBitAddress>,
}

impl FakeBus {
    /// A TSL2561 with the given broadband and infrared counts
    pub fn with_channels(ch0: u16, ch1: u16) -> Self {
        let mut bus = FakeBus::default();
        bus.set_channels(ch0, ch1);
        bus
    }

    pub fn set_channels(&mut self, ch0: u16, ch1: u16) {
        self.set_word(register::CH0_LO, ch0);
        self.set_word(register::CH1_LO, ch1);
    }

    fn set_word(&mut self, register: u8, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.set_register(register, lo);
        self.set_register(register + 1, hi);
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers.insert(register, value);
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers.get(&register).copied().unwrap_or(0)
    }

    pub fn last_address(&self) -> Option<SevenBitAddress> {
        self.last_address
    }
}

impl ErrorType for FakeBus {
    type Error = Infallible;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.last_address = Some(address);
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&command, data)) = bytes.split_first() {
                        self.pointer = command & !COMMAND_BIT;
                        for (i, &b) in data.iter().enumerate() {
                            self.set_register(self.pointer.wrapping_add(i as u8), b);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = self.register(self.pointer.wrapping_add(i as u8));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut bus = FakeBus::default();
        bus.write(0x39, &[COMMAND_BIT | 0x01, 0x12]).unwrap();
        assert_eq!(0x12, bus.register(0x01));

        let mut buf = [0u8; 2];
        bus.write_read(0x39, &[COMMAND_BIT | 0x01], &mut buf).unwrap();
        assert_eq!([0x12, 0x00], buf);
        assert_eq!(Some(0x39), bus.last_address());
    }

    #[test]
    fn channel_words() {
        let mut bus = FakeBus::with_channels(0x0B5C, 0x02D7);
        let mut buf = [0u8; 4];
        bus.write_read(0x39, &[COMMAND_BIT | register::CH0_LO], &mut buf)
            .unwrap();
        assert_eq!([0x5C, 0x0B, 0xD7, 0x02], buf);
    }
}
