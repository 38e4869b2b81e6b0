// PCF8574 expander adapter.
//
// The HD44780 is wired in 4-bit mode behind a PCF8574 I2C GPIO expander. Every byte written to the
// expander sets all eight pins at once: the upper four carry a data nibble (D4-D7), the lower four
// carry RS, R/W, Enable and the backlight transistor. This module turns command and data bytes into
// the nibble-and-strobe sequence the controller latches on.

use bitfield::bitfield;
use embedded_hal::{delay::DelayNs, i2c};

use crate::CharacterDisplayError;

/// Minimum Enable high time. The controller needs more than 450ns.
pub const ENABLE_PULSE_US: u32 = 1;
/// Settle time after Enable drops. Most commands need more than 37us.
pub const COMMAND_SETTLE_US: u32 = 42;

// Pin layout of the common PCF8574T backpack
bitfield! {
    pub struct ExpanderPins(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub rw, set_rw: 1, 1;
    pub enable, set_enable: 2, 2;
    pub backlight, set_backlight: 3, 3;
    pub data, set_data: 7, 4;
}

impl Clone for ExpanderPins {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for ExpanderPins {}

impl ExpanderPins {
    /// Pins for one nibble transfer: data on D4-D7, register select per `mode`, Enable low.
    pub fn nibble(value: u8, mode: TransferMode) -> Self {
        let mut pins = ExpanderPins(0);
        pins.set_data(value & 0x0F);
        pins.set_rs(mode.rs());
        pins
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Backlight transistor state. It rides along on every expander write.
pub enum Backlight {
    On,
    Off,
}

impl Backlight {
    pub fn bits(&self) -> u8 {
        let mut pins = ExpanderPins(0);
        pins.set_backlight((*self == Backlight::On) as u8);
        pins.0
    }
}

impl From<bool> for Backlight {
    fn from(on: bool) -> Self {
        if on {
            Backlight::On
        } else {
            Backlight::Off
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Which controller register a byte transfer targets.
pub enum TransferMode {
    /// Instruction register, RS low
    Command,
    /// Data register (DDRAM or CGRAM), RS high
    Data,
}

impl TransferMode {
    const fn rs(&self) -> u8 {
        match self {
            TransferMode::Command => 0,
            TransferMode::Data => 1,
        }
    }
}

/// Owns the I2C bus, the expander address, the delay source and the backlight state. All pin
/// traffic to the display passes through `write`.
pub struct ExpanderBus<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    i2c: I2C,
    address: u8,
    delay: DELAY,
    backlight: Backlight,
}

impl<I2C, DELAY> ExpanderBus<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    pub fn new(i2c: I2C, address: u8, delay: DELAY) -> Self {
        Self {
            i2c,
            address,
            delay,
            backlight: Backlight::On,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn backlight(&self) -> Backlight {
        self.backlight
    }

    /// Change the backlight state. Nothing is written; the new state goes out with the next byte.
    pub fn set_backlight(&mut self, backlight: Backlight) {
        self.backlight = backlight;
    }

    pub fn delay(&mut self) -> &mut DELAY {
        &mut self.delay
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn release(self) -> (I2C, DELAY) {
        (self.i2c, self.delay)
    }

    /// Single I2C transmission of `pins`, with the current backlight bit OR'd in.
    pub fn write(&mut self, pins: ExpanderPins) -> Result<(), CharacterDisplayError<I2C>> {
        let data = [pins.0 | self.backlight.bits()];
        self.i2c
            .write(self.address, &data)
            .map_err(CharacterDisplayError::I2cError)?;
        Ok(())
    }

    /// Present `pins` on the bus then pulse Enable so the controller latches the nibble.
    pub fn strobe(&mut self, pins: ExpanderPins) -> Result<(), CharacterDisplayError<I2C>> {
        let mut pins = pins;
        pins.set_enable(0);
        self.write(pins)?;

        pins.set_enable(1);
        self.write(pins)?;
        self.delay.delay_us(ENABLE_PULSE_US);

        pins.set_enable(0);
        self.write(pins)?;
        self.delay.delay_us(COMMAND_SETTLE_US);
        Ok(())
    }

    /// Strobe only the low nibble of `value`. Used while the controller's interface width is unknown.
    pub fn write_nibble(
        &mut self,
        value: u8,
        mode: TransferMode,
    ) -> Result<(), CharacterDisplayError<I2C>> {
        self.strobe(ExpanderPins::nibble(value, mode))
    }

    /// Send a full byte as two nibbles, high nibble first.
    pub fn send(&mut self, value: u8, mode: TransferMode) -> Result<(), CharacterDisplayError<I2C>> {
        self.write_nibble(value >> 4, mode)?;
        self.write_nibble(value & 0x0F, mode)
    }
}
