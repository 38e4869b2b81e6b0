use embedded_hal::{delay::DelayNs, i2c};

use crate::{
    adapter::{ExpanderPins, TransferMode},
    registers::{
        DisplayControl, EntryMode, FunctionSet, LCD_NIBBLE_4BIT_REQUEST, LCD_NIBBLE_8BIT_REQUEST,
    },
    CharacterDisplayError, LiquidCrystalI2C,
};

/// Wait for the supply to rise past 2.7V before the first command.
const POWER_ON_DELAY_MS: u32 = 50;
/// Hold time after pulling all expander pins low.
const EXPANDER_RESET_DELAY_MS: u32 = 500;
const FIRST_MODE_REQUEST_DELAY_US: u32 = 4200;
const SECOND_MODE_REQUEST_DELAY_US: u32 = 110;
/// Number of 8-bit mode requests in the reset handshake.
const MODE_REQUESTS: u8 = 3;

/// Steps of the power-on handshake. The controller may come up in 8-bit mode or halfway through a
/// 4-bit transfer, so it is first forced into a known 8-bit state and then switched to 4-bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InitState {
    PoweredUnknown,
    ExpanderReset,
    /// Attempt number, starting at 1
    ModeRequested(u8),
    FourBitLocked,
    FunctionSet,
    DisplayOn,
    Cleared,
    EntryModeSet,
    Homed,
    Ready,
}

impl InitState {
    pub const fn next(self) -> Self {
        match self {
            InitState::PoweredUnknown => InitState::ExpanderReset,
            InitState::ExpanderReset => InitState::ModeRequested(1),
            InitState::ModeRequested(attempt) if attempt < MODE_REQUESTS => {
                InitState::ModeRequested(attempt + 1)
            }
            InitState::ModeRequested(_) => InitState::FourBitLocked,
            InitState::FourBitLocked => InitState::FunctionSet,
            InitState::FunctionSet => InitState::DisplayOn,
            InitState::DisplayOn => InitState::Cleared,
            InitState::Cleared => InitState::EntryModeSet,
            InitState::EntryModeSet => InitState::Homed,
            InitState::Homed => InitState::Ready,
            InitState::Ready => InitState::Ready,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InitState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            InitState::PoweredUnknown => defmt::write!(fmt, "PoweredUnknown"),
            InitState::ExpanderReset => defmt::write!(fmt, "ExpanderReset"),
            InitState::ModeRequested(attempt) => defmt::write!(fmt, "ModeRequested({})", attempt),
            InitState::FourBitLocked => defmt::write!(fmt, "FourBitLocked"),
            InitState::FunctionSet => defmt::write!(fmt, "FunctionSet"),
            InitState::DisplayOn => defmt::write!(fmt, "DisplayOn"),
            InitState::Cleared => defmt::write!(fmt, "Cleared"),
            InitState::EntryModeSet => defmt::write!(fmt, "EntryModeSet"),
            InitState::Homed => defmt::write!(fmt, "Homed"),
            InitState::Ready => defmt::write!(fmt, "Ready"),
        }
    }
}

impl<I2C, DELAY> LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    /// Run the power-on handshake and bring the display to a known state: display on, cursor
    /// hidden, text left to right, cleared, cursor home. The backlight state is kept. Safe to call
    /// again at any time to recover a display that has lost sync.
    pub fn init(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        // the register mirror is only updated as each register goes out
        self.row_offsets = self.geometry.row_offsets();

        let mut state = InitState::PoweredUnknown;
        while state != InitState::Ready {
            self.run_init_state(state)?;
            state = state.next();
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("init: {}", state);
        Ok(self)
    }

    fn run_init_state(&mut self, state: InitState) -> Result<(), CharacterDisplayError<I2C>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("init: {}", state);
        match state {
            InitState::PoweredUnknown => {
                self.bus.delay().delay_ms(POWER_ON_DELAY_MS);
            }
            InitState::ExpanderReset => {
                // all pins low except the backlight
                self.bus.write(ExpanderPins(0))?;
                self.bus.delay().delay_ms(EXPANDER_RESET_DELAY_MS);
            }
            InitState::ModeRequested(attempt) => {
                self.bus
                    .write_nibble(LCD_NIBBLE_8BIT_REQUEST, TransferMode::Command)?;
                match attempt {
                    1 => self.bus.delay().delay_us(FIRST_MODE_REQUEST_DELAY_US),
                    2 => self.bus.delay().delay_us(SECOND_MODE_REQUEST_DELAY_US),
                    _ => {}
                }
            }
            InitState::FourBitLocked => {
                self.bus
                    .write_nibble(LCD_NIBBLE_4BIT_REQUEST, TransferMode::Command)?;
            }
            InitState::FunctionSet => {
                let function = FunctionSet::for_geometry(&self.geometry);
                self.command(function.command())?;
                self.registers.function = function;
            }
            InitState::DisplayOn => {
                let control = DisplayControl::display_on();
                self.command(control.command())?;
                self.registers.control = control;
            }
            InitState::Cleared => {
                self.clear()?;
            }
            InitState::EntryModeSet => {
                let mode = EntryMode::default();
                self.command(mode.command())?;
                self.registers.entry_mode = mode;
            }
            InitState::Homed => {
                self.home()?;
            }
            InitState::Ready => {}
        }
        Ok(())
    }
}
