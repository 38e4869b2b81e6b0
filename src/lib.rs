//! This Rust `embedded-hal`-based library drives a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display through a PCF8574 I2C GPIO expander in an embedded, `no_std` environment. These
//! "I2C backpacks" are ubiquitous on eBay and AliExpress and are often soldered directly onto 16x2 and 20x4 displays.
//! The expander's upper four pins drive the display's D4-D7 data lines and the lower four drive RS, R/W, Enable and the
//! backlight transistor, so the controller is always operated through its 4-bit interface.
//!
//! Key features include:
//! - Convenient high-level API for controlling the display
//! - Support for custom characters
//! - Backlight control
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - `embedded_io::Write` implementation for byte streams
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! i2c-liquid-crystal = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which logs the initialization sequence
//! and allows the library's errors to be used with the `defmt` logging framework. Another optional feature is
//! `features = ["ufmt"]`, which allows the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Create the display:
//! ```rust
//! use i2c_liquid_crystal::{LiquidCrystalI2C, LcdDisplayType};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral
//! let delay = ...; // DelayNs implementation
//!
//! // 16 columns, 2 rows at address 0x27
//! let mut lcd = LiquidCrystalI2C::new(i2c, 0x27, 16, 2, delay);
//! // or from one of the common display sizes, using the default 0x27 address
//! let mut lcd = LiquidCrystalI2C::with_display_type(i2c, LcdDisplayType::Lcd20x4, delay);
//! ```
//! Initialize the display:
//! ```rust
//! if let Err(e) = lcd.init() {
//!    panic!("Error initializing LCD: {}", e);
//! }
//! ```
//! Use the display:
//! ```rust
//! lcd.backlight(true)?.clear()?.home()?;
//! lcd.print("Hello, world!")?;
//! // can also use the `core::fmt::write!` macro
//! use core::fmt::Write;
//!
//! write!(lcd, "Hello, world!")?;
//! ```
//!
//! Each method returns a `Result` that wraps the display object in `Ok()`, allowing for easy chaining of commands.
//!
//! ### Write-only registers
//! The R/W line of the expander is never raised, so the driver cannot read the controller back. It keeps a mirror of the
//! function set, display control and entry mode registers and re-sends the whole register whenever one setting changes.
//! Out of range rows are clamped to the last row and custom character slots wrap modulo 8; neither produces an error.
//!
//! ### Legacy API
//! Names from older LiquidCrystal style libraries (`cursor_on`, `blink_off`, `set_backlight`, ...) and a handful of
//! functions that have no effect on this hardware (`set_contrast`, `keypad`, ...) are available through the
//! [`LcdApiCompat`] trait.
//!
#![no_std]
#![allow(non_upper_case_globals)]
use core::fmt::{Debug, Display};

use embedded_hal::{delay::DelayNs, i2c};

pub mod adapter;
mod compat;
pub mod geometry;
mod init;
pub mod registers;
#[cfg(test)]
mod test_support;

use adapter::{ExpanderBus, ExpanderPins};
pub use adapter::{Backlight, TransferMode};
pub use compat::LcdApiCompat;
pub use geometry::{DisplayGeometry, DotFormat, LcdDisplayType, RowOffsets};
pub use init::InitState;
use registers::{
    cgram_command, ddram_command, scroll_command, DisplayControl, EntryMode, ShiftDirection,
    LCD_CMD_CLEARDISPLAY, LCD_CMD_RETURNHOME,
};
pub use registers::{ControllerRegisters, TextDirection};

/// Default address of PCF8574T based adapters. PCF8574AT variants usually sit at 0x3F.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x27;

/// Time the clear and return home commands need to complete.
const CLEAR_HOME_DELAY_US: u32 = 2000;

/// Errors that can occur when using the display
pub enum CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    /// I2C error returned from the underlying I2C implementation
    I2cError(I2C::Error),
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<I2C> From<core::fmt::Error> for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<I2C> From<&CharacterDisplayError<I2C>> for &'static str
where
    I2C: i2c::I2c,
{
    fn from(err: &CharacterDisplayError<I2C>) -> Self {
        match err {
            CharacterDisplayError::I2cError(_) => "I2C error",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

impl<I2C> Debug for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CharacterDisplayError::I2cError(e) => f.debug_tuple("I2cError").field(e).finish(),
            CharacterDisplayError::FormattingError(e) => {
                f.debug_tuple("FormattingError").field(e).finish()
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<I2C> defmt::Format for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl<I2C> ufmt::uDisplay for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<I2C> Display for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

impl<I2C> embedded_io::Error for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// HD44780 character display behind a PCF8574 I2C expander.
pub struct LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    bus: ExpanderBus<I2C, DELAY>,
    geometry: DisplayGeometry,
    row_offsets: RowOffsets,
    registers: ControllerRegisters,
    oled: bool,
}

impl<I2C, DELAY> LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    /// Create a new display object with the 5x8 font. Nothing is sent until `init` is called.
    pub fn new(i2c: I2C, address: u8, columns: u8, rows: u8, delay: DELAY) -> Self {
        Self::new_with_geometry(i2c, address, DisplayGeometry::new(columns, rows), delay)
    }

    /// Create a new display object with an explicit geometry, including the dot format.
    pub fn new_with_geometry(
        i2c: I2C,
        address: u8,
        geometry: DisplayGeometry,
        delay: DELAY,
    ) -> Self {
        Self {
            bus: ExpanderBus::new(i2c, address, delay),
            geometry,
            row_offsets: geometry.row_offsets(),
            registers: ControllerRegisters::for_geometry(&geometry),
            oled: false,
        }
    }

    /// Create a new display object for a common display size at the default I2C address.
    pub fn with_display_type(i2c: I2C, display_type: LcdDisplayType, delay: DELAY) -> Self {
        Self::new_with_geometry(i2c, DEFAULT_I2C_ADDRESS, display_type.into(), delay)
    }

    /// Mark the display as an OLED module. Some OLED controllers don't move the cursor home on
    /// clear, so `clear` repositions it explicitly. Takes effect for all later calls, including `init`.
    pub fn set_oled(&mut self, oled: bool) -> &mut Self {
        self.oled = oled;
        self
    }

    /// Flag the display as an OLED module and initialize it.
    pub fn oled_init(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.oled = true;
        self.init()
    }

    /// Replace the geometry and run the full initialization sequence again.
    pub fn begin(
        &mut self,
        geometry: DisplayGeometry,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.geometry = geometry;
        self.init()
    }

    /// Returns the geometry used for the display
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Returns the row base addresses used by `set_cursor`
    pub fn row_offsets(&self) -> RowOffsets {
        self.row_offsets
    }

    /// Returns the last register values sent to the controller
    pub fn registers(&self) -> ControllerRegisters {
        self.registers
    }

    /// Returns the backlight state sent with every expander write
    pub fn backlight_state(&self) -> Backlight {
        self.bus.backlight()
    }

    /// Returns true if `clear` repositions the cursor for an OLED module
    pub fn is_oled(&self) -> bool {
        self.oled
    }

    /// Returns the I2C address of the expander
    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Consume the display and hand back the I2C bus and delay.
    pub fn release(self) -> (I2C, DELAY) {
        self.bus.release()
    }

    /// returns a reference to the I2C peripheral. mostly needed for testing
    #[cfg(test)]
    fn i2c(&mut self) -> &mut I2C {
        self.bus.i2c()
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Clear the display and move the cursor home.
    pub fn clear(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.command(LCD_CMD_CLEARDISPLAY)?;
        self.bus.delay().delay_us(CLEAR_HOME_DELAY_US);
        if self.oled {
            self.set_cursor(0, 0)?;
        }
        Ok(self)
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.command(LCD_CMD_RETURNHOME)?;
        self.bus.delay().delay_us(CLEAR_HOME_DELAY_US);
        Ok(self)
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    /// Rows past the end of the display are clamped to the last row. Columns are not checked.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        let row = row.min(self.geometry.last_row());
        let address = self.row_offsets.address(col, row);
        self.command(ddram_command(address))?;
        Ok(self)
    }

    /// Override the DDRAM base address of each row. `init` restores the defaults for the geometry.
    pub fn set_row_offsets(&mut self, row0: u8, row1: u8, row2: u8, row3: u8) -> &mut Self {
        self.row_offsets = RowOffsets([row0, row1, row2, row3]);
        self
    }

    /// Set the display visibility.
    pub fn show_display(
        &mut self,
        show_display: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_display_control(|control| control.display = show_display)
    }

    /// Set the cursor visibility.
    pub fn show_cursor(
        &mut self,
        show_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_display_control(|control| control.cursor = show_cursor)
    }

    /// Set the cursor blinking.
    pub fn blink_cursor(
        &mut self,
        blink_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_display_control(|control| control.blink = blink_cursor)
    }

    /// Scroll the display to the left without changing DDRAM.
    pub fn scroll_display_left(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.command(scroll_command(ShiftDirection::Left))?;
        Ok(self)
    }

    /// Scroll the display to the right without changing DDRAM.
    pub fn scroll_display_right(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.command(scroll_command(ShiftDirection::Right))?;
        Ok(self)
    }

    /// Set the text flow direction to left to right.
    pub fn left_to_right(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_entry_mode(|mode| mode.direction = TextDirection::LeftToRight)
    }

    /// Set the text flow direction to right to left.
    pub fn right_to_left(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_entry_mode(|mode| mode.direction = TextDirection::RightToLeft)
    }

    /// Set the auto scroll mode. When on, text is 'right justified' from the cursor.
    pub fn autoscroll(
        &mut self,
        autoscroll: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.update_entry_mode(|mode| mode.autoscroll = autoscroll)
    }

    /// Create a new custom character in one of the 8 CGRAM slots. Locations above 7 wrap.
    pub fn create_char(
        &mut self,
        location: u8,
        charmap: &[u8; 8],
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.create_char_from(location, charmap.iter().copied())
    }

    /// Create a new custom character from any byte source, such as a glyph streamed out of flash.
    /// Exactly 8 rows are written: extra rows are ignored and missing rows are blank.
    pub fn create_char_from<T>(
        &mut self,
        location: u8,
        charmap: T,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>>
    where
        T: IntoIterator<Item = u8>,
    {
        self.command(cgram_command(location))?;
        for row in charmap.into_iter().chain(core::iter::repeat(0)).take(8) {
            self.write_byte(row)?;
        }
        Ok(self)
    }

    /// Prints a string to the LCD at the current cursor position.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        for byte in text.bytes() {
            self.write_byte(byte)?;
        }
        Ok(self)
    }

    /// Turn the backlight on or off. An empty expander write puts the new state on the bus immediately.
    pub fn backlight(&mut self, on: bool) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.bus.set_backlight(Backlight::from(on));
        self.bus.write(ExpanderPins(0))?;
        Ok(self)
    }

    //--------------------------------------------------------------------------------------------------
    // mid level commands, for sending command or data
    //--------------------------------------------------------------------------------------------------

    /// Send a raw instruction byte to the controller.
    pub fn command(&mut self, value: u8) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.bus.send(value, TransferMode::Command)?;
        Ok(self)
    }

    /// Send a raw data byte to DDRAM or CGRAM, depending on the last address command. Returns
    /// the number of bytes written, which is always 1.
    pub fn write_byte(&mut self, value: u8) -> Result<usize, CharacterDisplayError<I2C>> {
        self.bus.send(value, TransferMode::Data)?;
        Ok(1)
    }

    fn update_display_control<F>(&mut self, f: F) -> Result<&mut Self, CharacterDisplayError<I2C>>
    where
        F: FnOnce(&mut DisplayControl),
    {
        let mut control = self.registers.control;
        f(&mut control);
        #[cfg(feature = "defmt")]
        defmt::trace!("display control -> {=u8:#x}", control.command());
        self.command(control.command())?;
        self.registers.control = control;
        Ok(self)
    }

    fn update_entry_mode<F>(&mut self, f: F) -> Result<&mut Self, CharacterDisplayError<I2C>>
    where
        F: FnOnce(&mut EntryMode),
    {
        let mut mode = self.registers.entry_mode;
        f(&mut mode);
        #[cfg(feature = "defmt")]
        defmt::trace!("entry mode -> {=u8:#x}", mode.command());
        self.command(mode.command())?;
        self.registers.entry_mode = mode;
        Ok(self)
    }
}

/// Implement the `core::fmt::Write` trait for the display, allowing it to be used with the `write!` macro.
impl<I2C, DELAY> core::fmt::Write for LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the display, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<I2C, DELAY> ufmt::uWrite for LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<I2C>> {
        self.print(s)?;
        Ok(())
    }

    type Error = CharacterDisplayError<I2C>;
}

impl<I2C, DELAY> embedded_io::ErrorType for LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    type Error = CharacterDisplayError<I2C>;
}

/// Byte stream output. Every byte is sent to the data register at the current address.
impl<I2C, DELAY> embedded_io::Write for LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        for byte in buf {
            written += self.write_byte(*byte)?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
