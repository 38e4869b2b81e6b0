// Names from the LCD API 1.0 and older LiquidCrystal libraries, kept so existing sketches port
// over with few edits.

use embedded_hal::{delay::DelayNs, i2c};

use crate::{CharacterDisplayError, LiquidCrystalI2C};

/// Legacy aliases for the display API, plus the LCD API 1.0 functions this hardware can't
/// support. The unsupported ones do nothing and never touch the bus.
pub trait LcdApiCompat {
    type Error;

    fn display_on(&mut self) -> Result<&mut Self, Self::Error>;
    fn display_off(&mut self) -> Result<&mut Self, Self::Error>;
    fn cursor_on(&mut self) -> Result<&mut Self, Self::Error>;
    fn cursor_off(&mut self) -> Result<&mut Self, Self::Error>;
    fn blink_on(&mut self) -> Result<&mut Self, Self::Error>;
    fn blink_off(&mut self) -> Result<&mut Self, Self::Error>;
    fn load_custom_character(
        &mut self,
        char_num: u8,
        rows: &[u8; 8],
    ) -> Result<&mut Self, Self::Error>;
    /// Any non-zero value turns the backlight on.
    fn set_backlight(&mut self, new_val: u8) -> Result<&mut Self, Self::Error>;

    fn display(&mut self) -> Result<&mut Self, Self::Error> {
        self.display_on()
    }

    fn no_display(&mut self) -> Result<&mut Self, Self::Error> {
        self.display_off()
    }

    fn cursor(&mut self) -> Result<&mut Self, Self::Error> {
        self.cursor_on()
    }

    fn no_cursor(&mut self) -> Result<&mut Self, Self::Error> {
        self.cursor_off()
    }

    fn blink(&mut self) -> Result<&mut Self, Self::Error> {
        self.blink_on()
    }

    fn no_blink(&mut self) -> Result<&mut Self, Self::Error> {
        self.blink_off()
    }

    fn no_autoscroll(&mut self) -> Result<&mut Self, Self::Error>;

    fn no_backlight(&mut self) -> Result<&mut Self, Self::Error> {
        self.set_backlight(0)
    }

    //--------------------------------------------------------------------------------------------------
    // unsupported
    //--------------------------------------------------------------------------------------------------

    fn on(&mut self) -> &mut Self {
        unsupported("on");
        self
    }

    fn off(&mut self) -> &mut Self {
        unsupported("off");
        self
    }

    fn set_delay(&mut self, _cmd_delay: u32, _char_delay: u32) -> &mut Self {
        unsupported("set_delay");
        self
    }

    fn set_contrast(&mut self, _new_val: u8) -> &mut Self {
        unsupported("set_contrast");
        self
    }

    fn status(&mut self) -> u8 {
        unsupported("status");
        0
    }

    fn keypad(&mut self) -> u8 {
        unsupported("keypad");
        0
    }

    fn init_bargraph(&mut self, _graph_type: u8) -> u8 {
        unsupported("init_bargraph");
        0
    }

    fn draw_horizontal_graph(
        &mut self,
        _row: u8,
        _column: u8,
        _len: u8,
        _pixel_col_end: u8,
    ) -> &mut Self {
        unsupported("draw_horizontal_graph");
        self
    }

    fn draw_vertical_graph(
        &mut self,
        _row: u8,
        _column: u8,
        _len: u8,
        _pixel_row_end: u8,
    ) -> &mut Self {
        unsupported("draw_vertical_graph");
        self
    }
}

#[allow(unused_variables)]
fn unsupported(name: &'static str) {
    #[cfg(feature = "defmt")]
    defmt::warn!("{} is not supported on this display", name);
}

impl<I2C, DELAY> LcdApiCompat for LiquidCrystalI2C<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    type Error = CharacterDisplayError<I2C>;

    fn display_on(&mut self) -> Result<&mut Self, Self::Error> {
        self.show_display(true)
    }

    fn display_off(&mut self) -> Result<&mut Self, Self::Error> {
        self.show_display(false)
    }

    fn cursor_on(&mut self) -> Result<&mut Self, Self::Error> {
        self.show_cursor(true)
    }

    fn cursor_off(&mut self) -> Result<&mut Self, Self::Error> {
        self.show_cursor(false)
    }

    fn blink_on(&mut self) -> Result<&mut Self, Self::Error> {
        self.blink_cursor(true)
    }

    fn blink_off(&mut self) -> Result<&mut Self, Self::Error> {
        self.blink_cursor(false)
    }

    fn load_custom_character(
        &mut self,
        char_num: u8,
        rows: &[u8; 8],
    ) -> Result<&mut Self, Self::Error> {
        self.create_char(char_num, rows)
    }

    fn set_backlight(&mut self, new_val: u8) -> Result<&mut Self, Self::Error> {
        self.backlight(new_val != 0)
    }

    fn no_autoscroll(&mut self) -> Result<&mut Self, Self::Error> {
        self.autoscroll(false)
    }
}
