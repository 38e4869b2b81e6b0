// HD44780 instruction set and the in-memory mirror of the write-only controller registers.
//
// The controller offers no read-back on this adapter, so every toggle is applied to the mirror
// first and then the owning register's full command byte is sent again.

use crate::geometry::{DisplayGeometry, DotFormat};

// commands
pub const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
pub const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
pub const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
pub const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
pub const LCD_CMD_CURSORSHIFT: u8 = 0x10; //  Lets you move the cursor
pub const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display
pub const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Used to set the CGRAM (character generator RAM) with characters
pub const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM)

// flags for display entry mode
const LCD_FLAG_ENTRYLEFT: u8 = 0x02; //  Used to set text to flow from left to right
const LCD_FLAG_ENTRYSHIFTINCREMENT: u8 = 0x01; //  Used to 'right justify' text from the cursor

// flags for display on/off control
const LCD_FLAG_DISPLAYON: u8 = 0x04; //  Turns the display on
const LCD_FLAG_CURSORON: u8 = 0x02; //  Turns the cursor on
const LCD_FLAG_BLINKON: u8 = 0x01; //  Turns on the blinking cursor

// flags for display/cursor shift
pub const LCD_FLAG_DISPLAYMOVE: u8 = 0x08; //  Flag for moving the display
pub const LCD_FLAG_MOVERIGHT: u8 = 0x04; //  Flag for moving right
pub const LCD_FLAG_MOVELEFT: u8 = 0x00; //  Flag for moving left

// flags for function set
const LCD_FLAG_8BITMODE: u8 = 0x10; //  LCD 8 bit mode
const LCD_FLAG_2LINE: u8 = 0x08; //  LCD 2 line mode
const LCD_FLAG_5x10_DOTS: u8 = 0x04; //  10 pixel high font mode

/// Nibble sent three times during the reset handshake to request 8-bit mode.
pub const LCD_NIBBLE_8BIT_REQUEST: u8 = (LCD_CMD_FUNCTIONSET | LCD_FLAG_8BITMODE) >> 4;
/// Nibble that switches the controller into the 4-bit interface.
pub const LCD_NIBBLE_4BIT_REQUEST: u8 = LCD_CMD_FUNCTIONSET >> 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterfaceWidth {
    FourBit,
    EightBit,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineCount {
    One,
    Two,
}

/// Function set register: interface width, line count and font.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FunctionSet {
    pub interface: InterfaceWidth,
    pub lines: LineCount,
    pub font: DotFormat,
}

impl FunctionSet {
    /// The 4-bit function set implied by a display geometry.
    pub fn for_geometry(geometry: &DisplayGeometry) -> Self {
        Self {
            interface: InterfaceWidth::FourBit,
            lines: if geometry.is_multi_line() {
                LineCount::Two
            } else {
                LineCount::One
            },
            font: geometry.effective_dots(),
        }
    }

    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if let InterfaceWidth::EightBit = self.interface {
            bits |= LCD_FLAG_8BITMODE;
        }
        if let LineCount::Two = self.lines {
            bits |= LCD_FLAG_2LINE;
        }
        if let DotFormat::Dots5x10 = self.font {
            bits |= LCD_FLAG_5x10_DOTS;
        }
        bits
    }

    pub const fn command(&self) -> u8 {
        LCD_CMD_FUNCTIONSET | self.bits()
    }
}

/// Display on/off control register.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct DisplayControl {
    pub display: bool,
    pub cursor: bool,
    pub blink: bool,
}

impl DisplayControl {
    /// Display on with the cursor hidden and not blinking.
    pub const fn display_on() -> Self {
        Self {
            display: true,
            cursor: false,
            blink: false,
        }
    }

    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.display {
            bits |= LCD_FLAG_DISPLAYON;
        }
        if self.cursor {
            bits |= LCD_FLAG_CURSORON;
        }
        if self.blink {
            bits |= LCD_FLAG_BLINKON;
        }
        bits
    }

    pub const fn command(&self) -> u8 {
        LCD_CMD_DISPLAYCONTROL | self.bits()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

/// Entry mode register: cursor direction and display shift.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EntryMode {
    pub direction: TextDirection,
    pub autoscroll: bool,
}

impl Default for EntryMode {
    /// Left to right text with no display shift.
    fn default() -> Self {
        Self {
            direction: TextDirection::LeftToRight,
            autoscroll: false,
        }
    }
}

impl EntryMode {
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if let TextDirection::LeftToRight = self.direction {
            bits |= LCD_FLAG_ENTRYLEFT;
        }
        if self.autoscroll {
            bits |= LCD_FLAG_ENTRYSHIFTINCREMENT;
        }
        bits
    }

    pub const fn command(&self) -> u8 {
        LCD_CMD_ENTRYMODESET | self.bits()
    }
}

/// Mirror of the three configuration registers. Each field always equals the last value
/// transmitted for that register.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ControllerRegisters {
    pub function: FunctionSet,
    pub control: DisplayControl,
    pub entry_mode: EntryMode,
}

impl ControllerRegisters {
    /// Power-on state assumed before init has transmitted anything.
    pub fn for_geometry(geometry: &DisplayGeometry) -> Self {
        Self {
            function: FunctionSet::for_geometry(geometry),
            control: DisplayControl::default(),
            entry_mode: EntryMode::default(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShiftDirection {
    Left,
    Right,
}

/// Display shift command for scrolling the whole display one column.
pub const fn scroll_command(direction: ShiftDirection) -> u8 {
    let dir = match direction {
        ShiftDirection::Right => LCD_FLAG_MOVERIGHT,
        ShiftDirection::Left => LCD_FLAG_MOVELEFT,
    };
    LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | dir
}

/// CGRAM address command for a custom character slot. Slots beyond 7 wrap.
pub const fn cgram_command(location: u8) -> u8 {
    LCD_CMD_SETCGRAMADDR | ((location & 0x7) << 3)
}

pub const fn ddram_command(address: u8) -> u8 {
    LCD_CMD_SETDDRAMADDR | address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_set_encoding() {
        let two_line = FunctionSet::for_geometry(&DisplayGeometry::new(16, 2));
        assert_eq!(two_line.command(), 0x28);

        let tall = FunctionSet::for_geometry(
            &DisplayGeometry::new(16, 1).with_dots(DotFormat::Dots5x10),
        );
        assert_eq!(tall.command(), 0x24);

        // tall font requested on a 2 row display is dropped
        let ignored = FunctionSet::for_geometry(
            &DisplayGeometry::new(20, 4).with_dots(DotFormat::Dots5x10),
        );
        assert_eq!(ignored.command(), 0x28);
    }

    #[test]
    fn test_display_control_encoding() {
        assert_eq!(DisplayControl::display_on().command(), 0x0C);
        let mut control = DisplayControl::display_on();
        control.cursor = true;
        control.blink = true;
        assert_eq!(control.command(), 0x0F);
        control.display = false;
        assert_eq!(control.command(), 0x0B);
    }

    #[test]
    fn test_entry_mode_encoding() {
        let mut mode = EntryMode::default();
        assert_eq!(mode.command(), 0x06);
        mode.autoscroll = true;
        assert_eq!(mode.command(), 0x07);
        mode.direction = TextDirection::RightToLeft;
        assert_eq!(mode.command(), 0x05);
    }

    #[test]
    fn test_mode_request_nibbles() {
        assert_eq!(LCD_NIBBLE_8BIT_REQUEST, 0x03);
        assert_eq!(LCD_NIBBLE_4BIT_REQUEST, 0x02);
    }

    #[test]
    fn test_address_commands() {
        assert_eq!(cgram_command(1), 0x48);
        assert_eq!(cgram_command(9), cgram_command(1));
        assert_eq!(ddram_command(0x40), 0xC0);
        assert_eq!(scroll_command(ShiftDirection::Left), 0x18);
        assert_eq!(scroll_command(ShiftDirection::Right), 0x1C);
    }
}
