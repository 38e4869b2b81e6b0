use core::fmt::Display;

/// Number of DDRAM row base addresses the HD44780 supports.
pub const MAX_ROWS: usize = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
/// Character cell dot format. The tall 5x10 font is only honored on single row displays.
pub enum DotFormat {
    /// 5x8 dot characters
    #[default]
    Dots5x8,
    /// 5x10 dot characters
    Dots5x10,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// The physical layout of the display. Fixed at construction, but may be replaced by `begin`.
pub struct DisplayGeometry {
    pub columns: u8,
    pub rows: u8,
    pub dots: DotFormat,
}

impl DisplayGeometry {
    /// `rows` must be 1 to 4. Larger values behave like 4 rows when positioning the cursor.
    pub const fn new(columns: u8, rows: u8) -> Self {
        debug_assert!(rows >= 1, "a display has at least one row");
        Self {
            columns,
            rows,
            dots: DotFormat::Dots5x8,
        }
    }

    pub const fn with_dots(mut self, dots: DotFormat) -> Self {
        self.dots = dots;
        self
    }

    /// More than one row selects the controller's 2-line mode.
    pub const fn is_multi_line(&self) -> bool {
        self.rows > 1
    }

    /// The tall font is only legal on a single row display; any other request falls back to 5x8.
    pub fn effective_dots(&self) -> DotFormat {
        if self.dots == DotFormat::Dots5x10 && self.rows == 1 {
            DotFormat::Dots5x10
        } else {
            DotFormat::Dots5x8
        }
    }

    /// Default DDRAM row base addresses for this geometry.
    pub const fn row_offsets(&self) -> RowOffsets {
        RowOffsets([
            0x00,
            0x40,
            self.columns,
            0x40u8.wrapping_add(self.columns),
        ])
    }

    /// Highest addressable row index, taking both the configured rows and the table size into account.
    pub fn last_row(&self) -> u8 {
        let usable = (self.rows as usize).min(MAX_ROWS);
        usable.saturating_sub(1) as u8
    }
}

/// DDRAM base address for each of the four supported rows.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RowOffsets(pub [u8; MAX_ROWS]);

impl RowOffsets {
    /// DDRAM address for `(col, row)`. The row must already be clamped; the column is not checked and
    /// simply wraps into whatever address the controller maps it to.
    pub fn address(&self, col: u8, row: u8) -> u8 {
        let row = (row as usize).min(MAX_ROWS - 1);
        self.0[row].wrapping_add(col)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Common character display sizes. Converts into a `DisplayGeometry` with the 5x8 font.
pub enum LcdDisplayType {
    /// 20x4 display
    Lcd20x4,
    /// 20x2 display
    Lcd20x2,
    /// 16x2 display
    Lcd16x2,
    /// 16x4 display
    Lcd16x4,
    /// 8x2 display
    Lcd8x2,
    /// 40x2 display
    Lcd40x2,
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd20x4 => "20x4",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x4 => "16x4",
            LcdDisplayType::Lcd8x2 => "8x2",
            LcdDisplayType::Lcd40x2 => "40x2",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    pub const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 4,
            LcdDisplayType::Lcd20x2 => 2,
            LcdDisplayType::Lcd16x2 => 2,
            LcdDisplayType::Lcd16x4 => 4,
            LcdDisplayType::Lcd8x2 => 2,
            LcdDisplayType::Lcd40x2 => 2,
        }
    }

    /// Get the number of columns for the display type
    pub const fn cols(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 20,
            LcdDisplayType::Lcd20x2 => 20,
            LcdDisplayType::Lcd16x2 => 16,
            LcdDisplayType::Lcd16x4 => 16,
            LcdDisplayType::Lcd8x2 => 8,
            LcdDisplayType::Lcd40x2 => 40,
        }
    }
}

impl From<LcdDisplayType> for DisplayGeometry {
    fn from(display_type: LcdDisplayType) -> Self {
        DisplayGeometry::new(display_type.cols(), display_type.rows())
    }
}
