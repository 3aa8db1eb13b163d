//! Unicode decoding over 8, 16 and 32-bit code units
//!
//! Decoding is lazy and forward only. Input is trusted: malformed UTF-8
//! produces some code point instead of an error, and an unpaired UTF-16 high
//! surrogate is passed through unchanged. A sequence cut short by the end of
//! the buffer decodes from the units that are present.

/// Extra bytes following each UTF-8 leading byte
const TRAILING_BYTES_UTF8: [u8; 256] = trailing_bytes_table();

/// Bias removed from the accumulated value, indexed by trailing byte count
const OFFSETS_FROM_UTF8: [u32; 6] = [
    0x0000_0000,
    0x0000_3080,
    0x000E_2080,
    0x03C8_2080,
    0xFA08_2080,
    0x8208_2080,
];

const fn trailing_bytes_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = match byte {
            0x00..=0xBF => 0,
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF7 => 3,
            0xF8..=0xFB => 4,
            _ => 5,
        };
        byte += 1;
    }
    table
}

const SURROGATE_HIGH_START: u32 = 0xD800;
const SURROGATE_HIGH_END: u32 = 0xDBFF;
const SURROGATE_LOW_START: u32 = 0xDC00;
const SURROGATE_LOW_END: u32 = 0xDFFF;

/// A fixed-width code unit of some Unicode encoding
pub trait CodeUnit: Copy + 'static {
    /// Decode the code point starting at `pos`, returning it together with
    /// the position of the following code point. `pos` must be in bounds.
    fn decode(units: &[Self], pos: usize) -> (u32, usize);
}

impl CodeUnit for u8 {
    fn decode(units: &[Self], pos: usize) -> (u32, usize) {
        let extra = TRAILING_BYTES_UTF8[units[pos] as usize] as usize;
        let end = (pos + extra + 1).min(units.len());

        let mut ch = 0u32;
        for (i, &unit) in units[pos..end].iter().enumerate() {
            if i > 0 {
                ch = ch.wrapping_shl(6);
            }
            ch = ch.wrapping_add(u32::from(unit));
        }

        (ch.wrapping_sub(OFFSETS_FROM_UTF8[end - pos - 1]), end)
    }
}

impl CodeUnit for u16 {
    fn decode(units: &[Self], pos: usize) -> (u32, usize) {
        let high = u32::from(units[pos]);
        if (SURROGATE_HIGH_START..=SURROGATE_HIGH_END).contains(&high) {
            if let Some(&next) = units.get(pos + 1) {
                let low = u32::from(next);
                if (SURROGATE_LOW_START..=SURROGATE_LOW_END).contains(&low) {
                    let ch = ((high - SURROGATE_HIGH_START) << 10) + (low - SURROGATE_LOW_START) + 0x10000;
                    return (ch, pos + 2);
                }
            }
        }
        (high, pos + 1)
    }
}

impl CodeUnit for u32 {
    fn decode(units: &[Self], pos: usize) -> (u32, usize) {
        (units[pos], pos + 1)
    }
}

/// Text that can be viewed as a slice of code units
pub trait UnicodeText {
    /// Code unit width of the encoding
    type Unit: CodeUnit;

    /// Raw code units
    fn code_units(&self) -> &[Self::Unit];
}

impl UnicodeText for str {
    type Unit = u8;

    fn code_units(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl UnicodeText for String {
    type Unit = u8;

    fn code_units(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<U: CodeUnit> UnicodeText for [U] {
    type Unit = U;

    fn code_units(&self) -> &[U] {
        self
    }
}

impl<U: CodeUnit> UnicodeText for Vec<U> {
    type Unit = U;

    fn code_units(&self) -> &[U] {
        self
    }
}

/// Cursor over the code points of a code unit buffer
///
/// Holds the current code point and the positions of the current and next
/// code points. Two cursors compare equal when they sit at the same
/// position.
#[derive(Debug, Clone)]
pub struct UnicodeCursor<'a, U: CodeUnit> {
    units: &'a [U],
    current: usize,
    next: usize,
    codepoint: u32,
}

impl<'a, U: CodeUnit> UnicodeCursor<'a, U> {
    /// Place a cursor on the first code point of `units`
    pub fn new(units: &'a [U]) -> Self {
        let mut cursor = Self {
            units,
            current: 0,
            next: 0,
            codepoint: 0,
        };
        cursor.read_current();
        cursor
    }

    fn read_current(&mut self) {
        self.current = self.next;
        if self.current < self.units.len() {
            let (codepoint, next) = U::decode(self.units, self.current);
            self.codepoint = codepoint;
            self.next = next;
        } else {
            self.codepoint = 0;
        }
    }

    /// Current code point, `None` at the end of the buffer
    pub fn get(&self) -> Option<u32> {
        (!self.is_end()).then_some(self.codepoint)
    }

    /// Code point after the current one, without moving
    pub fn peek(&self) -> Option<u32> {
        if self.next < self.units.len() {
            Some(U::decode(self.units, self.next).0)
        } else {
            None
        }
    }

    /// Move to the next code point
    pub fn advance(&mut self) {
        if !self.is_end() {
            self.read_current();
        }
    }

    /// Whether every code point has been consumed
    pub fn is_end(&self) -> bool {
        self.current >= self.units.len()
    }

    /// Unit offset of the current code point
    pub fn position(&self) -> usize {
        self.current
    }

    /// Unit offset just past the current code point
    pub fn next_position(&self) -> usize {
        self.next.max(self.current)
    }

    /// Remaining buffer, starting at the current code point
    pub fn remaining(&self) -> &'a [U] {
        &self.units[self.current.min(self.units.len())..]
    }
}

impl<U: CodeUnit> PartialEq for UnicodeCursor<'_, U> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<U: CodeUnit> Eq for UnicodeCursor<'_, U> {}

impl<U: CodeUnit> Iterator for UnicodeCursor<'_, U> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let codepoint = self.get()?;
        self.advance();
        Some(codepoint)
    }
}

/// Start decoding `text`
pub fn decode<T: UnicodeText + ?Sized>(text: &T) -> UnicodeCursor<'_, T::Unit> {
    UnicodeCursor::new(text.code_units())
}

/// Whether a code point is Unicode whitespace
pub fn is_whitespace(codepoint: u32) -> bool {
    char::from_u32(codepoint).is_some_and(char::is_whitespace)
}
