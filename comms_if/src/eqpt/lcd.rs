//! # Serial 16x2 LCD framing
//!
//! Each write moves the cursor to the start of a line with a two byte command and then sends the
//! text, padded with spaces so that stale characters from a previous write are overwritten. Text
//! longer than the line is sent as is and is not wrapped.

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of characters on each line.
pub const LINE_WIDTH: usize = 16;

/// Number of lines on the display.
pub const NUM_LINES: usize = 2;

const START_OF_FIRST_LINE: [u8; 2] = [0xfe, 0x80];
const START_OF_SECOND_LINE: [u8; 2] = [0xfe, 0xc0];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A line of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdLine {
    First,
    Second,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LcdLine {
    /// Cursor command moving to the start of this line.
    pub fn start_cmd(self) -> [u8; 2] {
        match self {
            LcdLine::First => START_OF_FIRST_LINE,
            LcdLine::Second => START_OF_SECOND_LINE,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Pad `text` with spaces up to `width` characters.
pub fn pad(text: &str, width: usize) -> String {
    let mut s = String::from(text);
    let len = text.chars().count();
    if len < width {
        s.extend(std::iter::repeat(' ').take(width - len));
    }
    s
}

/// Frame a write of `text` onto a single line.
pub fn frame_line(text: &str, line: LcdLine) -> Vec<u8> {
    let mut frame = line.start_cmd().to_vec();
    frame.extend_from_slice(pad(text, LINE_WIDTH).as_bytes());
    frame
}

/// Frame a write of `text` which clears the whole display, starting at the first line.
pub fn frame_screen(text: &str) -> Vec<u8> {
    let mut frame = LcdLine::First.start_cmd().to_vec();
    frame.extend_from_slice(pad(text, LINE_WIDTH * NUM_LINES).as_bytes());
    frame
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_frame_line_pads() {
        let f = frame_line("Spd 70", LcdLine::Second);
        assert_eq!(&f[..2], &[0xfe, 0xc0]);
        assert_eq!(f.len(), 2 + LINE_WIDTH);
        assert_eq!(&f[2..], b"Spd 70          ");
    }

    #[test]
    fn test_frame_line_does_not_truncate() {
        let text = "this text is far too long";
        let f = frame_line(text, LcdLine::First);
        assert_eq!(&f[2..], text.as_bytes());
    }

    #[test]
    fn test_frame_screen() {
        let f = frame_screen("hello");
        assert_eq!(&f[..2], &[0xfe, 0x80]);
        assert_eq!(f.len(), 2 + 32);
    }
}
