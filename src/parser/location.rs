/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

/// A position in the parser input byte stream.
///
/// Gives both coordinate systems of a position: the byte offset into
/// the data source, and the 1-based line and column. Columns count
/// characters, not bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Byte position in the input stream.
    pub bytes: usize,
    /// Line number, lines are separated by the newline character.
    pub line: usize,
    /// Character position in the line.
    pub column: usize,
}

impl Location {
    /// Creates a new location at the beginning of the input stream.
    pub fn new() -> Self {
        Location {
            bytes: 0,
            line: 1,
            column: 1,
        }
    }

    /// Moves the location over one input byte.
    ///
    /// `\r\n`, `\r` and `\n` each end a line. UTF-8 continuation bytes
    /// do not move the column.
    pub(super) fn advance(&mut self, c: u8, previous: Option<u8>) {
        self.bytes += 1;
        match c {
            b'\n' if previous == Some(b'\r') => (),
            b'\n' | b'\r' => {
                self.line += 1;
                self.column = 1;
            }
            _ if c & 0xc0 != 0x80 => self.column += 1,
            _ => (),
        }
    }

    /// Location after walking over all the given bytes from the start.
    pub fn of_offset(bytes: &[u8], offset: usize) -> Self {
        let mut location = Location::new();
        let mut previous = None;
        for &c in bytes.iter().take(offset) {
            location.advance(c, previous);
            previous = Some(c);
        }
        location
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "byte: {}, line: {}, column: {}",
            self.bytes, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_and_characters() {
        let location = Location::of_offset("ab\ncdé\nf".as_bytes(), 8);
        assert_eq!(
            location,
            Location {
                bytes: 8,
                line: 3,
                column: 1
            }
        );
        let location = Location::of_offset("ab\ncdéx".as_bytes(), 7);
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 4);
        assert_eq!(location.to_string(), "byte: 7, line: 2, column: 4");
    }

    #[test]
    fn carriage_returns_end_lines() {
        let location = Location::of_offset(b"a\r\nb\rc\r\n\r\nd", 11);
        assert_eq!(
            location,
            Location {
                bytes: 11,
                line: 5,
                column: 2
            }
        );
        assert_eq!(Location::of_offset(b"a\r\n", 3).column, 1);
    }
}
