/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use memchr::memmem;

use super::Location;
use crate::DataRange;
use crate::TextRange;

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n'
    };
}

pub(super) use whitespace;

/// Start of a construct, kept until its ranges are reported.
#[derive(Clone, Copy, Debug)]
pub(super) struct Mark {
    pos: usize,
    location: Location,
    last_char: Location,
}

/// Cursor over a complete UTF-8 document.
///
/// All positions the parser stops at are on ASCII delimiters, so
/// slicing the text between two positions is always valid.
pub(super) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    location: Location,
    last_char: Location,
}

fn is_name_byte(c: u8) -> bool {
    !matches!(
        c,
        whitespace!()
            | b'/'
            | b'>'
            | b'<'
            | b'='
            | b'?'
            | b'!'
            | b'"'
            | b'\''
            | b'['
            | b']'
            | b'('
            | b')'
            | b'&'
            | b';'
            | b'%'
            | b'|'
            | b','
    )
}

impl<'a> Scanner<'a> {
    pub(super) fn new(text: &'a str, start: usize) -> Self {
        let location = Location::of_offset(text.as_bytes(), start);
        Scanner {
            text,
            pos: start,
            location,
            last_char: location,
        }
    }

    pub(super) fn location(&self) -> Location {
        self.location
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub(super) fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub(super) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    pub(super) fn starts_with(&self, prefix: &str) -> bool {
        self.text.as_bytes()[self.pos..].starts_with(prefix.as_bytes())
    }

    pub(super) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            location: self.location,
            last_char: self.last_char,
        }
    }

    fn advance(&mut self) {
        let bytes = self.text.as_bytes();
        let c = bytes[self.pos];
        let previous = self.pos.checked_sub(1).map(|p| bytes[p]);
        let line_feed_of_crlf = c == b'\n' && previous == Some(b'\r');
        if c & 0xc0 != 0x80 && !line_feed_of_crlf {
            self.last_char = self.location;
        }
        self.location.advance(c, previous);
        self.pos += 1;
    }

    pub(super) fn advance_by(&mut self, n: usize) {
        let target = std::cmp::min(self.pos + n, self.text.len());
        while self.pos < target {
            self.advance();
        }
    }

    /// Consumes `prefix` if the input continues with it.
    pub(super) fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.advance_by(prefix.len());
            true
        } else {
            false
        }
    }

    /// Skips whitespace and tells whether there was any.
    pub(super) fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(whitespace!()) = self.peek() {
            self.advance();
        }
        self.pos > start
    }

    /// Consumes a name and returns it, possibly empty.
    pub(super) fn name(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_name_byte(c) {
                break;
            }
            self.advance();
        }
        &self.text[start..self.pos]
    }

    /// Consumes input up to the delimiter and returns it, leaving the
    /// delimiter itself unconsumed.
    pub(super) fn until(&mut self, delimiter: &str) -> Option<&'a str> {
        let found = memmem::find(&self.text.as_bytes()[self.pos..], delimiter.as_bytes())?;
        let start = self.pos;
        self.advance_by(found);
        Some(&self.text[start..self.pos])
    }

    /// Consumes input up to one of the two delimiter bytes.
    pub(super) fn until_either(&mut self, a: u8, b: u8) -> &'a str {
        let rest = &self.text.as_bytes()[self.pos..];
        let len = memchr::memchr2(a, b, rest).unwrap_or(rest.len());
        let start = self.pos;
        self.advance_by(len);
        &self.text[start..self.pos]
    }

    pub(super) fn slice_from(&self, mark: Mark) -> &'a str {
        &self.text[mark.pos..self.pos]
    }

    /// Text and data ranges of everything consumed since the mark.
    pub(super) fn ranges(&self, mark: Mark) -> (Option<TextRange>, Option<DataRange>) {
        self.ranges_between(mark, self.mark())
    }

    pub(super) fn ranges_between(
        &self,
        start: Mark,
        end: Mark,
    ) -> (Option<TextRange>, Option<DataRange>) {
        let data_range = DataRange::new(start.pos, end.pos);
        if end.pos == start.pos {
            let point = TextRange::point(start.location.line, start.location.column);
            return (Some(point), Some(data_range));
        }
        let text_range = TextRange::new(
            start.location.line,
            start.location.column,
            end.last_char.line,
            end.last_char.column,
        );
        (Some(text_range), Some(data_range))
    }
}
