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

/// Span of an event in the character stream of the document.
///
/// Lines and columns are 1-based when produced by the
/// [EventParser](crate::EventParser), columns count characters, and
/// the end position points at the last character of the construct.
/// Handlers receive `None` instead when no text coordinates exist,
/// e.g. for synthesized events.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl TextRange {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        debug_assert!(
            (start_line, start_column) <= (end_line, end_column),
            "text range must not end before it starts"
        );
        TextRange {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Range covering a single character position.
    pub fn point(line: usize, column: usize) -> Self {
        TextRange::new(line, column, line, column)
    }

    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_column)
    }

    pub fn end(&self) -> (usize, usize) {
        (self.end_line, self.end_column)
    }
}

impl Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// Half-open byte interval `[binary_start, binary_until)` of an event.
///
/// Offsets are relative to the data source active when the event was
/// dispatched, i.e. the document itself or the entity currently
/// entered with one of the `enter_*_data_source` events. They never
/// refer to a global document offset, so handlers must not expect
/// them to grow monotonically across an entity boundary.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DataRange {
    pub binary_start: usize,
    pub binary_until: usize,
}

impl DataRange {
    pub fn new(binary_start: usize, binary_until: usize) -> Self {
        debug_assert!(binary_start <= binary_until, "data range must not end before it starts");
        DataRange {
            binary_start,
            binary_until,
        }
    }

    /// Number of bytes in the range, zero for a reversed range.
    pub fn len(&self) -> usize {
        self.binary_until.saturating_sub(self.binary_start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the bytes of this range inside the given source buffer.
    ///
    /// `None` is returned when the range does not fit into the buffer,
    /// which happens when the buffer is not the data source the range
    /// was reported for.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.binary_start..self.binary_until)
    }
}

impl Display for DataRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.binary_start, self.binary_until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_range_display() {
        let range = TextRange::new(1, 5, 2, 3);
        assert_eq!(range.to_string(), "1:5-2:3");
        assert_eq!(range.start(), (1, 5));
        assert_eq!(range.end(), (2, 3));
        assert_eq!(TextRange::point(4, 2), TextRange::new(4, 2, 4, 2));
    }

    #[test]
    fn data_range_slice() {
        let data = b"<a>text</a>";
        let range = DataRange::new(3, 7);
        assert_eq!(range.len(), 4);
        assert!(!range.is_empty());
        assert_eq!(range.slice(data), Some(&b"text"[..]));
        assert_eq!(DataRange::new(9, 20).slice(data), None);
        assert!(DataRange::new(2, 2).is_empty());
        assert_eq!(range.to_string(), "[3..7)");
    }

    #[test]
    fn reversed_data_range_is_empty() {
        let range = DataRange {
            binary_start: 5,
            binary_until: 2,
        };
        assert_eq!(range.len(), 0);
        assert!(range.is_empty());
        assert_eq!(range.slice(b"0123456789"), None);
    }
}
