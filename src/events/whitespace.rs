/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::ops::Add;
use std::ops::AddAssign;

/// Tells whether a character data event consists of whitespace only.
///
/// Adjacent text runs (for example the parts of a text split by an
/// entity boundary) are merged with the `+` operator:
///
/// ```
/// use xmlevents::WhitespaceIndicator::*;
///
/// assert_eq!(Whitespace + Whitespace, Whitespace);
/// assert_eq!(Whitespace + Unknown, Unknown);
/// assert_eq!(Unknown + NotWhitespace, NotWhitespace);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WhitespaceIndicator {
    Whitespace,
    NotWhitespace,
    Unknown,
}

impl WhitespaceIndicator {
    /// Classifies a decoded text run.
    ///
    /// Only the XML whitespace characters (space, tab, carriage return,
    /// line feed) count. An empty run is whitespace.
    pub fn of(text: &str) -> Self {
        if text
            .bytes()
            .all(|c| matches!(c, b' ' | b'\t' | b'\r' | b'\n'))
        {
            WhitespaceIndicator::Whitespace
        } else {
            WhitespaceIndicator::NotWhitespace
        }
    }

    pub fn is_whitespace(self) -> bool {
        self == WhitespaceIndicator::Whitespace
    }
}

impl Add for WhitespaceIndicator {
    type Output = WhitespaceIndicator;

    fn add(self, other: WhitespaceIndicator) -> WhitespaceIndicator {
        use WhitespaceIndicator::*;

        match (self, other) {
            (NotWhitespace, _) | (_, NotWhitespace) => NotWhitespace,
            (Unknown, _) | (_, Unknown) => Unknown,
            (Whitespace, Whitespace) => Whitespace,
        }
    }
}

impl AddAssign for WhitespaceIndicator {
    fn add_assign(&mut self, other: WhitespaceIndicator) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::WhitespaceIndicator::*;
    use super::*;

    const ALL: [WhitespaceIndicator; 3] = [Whitespace, NotWhitespace, Unknown];

    #[test]
    fn join_is_commutative() {
        for a in ALL {
            for b in ALL {
                assert_eq!(a + b, b + a, "{a:?} + {b:?}");
            }
        }
    }

    #[test]
    fn not_whitespace_dominates() {
        for a in ALL {
            assert_eq!(a + NotWhitespace, NotWhitespace);
        }
        assert_eq!(Unknown + Whitespace, Unknown);
        assert_eq!(Unknown + Unknown, Unknown);
        assert_eq!(Whitespace + Whitespace, Whitespace);
    }

    #[test]
    fn join_is_associative() {
        for a in ALL {
            for b in ALL {
                for c in ALL {
                    assert_eq!((a + b) + c, a + (b + c));
                }
            }
        }
    }

    #[test]
    fn add_assign() {
        let mut merged = Whitespace;
        merged += Unknown;
        assert_eq!(merged, Unknown);
        merged += NotWhitespace;
        assert_eq!(merged, NotWhitespace);
        merged += Whitespace;
        assert_eq!(merged, NotWhitespace);
    }

    #[test]
    fn classify() {
        assert_eq!(WhitespaceIndicator::of(" \t\r\n"), Whitespace);
        assert_eq!(WhitespaceIndicator::of(""), Whitespace);
        assert_eq!(WhitespaceIndicator::of("  x "), NotWhitespace);
        // non-breaking space is not XML whitespace
        assert_eq!(WhitespaceIndicator::of("\u{a0}"), NotWhitespace);
        assert!(WhitespaceIndicator::of("\n").is_whitespace());
    }
}
