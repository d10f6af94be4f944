/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::ParseError;
use crate::SourceError;

/// Failure of a [ConvenienceParser](super::ConvenienceParser) call.
///
/// Source errors happen before any event is delivered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
