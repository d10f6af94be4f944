/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;

use std::path::Path;

use log::debug;
use url::Url;

pub use error::Error;

use crate::DocumentSource;
use crate::EventHandler;
use crate::ParseOutcome;
use crate::Parser;
use crate::PathSeparator;

/// Runs a byte parser over any document source with a main handler.
///
/// Every parse call delivers the events to the main handler first, then
/// to the auxiliary handlers given to that call, in their order. An
/// abort by any of them ends the whole parse.
///
/// ```
/// use xmlevents::{ConvenienceParser, Event, EventParser, EventRecorder};
///
/// let mut parser = ConvenienceParser::new(EventParser::new(), EventRecorder::without_ranges());
/// let mut seen = EventRecorder::without_ranges();
/// parser.parse_text("<note>hi</note>", None, &mut [&mut seen]).unwrap();
/// assert_eq!(parser.handler().events(), seen.events());
/// assert_eq!(seen.events().len(), 5);
/// ```
#[derive(Debug)]
pub struct ConvenienceParser<P, H> {
    parser: P,
    main_handler: H,
    separator: PathSeparator,
}

impl<P: Parser, H: EventHandler> ConvenienceParser<P, H> {
    pub fn new(parser: P, main_handler: H) -> Self {
        ConvenienceParser {
            parser,
            main_handler,
            separator: PathSeparator::native(),
        }
    }

    /// Sets the separator used in the labels of file URLs.
    pub fn with_path_separator(mut self, separator: PathSeparator) -> Self {
        self.separator = separator;
        self
    }

    pub fn path_separator(&self) -> PathSeparator {
        self.separator
    }

    pub fn handler(&self) -> &H {
        &self.main_handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.main_handler
    }

    pub fn parser_mut(&mut self) -> &mut P {
        &mut self.parser
    }

    pub fn into_handler(self) -> H {
        self.main_handler
    }

    /// Parses a document source.
    ///
    /// Without an explicit `source_info`, errors are labeled with the
    /// path or URL of the source. The resolved buffer is released
    /// before returning, whatever the outcome.
    pub fn parse(
        &mut self,
        source: &DocumentSource,
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        let resolved = source.resolve(self.separator)?;
        let source_info = source_info.or(resolved.label());
        self.run(resolved.data(), source_info, handlers)
    }

    pub fn parse_path(
        &mut self,
        path: impl AsRef<Path>,
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        let source = DocumentSource::Path(path.as_ref().to_path_buf());
        self.parse(&source, source_info, handlers)
    }

    pub fn parse_url(
        &mut self,
        url: &Url,
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        let source = DocumentSource::Url(url.clone());
        self.parse(&source, source_info, handlers)
    }

    pub fn parse_text(
        &mut self,
        text: &str,
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        self.run(text.as_bytes(), source_info, handlers)
    }

    pub fn parse_bytes(
        &mut self,
        data: &[u8],
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        self.run(data, source_info, handlers)
    }

    fn run(
        &mut self,
        data: &[u8],
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, Error> {
        let mut all: Vec<&mut dyn EventHandler> = Vec::with_capacity(handlers.len() + 1);
        all.push(&mut self.main_handler);
        for handler in handlers.iter_mut() {
            all.push(&mut **handler);
        }
        debug!(
            "parsing {} with {} handlers",
            source_info.unwrap_or("<bytes>"),
            all.len()
        );
        Ok(self.parser.parse(data, source_info, &mut all)?)
    }
}

#[cfg(test)]
mod tests;
