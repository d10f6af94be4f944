/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod convenience;
pub mod entities;
mod events;
mod formatter;
mod parser;
mod production;
mod source;

pub use events::Attributes;
pub use events::DataRange;
pub use events::DefaultEventHandler;
pub use events::Event;
pub use events::EventHandler;
pub use events::EventRecorder;
pub use events::InternalEntityResolver;
pub use events::TextRange;
pub use events::WhitespaceIndicator;

pub use parser::DataSourceKind;
pub use parser::Dispatcher;
pub use parser::EventParser;
pub use parser::Location;
pub use parser::ParseError;
pub use parser::ParseOutcome;
pub use parser::Parser;

pub use source::DocumentSource;
pub use source::PathSeparator;
pub use source::ResolvedSource;
pub use source::SourceError;

pub use convenience::ConvenienceParser;
pub use convenience::Error;

pub use formatter::DefaultFormatter;
pub use formatter::Formatter;

pub use production::DefaultProduction;
pub use production::EventSerializer;
pub use production::Production;
