/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

macro_rules! xml_error {
    ($self:ident, $a:ident) => {
        return Err($crate::parser::Halt::Failed($crate::parser::ParseError::at(
            $crate::parser::error::description::$a,
            $self.scanner.location(),
        )))
    };
}

mod dispatcher;
mod dtd;
mod error;
mod location;
mod scanner;

use std::borrow::Cow;
use std::collections::HashMap;

use log::debug;
use memchr::memchr;
use memchr::memmem;

pub use dispatcher::DataSourceKind;
pub use dispatcher::Dispatcher;
pub use error::ParseError;
use error::description;
pub use location::Location;
use scanner::Mark;
use scanner::Scanner;
use scanner::whitespace;

use crate::Attributes;
use crate::EventHandler;
use crate::InternalEntityResolver;
use crate::WhitespaceIndicator;
use crate::entities::ReferenceError;
use crate::entities::char_reference;
use crate::entities::decode_references;
use crate::entities::is_valid_xml_char;
use crate::entities::predefined_entity;

/// How a parse run which did not fail ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseOutcome {
    /// The whole document was parsed and every event was delivered.
    Completed,
    /// A handler returned `false` and the rest of the document was skipped.
    Aborted,
}

impl ParseOutcome {
    pub fn is_completed(self) -> bool {
        self == ParseOutcome::Completed
    }
}

/// A byte-oriented XML parser driving event handlers.
///
/// The handlers receive the events in list order, see [Dispatcher].
/// Implementations must stop dispatching as soon as a handler returns
/// `false` and then return `Ok(ParseOutcome::Aborted)`.
pub trait Parser {
    fn parse(
        &mut self,
        data: &[u8],
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, ParseError>;
}

/// A small non-validating XML parser producing the event vocabulary.
///
/// It accepts UTF-8 documents only. Predefined entities and character
/// references are decoded in place. Other entity references in content
/// are reported with [internal_entity()](EventHandler::internal_entity)
/// or [external_entity()](EventHandler::external_entity) and are not
/// expanded. References in attribute values are resolved with the
/// configured [InternalEntityResolver] first, then with the internal
/// entities declared in the internal subset.
///
/// ```
/// use xmlevents::{Event, EventParser, EventRecorder, Parser, WhitespaceIndicator};
///
/// let mut recorder = EventRecorder::without_ranges();
/// EventParser::new()
///     .parse(b"<greeting>hi &amp; bye</greeting>", None, &mut [&mut recorder])
///     .unwrap();
/// assert_eq!(
///     recorder.events()[2],
///     Event::Text {
///         text: "hi & bye".to_string(),
///         whitespace: WhitespaceIndicator::NotWhitespace,
///         text_range: None,
///         data_range: None,
///     }
/// );
/// ```
#[derive(Default)]
pub struct EventParser {
    resolver: Option<Box<dyn InternalEntityResolver>>,
}

impl EventParser {
    pub fn new() -> Self {
        EventParser { resolver: None }
    }

    pub fn with_entity_resolver(mut self, resolver: impl InternalEntityResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }
}

impl std::fmt::Debug for EventParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventParser")
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

impl Parser for EventParser {
    fn parse(
        &mut self,
        data: &[u8],
        source_info: Option<&str>,
        handlers: &mut [&mut dyn EventHandler],
    ) -> Result<ParseOutcome, ParseError> {
        let text = std::str::from_utf8(data).map_err(|err| {
            ParseError::at(
                description::UTF8_INVALID,
                Location::of_offset(data, err.valid_up_to()),
            )
            .with_source_info(source_info)
        })?;
        let start = if text.starts_with('\u{feff}') { 3 } else { 0 };

        let mut run = Run {
            scanner: Scanner::new(text, start),
            dispatcher: Dispatcher::new(handlers),
            resolver: self.resolver.as_deref(),
            entities: HashMap::new(),
            open_tags: Vec::new(),
            seen_root: false,
        };
        let outcome = match run.document() {
            Ok(()) => ParseOutcome::Completed,
            Err(Halt::Aborted) => ParseOutcome::Aborted,
            Err(Halt::Failed(err)) => return Err(err.with_source_info(source_info)),
        };
        debug!(
            "parse of {} finished: {:?}",
            source_info.unwrap_or("<bytes>"),
            outcome
        );
        Ok(outcome)
    }
}

/// Why the parse run stopped before the end of the document.
enum Halt {
    Aborted,
    Failed(ParseError),
}

impl From<ParseError> for Halt {
    fn from(err: ParseError) -> Self {
        Halt::Failed(err)
    }
}

type Step = Result<(), Halt>;

/// End-of-line handling, `\r\n` and a lone `\r` both become `\n`.
fn normalize_line_ends(text: &str) -> Cow<'_, str> {
    if memchr(b'\r', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[derive(Clone, Debug)]
enum DeclaredEntity {
    Internal(String),
    External,
}

/// State of one parse call.
struct Run<'a, 'd, 'h> {
    scanner: Scanner<'a>,
    dispatcher: Dispatcher<'d, 'h>,
    resolver: Option<&'a dyn InternalEntityResolver>,
    entities: HashMap<String, DeclaredEntity>,
    open_tags: Vec<&'a str>,
    seen_root: bool,
}

impl<'a> Run<'a, '_, '_> {
    fn emit<F>(&mut self, event: F) -> Step
    where
        F: FnMut(&mut dyn EventHandler) -> bool,
    {
        if self.dispatcher.dispatch(event) {
            Ok(())
        } else {
            Err(Halt::Aborted)
        }
    }

    fn document(&mut self) -> Step {
        self.emit(|handler| handler.document_start())?;

        if self.scanner.starts_with("<?xml")
            && matches!(
                self.scanner.peek_at(5),
                Some(whitespace!() | b'?')
            )
        {
            self.xml_declaration()?;
        }

        let mut seen_doctype = false;
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_at_end() {
                break;
            }
            if self.scanner.starts_with("<!--") {
                self.comment()?;
            } else if self.scanner.starts_with("<?") {
                self.processing_instruction()?;
            } else if self.scanner.starts_with("<!DOCTYPE") {
                if seen_doctype || self.seen_root {
                    xml_error!(self, MARKUP_DOCTYPE_MISPLACED);
                }
                seen_doctype = true;
                self.document_type_declaration()?;
            } else if self.scanner.starts_with("<![") {
                xml_error!(self, MARKUP_CDATA_SECTION_OUTSIDE_ROOT);
            } else if self.scanner.starts_with("</") {
                xml_error!(self, TAG_CLOSE_WITHOUT_OPEN);
            } else if self.scanner.starts_with("<!") {
                xml_error!(self, MARKUP_UNRECOGNIZED);
            } else if self.scanner.starts_with("<") {
                if self.seen_root {
                    xml_error!(self, TAG_OUTSIDE_ROOT);
                }
                self.seen_root = true;
                self.root_element()?;
            } else {
                xml_error!(self, DOC_CDATA_WITHOUT_PARENT);
            }
        }
        if !self.seen_root {
            xml_error!(self, DOC_NO_CONTENT);
        }

        self.dispatcher.finish()?;
        self.emit(|handler| handler.document_end())
    }

    fn xml_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(5);
        let mut version: Option<&'a str> = None;
        let mut encoding: Option<&'a str> = None;
        let mut standalone: Option<&'a str> = None;
        loop {
            let had_space = self.scanner.skip_whitespace();
            if self.scanner.eat("?>") {
                break;
            }
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_MARKUP);
            }
            if !had_space {
                xml_error!(self, TAG_ATTRIBUTE_MISSING_SPACE);
            }
            let name = self.scanner.name();
            let value = self.pseudo_attribute_value()?;
            let slot = match name {
                "version" => &mut version,
                "encoding" => &mut encoding,
                "standalone" => &mut standalone,
                _ => xml_error!(self, XML_DECLARATION_BAD_ATTRIBUTE),
            };
            if slot.is_some() {
                xml_error!(self, TAG_ATTRIBUTE_DUPLICATE);
            }
            *slot = Some(value);
        }
        let Some(version) = version else {
            xml_error!(self, XML_DECLARATION_NO_VERSION);
        };
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| {
            handler.xml_declaration(version, encoding, standalone, text_range, data_range)
        })
    }

    fn pseudo_attribute_value(&mut self) -> Result<&'a str, Halt> {
        self.scanner.skip_whitespace();
        if !self.scanner.eat("=") {
            xml_error!(self, TAG_ATTRIBUTE_WITHOUT_EQUAL);
        }
        self.scanner.skip_whitespace();
        self.quoted_literal(description::TAG_ATTRIBUTE_WITHOUT_QUOTE)
    }

    /// Consumes a single or double quoted literal and returns its body.
    fn quoted_literal(&mut self, missing: &'static str) -> Result<&'a str, Halt> {
        let quote = match self.scanner.peek() {
            Some(b'"') => "\"",
            Some(b'\'') => "'",
            _ => return Err(Halt::Failed(ParseError::at(missing, self.scanner.location()))),
        };
        self.scanner.advance_by(1);
        let Some(body) = self.scanner.until(quote) else {
            xml_error!(self, DOC_OPEN_MARKUP);
        };
        self.scanner.advance_by(1);
        Ok(body)
    }

    fn comment(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(4);
        let Some(text) = self.scanner.until("--") else {
            xml_error!(self, DOC_OPEN_MARKUP);
        };
        self.scanner.advance_by(2);
        if !self.scanner.eat(">") {
            xml_error!(self, COMMENT_MISSING_END);
        }
        self.check_chars(text)?;
        let text = normalize_line_ends(text);
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| handler.comment(&text, text_range, data_range))
    }

    fn processing_instruction(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(2);
        let target = self.scanner.name();
        if target.is_empty() {
            xml_error!(self, PI_EMPTY_TARGET);
        }
        if target == "xml" {
            xml_error!(self, XML_DECLARATION_MISPLACED);
        }
        if target.eq_ignore_ascii_case("xml") {
            xml_error!(self, PI_RESERVED_TARGET);
        }
        let data = if self.scanner.eat("?>") {
            None
        } else {
            if !self.scanner.skip_whitespace() {
                xml_error!(self, PI_MISSING_SPACE);
            }
            let Some(data) = self.scanner.until("?>") else {
                xml_error!(self, DOC_OPEN_MARKUP);
            };
            self.scanner.advance_by(2);
            self.check_chars(data)?;
            (!data.is_empty()).then(|| normalize_line_ends(data))
        };
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| {
            handler.processing_instruction(target, data.as_deref(), text_range, data_range)
        })
    }

    fn root_element(&mut self) -> Step {
        self.start_tag()?;
        while !self.open_tags.is_empty() {
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_TAGS);
            }
            if self.scanner.starts_with("</") {
                self.end_tag()?;
            } else if self.scanner.starts_with("<!--") {
                self.comment()?;
            } else if self.scanner.starts_with("<![CDATA[") {
                self.cdata_section()?;
            } else if self.scanner.starts_with("<?") {
                self.processing_instruction()?;
            } else if self.scanner.starts_with("<!") {
                xml_error!(self, MARKUP_UNRECOGNIZED);
            } else if self.scanner.starts_with("<") {
                self.start_tag()?;
            } else {
                self.text()?;
            }
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(1);
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, TAG_EMPTY_NAME);
        }

        let mut attributes = Attributes::new();
        let is_empty = loop {
            let had_space = self.scanner.skip_whitespace();
            if self.scanner.eat(">") {
                break false;
            }
            if self.scanner.eat("/") {
                if !self.scanner.eat(">") {
                    xml_error!(self, TAG_EMPTY_TAG_MISSING_END);
                }
                break true;
            }
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_MARKUP);
            }
            if !had_space {
                xml_error!(self, TAG_ATTRIBUTE_MISSING_SPACE);
            }
            let attribute_name = self.scanner.name();
            if attribute_name.is_empty() {
                xml_error!(self, TAG_EMPTY_NAME);
            }
            let raw = self.pseudo_attribute_value()?;
            if raw.contains('<') {
                xml_error!(self, TAG_ATTRIBUTE_BAD_VALUE);
            }
            if attributes.contains_key(attribute_name) {
                xml_error!(self, TAG_ATTRIBUTE_DUPLICATE);
            }
            let value = self.attribute_value(raw, attribute_name, name)?;
            attributes.insert(attribute_name.to_string(), Some(value));
        };

        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| handler.element_start(name, &mut attributes, text_range, data_range))?;
        if is_empty {
            self.emit(|handler| handler.element_end(name, text_range, data_range))
        } else {
            self.open_tags.push(name);
            Ok(())
        }
    }

    fn attribute_value(
        &mut self,
        raw: &str,
        attribute_name: &str,
        element_name: &str,
    ) -> Result<String, Halt> {
        self.check_chars(raw)?;
        let normalized = normalize_line_ends(raw).replace(['\t', '\n'], " ");
        let resolver = self.resolver;
        let entities = &self.entities;
        let decoded = decode_references(&normalized, |entity| {
            resolver
                .and_then(|r| r.resolve(entity, Some(attribute_name), Some(element_name)))
                .or_else(|| match entities.get(entity) {
                    Some(DeclaredEntity::Internal(value)) => Some(value.clone()),
                    _ => None,
                })
        });
        match decoded {
            Ok(value) => Ok(value.into_owned()),
            Err(err) => Err(self.reference_error(err)),
        }
    }

    fn reference_error(&self, err: ReferenceError) -> Halt {
        let message: Cow<'static, str> = match &err {
            ReferenceError::Unterminated => description::REFERENCE_UNTERMINATED.into(),
            ReferenceError::InvalidCharacter(_) => description::REFERENCE_INVALID_CHAR.into(),
            ReferenceError::Unresolved(_) => err.to_string().into(),
        };
        Halt::Failed(ParseError::at(message, self.scanner.location()))
    }

    fn end_tag(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(2);
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, TAG_EMPTY_NAME);
        }
        self.scanner.skip_whitespace();
        if !self.scanner.eat(">") {
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_MARKUP);
            }
            xml_error!(self, TAG_END_TAG_ATTRIBUTES);
        }
        match self.open_tags.pop() {
            Some(open) if open == name => (),
            Some(_) => xml_error!(self, TAG_MISMATCH),
            None => xml_error!(self, TAG_CLOSE_WITHOUT_OPEN),
        }
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| handler.element_end(name, text_range, data_range))
    }

    fn cdata_section(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by(9);
        let Some(text) = self.scanner.until("]]>") else {
            xml_error!(self, DOC_OPEN_MARKUP);
        };
        self.scanner.advance_by(3);
        self.check_chars(text)?;
        let text = normalize_line_ends(text);
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| handler.cdata_section(&text, text_range, data_range))
    }

    /// Character data up to the next markup, with predefined entities and
    /// character references decoded into it.
    fn text(&mut self) -> Step {
        let mut buffer = String::new();
        let mut start: Option<Mark> = None;
        loop {
            match self.scanner.peek() {
                None | Some(b'<') => break,
                Some(b'&') => {
                    let mark = self.scanner.mark();
                    self.scanner.advance_by(1);
                    let body = self.scanner.until_either(b';', b'<');
                    if !self.scanner.eat(";") {
                        xml_error!(self, REFERENCE_UNTERMINATED);
                    }
                    if body.is_empty() {
                        xml_error!(self, REFERENCE_EMPTY_NAME);
                    }
                    let decoded = match body.strip_prefix('#') {
                        Some(number) => match char_reference(number) {
                            Some(c) => c,
                            None => xml_error!(self, REFERENCE_INVALID_CHAR),
                        },
                        None => match predefined_entity(body) {
                            Some(c) => c,
                            None => {
                                if let Some(text_mark) = start.take() {
                                    self.flush_text(&mut buffer, text_mark, mark)?;
                                }
                                self.entity_reference(body, mark)?;
                                continue;
                            }
                        },
                    };
                    if start.is_none() {
                        start = Some(mark);
                    }
                    buffer.push(decoded);
                }
                Some(_) => {
                    let mark = self.scanner.mark();
                    let run = self.scanner.until_either(b'<', b'&');
                    self.check_chars(run)?;
                    if memmem::find(run.as_bytes(), b"]]>").is_some() {
                        xml_error!(self, DOC_CDATA_END_IN_TEXT);
                    }
                    if start.is_none() {
                        start = Some(mark);
                    }
                    buffer.push_str(&normalize_line_ends(run));
                }
            }
        }
        if let Some(text_mark) = start {
            let end = self.scanner.mark();
            self.flush_text(&mut buffer, text_mark, end)?;
        }
        Ok(())
    }

    fn flush_text(&mut self, buffer: &mut String, start: Mark, end: Mark) -> Step {
        let (text_range, data_range) = self.scanner.ranges_between(start, end);
        let whitespace = WhitespaceIndicator::of(buffer);
        let text = std::mem::take(buffer);
        self.emit(|handler| handler.text(&text, whitespace, text_range, data_range))
    }

    fn entity_reference(&mut self, name: &'a str, mark: Mark) -> Step {
        let (text_range, data_range) = self.scanner.ranges(mark);
        let is_external = matches!(self.entities.get(name), Some(DeclaredEntity::External));
        if is_external {
            self.emit(|handler| handler.external_entity(name, text_range, data_range))
        } else {
            self.emit(|handler| handler.internal_entity(name, text_range, data_range))
        }
    }

    fn check_chars(&self, text: &str) -> Step {
        if text.chars().all(|c| is_valid_xml_char(c as u32)) {
            Ok(())
        } else {
            xml_error!(self, CHAR_INVALID);
        }
    }
}
