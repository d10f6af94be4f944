/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use memchr::memchr;

use super::DeclaredEntity;
use super::Halt;
use super::Run;
use super::Step;
use super::error::description;
use super::normalize_line_ends;
use crate::entities::char_reference;
use crate::entities::predefined_entity;
use crate::entities::unescape;

type ExternalId<'a> = (Option<&'a str>, Option<&'a str>);

impl<'a> Run<'a, '_, '_> {
    pub(super) fn document_type_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by("<!DOCTYPE".len());
        self.require_whitespace()?;
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, DTD_NO_NAME);
        }
        let (public_id, system_id) = if self.scanner.skip_whitespace() {
            self.external_id(false)?
        } else {
            (None, None)
        };
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| {
            handler.document_type_declaration_start(
                name, public_id, system_id, text_range, data_range,
            )
        })?;

        self.scanner.skip_whitespace();
        if self.scanner.eat("[") {
            self.internal_subset()?;
        }
        self.scanner.skip_whitespace();
        let end_mark = self.scanner.mark();
        self.declaration_end()?;
        let (text_range, data_range) = self.scanner.ranges(end_mark);
        self.emit(|handler| handler.document_type_declaration_end(text_range, data_range))
    }

    fn internal_subset(&mut self) -> Step {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat("]") {
                return Ok(());
            }
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_MARKUP);
            }
            if self.scanner.starts_with("<!--") {
                self.comment()?;
            } else if self.scanner.starts_with("<?") {
                self.processing_instruction()?;
            } else if self.scanner.starts_with("<!ENTITY") {
                self.entity_declaration()?;
            } else if self.scanner.starts_with("<!NOTATION") {
                self.notation_declaration()?;
            } else if self.scanner.starts_with("<!ELEMENT") {
                self.element_declaration()?;
            } else if self.scanner.starts_with("<!ATTLIST") {
                self.attribute_list_declaration()?;
            } else if self.scanner.peek() == Some(b'%') {
                xml_error!(self, DTD_PARAMETER_REFERENCE);
            } else {
                xml_error!(self, DTD_MARKUP_UNRECOGNIZED);
            }
        }
    }

    fn require_whitespace(&mut self) -> Step {
        if !self.scanner.skip_whitespace() {
            xml_error!(self, DTD_MISSING_SPACE);
        }
        Ok(())
    }

    fn declaration_end(&mut self) -> Step {
        self.scanner.skip_whitespace();
        if !self.scanner.eat(">") {
            if self.scanner.is_at_end() {
                xml_error!(self, DOC_OPEN_MARKUP);
            }
            xml_error!(self, DTD_MISSING_END);
        }
        Ok(())
    }

    /// Parses `SYSTEM "uri"`, `PUBLIC "id" "uri"`, or nothing.
    ///
    /// Notations may leave out the system literal after a public id.
    fn external_id(&mut self, public_only_allowed: bool) -> Result<ExternalId<'a>, Halt> {
        if self.scanner.eat("SYSTEM") {
            self.require_whitespace()?;
            let system_id = self.quoted_literal(description::DTD_MISSING_LITERAL)?;
            return Ok((None, Some(system_id)));
        }
        if self.scanner.eat("PUBLIC") {
            self.require_whitespace()?;
            let public_id = self.quoted_literal(description::DTD_MISSING_LITERAL)?;
            let had_space = self.scanner.skip_whitespace();
            if matches!(self.scanner.peek(), Some(b'"' | b'\'')) {
                if !had_space {
                    xml_error!(self, DTD_MISSING_SPACE);
                }
                let system_id = self.quoted_literal(description::DTD_MISSING_LITERAL)?;
                return Ok((Some(public_id), Some(system_id)));
            }
            if public_only_allowed {
                return Ok((Some(public_id), None));
            }
            xml_error!(self, DTD_BAD_EXTERNAL_ID);
        }
        Ok((None, None))
    }

    /// Decodes the character references of an entity value.
    ///
    /// References to `&`, `<` and `%` are kept in the canonical `&#38;`
    /// form and predefined entities are kept as written, so the value
    /// never contains a bare `&` or `%`. Other entity references are
    /// rejected.
    fn entity_value(&self, raw: &str) -> Result<String, Halt> {
        self.check_chars(raw)?;
        if memchr(b'%', raw.as_bytes()).is_some() {
            xml_error!(self, DTD_PARAMETER_REFERENCE);
        }
        let raw = normalize_line_ends(raw);
        let mut value = String::with_capacity(raw.len());
        let mut rest: &str = &raw;
        while let Some(amp) = memchr(b'&', rest.as_bytes()) {
            value.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let Some(len) = memchr(b';', after.as_bytes()) else {
                xml_error!(self, REFERENCE_UNTERMINATED);
            };
            let name = &after[..len];
            if name.is_empty() {
                xml_error!(self, REFERENCE_EMPTY_NAME);
            }
            match name.strip_prefix('#') {
                Some(number) => match char_reference(number) {
                    Some(c @ ('&' | '<' | '%')) => value.push_str(&format!("&#{};", c as u32)),
                    Some(c) => value.push(c),
                    None => xml_error!(self, REFERENCE_INVALID_CHAR),
                },
                None if predefined_entity(name).is_some() => {
                    value.push_str(&rest[amp..amp + len + 2]);
                }
                None => xml_error!(self, DTD_ENTITY_VALUE_REFERENCE),
            }
            rest = &after[len + 1..];
        }
        value.push_str(rest);
        Ok(value)
    }

    fn entity_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by("<!ENTITY".len());
        self.require_whitespace()?;
        let is_parameter = self.scanner.eat("%");
        if is_parameter {
            self.require_whitespace()?;
        }
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, DTD_NO_NAME);
        }
        self.require_whitespace()?;

        if matches!(self.scanner.peek(), Some(b'"' | b'\'')) {
            let raw = self.quoted_literal(description::DTD_MISSING_LITERAL)?;
            let value = self.entity_value(raw)?;
            self.declaration_end()?;
            let (text_range, data_range) = self.scanner.ranges(mark);
            if is_parameter {
                return self.emit(|handler| {
                    handler.parameter_entity_declaration(name, &value, text_range, data_range)
                });
            }
            if !self.entities.contains_key(name) {
                let replacement = match unescape(&value) {
                    Ok(text) => text.into_owned(),
                    Err(err) => return Err(self.reference_error(err)),
                };
                self.entities
                    .insert(name.to_string(), DeclaredEntity::Internal(replacement));
            }
            return self.emit(|handler| {
                handler.internal_entity_declaration(name, &value, text_range, data_range)
            });
        }

        if is_parameter {
            xml_error!(self, DTD_EXTERNAL_PARAMETER_ENTITY);
        }
        let (public_id, Some(system_id)) = self.external_id(false)? else {
            xml_error!(self, DTD_BAD_EXTERNAL_ID);
        };
        let had_space = self.scanner.skip_whitespace();
        let notation = if self.scanner.eat("NDATA") {
            if !had_space {
                xml_error!(self, DTD_MISSING_SPACE);
            }
            self.require_whitespace()?;
            let notation = self.scanner.name();
            if notation.is_empty() {
                xml_error!(self, DTD_NO_NAME);
            }
            Some(notation)
        } else {
            None
        };
        self.declaration_end()?;
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.entities
            .entry(name.to_string())
            .or_insert(DeclaredEntity::External);
        match notation {
            Some(notation) => self.emit(|handler| {
                handler.unparsed_entity_declaration(
                    name, public_id, system_id, notation, text_range, data_range,
                )
            }),
            None => self.emit(|handler| {
                handler.external_entity_declaration(
                    name, public_id, system_id, text_range, data_range,
                )
            }),
        }
    }

    fn notation_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by("<!NOTATION".len());
        self.require_whitespace()?;
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, DTD_NO_NAME);
        }
        self.require_whitespace()?;
        let (public_id, system_id) = self.external_id(true)?;
        if public_id.is_none() && system_id.is_none() {
            xml_error!(self, DTD_BAD_EXTERNAL_ID);
        }
        self.declaration_end()?;
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| {
            handler.notation_declaration(name, public_id, system_id, text_range, data_range)
        })
    }

    fn element_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by("<!ELEMENT".len());
        self.require_whitespace()?;
        let name = self.scanner.name();
        if name.is_empty() {
            xml_error!(self, DTD_NO_NAME);
        }
        if self.scanner.until(">").is_none() {
            xml_error!(self, DOC_OPEN_MARKUP);
        }
        self.scanner.advance_by(1);
        let literal = normalize_line_ends(self.scanner.slice_from(mark));
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| handler.element_declaration(name, &literal, text_range, data_range))
    }

    fn attribute_list_declaration(&mut self) -> Step {
        let mark = self.scanner.mark();
        self.scanner.advance_by("<!ATTLIST".len());
        self.require_whitespace()?;
        let element_name = self.scanner.name();
        if element_name.is_empty() {
            xml_error!(self, DTD_NO_NAME);
        }
        // default values may contain '>'
        loop {
            match self.scanner.peek() {
                None => xml_error!(self, DOC_OPEN_MARKUP),
                Some(b'>') => {
                    self.scanner.advance_by(1);
                    break;
                }
                Some(b'"' | b'\'') => {
                    self.quoted_literal(description::DTD_MISSING_LITERAL)?;
                }
                Some(_) => self.scanner.advance_by(1),
            }
        }
        let literal = normalize_line_ends(self.scanner.slice_from(mark));
        let (text_range, data_range) = self.scanner.ranges(mark);
        self.emit(|handler| {
            handler.attribute_list_declaration(element_name, &literal, text_range, data_range)
        })
    }
}
