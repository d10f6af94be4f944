/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io;

use log::debug;
use url::Url;

use super::Production;
use crate::Attributes;
use crate::DataRange;
use crate::EventHandler;
use crate::TextRange;
use crate::WhitespaceIndicator;

struct PendingStart {
    name: String,
    attributes: Attributes,
}

struct Doctype {
    name: String,
    public_id: Option<String>,
    system_id: Option<String>,
    in_subset: bool,
}

/// An event handler writing the events it receives to a [Production].
///
/// Element starts are held back until the next event, so that an
/// element without content is written as an empty element tag.
/// Entity references are written as references, and whatever arrives
/// while a data source is entered is skipped since the reference
/// already stands for it.
///
/// A failed write aborts the parse, the error is kept for
/// [take_error()](EventSerializer::take_error).
///
/// ```
/// use xmlevents::{DefaultProduction, EventParser, EventSerializer, Parser};
///
/// let mut serializer = EventSerializer::new(DefaultProduction::new(Vec::new()));
/// EventParser::new()
///     .parse(b"<a y='2' x=\"1\"><b></b>&amp;</a>", None, &mut [&mut serializer])
///     .unwrap();
/// let xml = serializer.into_production().into_inner();
/// assert_eq!(xml, b"<a x=\"1\" y=\"2\"><b/>&amp;</a>");
/// ```
pub struct EventSerializer<P> {
    production: P,
    pending: Option<PendingStart>,
    open_elements: Vec<bool>,
    doctype: Option<Doctype>,
    data_source_depth: usize,
    error: Option<io::Error>,
}

impl<P: Production> EventSerializer<P> {
    pub fn new(production: P) -> Self {
        EventSerializer {
            production,
            pending: None,
            open_elements: Vec::new(),
            doctype: None,
            data_source_depth: 0,
            error: None,
        }
    }

    pub fn production(&self) -> &P {
        &self.production
    }

    pub fn production_mut(&mut self) -> &mut P {
        &mut self.production
    }

    pub fn into_production(self) -> P {
        self.production
    }

    /// The write error which aborted the parse, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn check(&mut self, result: io::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                debug!("serializer write failed: {err}");
                self.error = Some(err);
                false
            }
        }
    }

    fn start_tag(&mut self, start: &PendingStart, is_empty: bool) -> io::Result<()> {
        let has_attributes = start.attributes.values().any(Option::is_some);
        self.production
            .element_start_before_attributes(&start.name, has_attributes, is_empty)?;
        self.production.attributes(&start.attributes)?;
        self.production
            .element_start_after_attributes(&start.name, has_attributes, is_empty)?;
        if is_empty {
            self.production
                .element_end(&start.name, has_attributes, true)?;
        } else {
            self.open_elements.push(has_attributes);
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        match self.pending.take() {
            Some(start) => self.start_tag(&start, false),
            None => Ok(()),
        }
    }

    /// Opens the internal subset before the first declaration in it.
    fn enter_subset(&mut self) -> io::Result<()> {
        let Some(doctype) = self.doctype.as_mut() else {
            return Ok(());
        };
        if doctype.in_subset {
            return Ok(());
        }
        doctype.in_subset = true;
        self.production
            .document_type_declaration_before_internal_subset(
                &doctype.name,
                doctype.public_id.as_deref(),
                doctype.system_id.as_deref(),
                true,
            )?;
        self.production
            .document_type_declaration_internal_subset_start()
    }

    /// Runs a write for a content event, unless inside a data source.
    fn content<F>(&mut self, write: F) -> bool
    where
        F: FnOnce(&mut P) -> io::Result<()>,
    {
        if self.data_source_depth > 0 {
            return true;
        }
        let result = self
            .flush_pending()
            .and_then(|()| self.enter_subset())
            .and_then(|()| write(&mut self.production));
        self.check(result)
    }
}

impl<P: Production> EventHandler for EventSerializer<P> {
    fn document_start(&mut self) -> bool {
        let result = self.production.document_start();
        self.check(result)
    }

    fn xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        let result = self
            .production
            .xml_declaration(version, encoding, standalone);
        self.check(result)
    }

    fn document_type_declaration_start(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.doctype = Some(Doctype {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
            in_subset: false,
        });
        true
    }

    fn document_type_declaration_end(
        &mut self,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        let Some(doctype) = self.doctype.take() else {
            return true;
        };
        let name = &doctype.name;
        let public_id = doctype.public_id.as_deref();
        let system_id = doctype.system_id.as_deref();
        let result = if doctype.in_subset {
            self.production
                .document_type_declaration_internal_subset_end()
                .and_then(|()| {
                    self.production.document_type_declaration_after_internal_subset(
                        name, public_id, system_id, true,
                    )
                })
        } else {
            self.production
                .document_type_declaration_before_internal_subset(
                    name, public_id, system_id, false,
                )
                .and_then(|()| {
                    self.production.document_type_declaration_after_internal_subset(
                        name, public_id, system_id, false,
                    )
                })
        };
        self.check(result)
    }

    fn element_start(
        &mut self,
        name: &str,
        attributes: &mut Attributes,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        if self.data_source_depth > 0 {
            return true;
        }
        let result = self.flush_pending();
        self.pending = Some(PendingStart {
            name: name.to_string(),
            attributes: attributes.clone(),
        });
        self.check(result)
    }

    fn element_end(
        &mut self,
        name: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        if self.data_source_depth > 0 {
            return true;
        }
        let result = match self.pending.take() {
            Some(start) if start.name == name => self.start_tag(&start, true),
            pending => {
                self.pending = pending;
                let has_attributes = self.open_elements.pop().unwrap_or(false);
                self.flush_pending()
                    .and_then(|()| self.production.element_end(name, has_attributes, false))
            }
        };
        self.check(result)
    }

    fn text(
        &mut self,
        text: &str,
        _whitespace: WhitespaceIndicator,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.text(text))
    }

    fn cdata_section(
        &mut self,
        text: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.cdata_section(text))
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: Option<&str>,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.processing_instruction(target, data))
    }

    fn comment(
        &mut self,
        text: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.comment(text))
    }

    fn internal_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.internal_entity_declaration(name, value))
    }

    fn parameter_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.parameter_entity_declaration(name, value))
    }

    fn external_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| {
            production.external_entity_declaration(name, public_id, system_id)
        })
    }

    fn unparsed_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        notation: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| {
            production.unparsed_entity_declaration(name, public_id, system_id, notation)
        })
    }

    fn notation_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.notation_declaration(name, public_id, system_id))
    }

    fn internal_entity(
        &mut self,
        name: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.internal_entity(name))
    }

    fn external_entity(
        &mut self,
        name: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.external_entity(name))
    }

    fn element_declaration(
        &mut self,
        name: &str,
        literal: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.element_declaration(name, literal))
    }

    fn attribute_list_declaration(
        &mut self,
        element_name: &str,
        literal: &str,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.content(|production| production.attribute_list_declaration(element_name, literal))
    }

    fn enter_internal_data_source(&mut self, _data: &[u8], _entity_name: &str) -> bool {
        self.data_source_depth += 1;
        true
    }

    fn leave_internal_data_source(&mut self) -> bool {
        self.data_source_depth = self.data_source_depth.saturating_sub(1);
        true
    }

    fn enter_external_data_source(
        &mut self,
        _data: &[u8],
        _entity_name: Option<&str>,
        _url: Option<&Url>,
    ) -> bool {
        self.data_source_depth += 1;
        true
    }

    fn leave_external_data_source(&mut self) -> bool {
        self.data_source_depth = self.data_source_depth.saturating_sub(1);
        true
    }

    fn document_end(&mut self) -> bool {
        let result = self
            .flush_pending()
            .and_then(|()| self.production.document_end());
        self.check(result)
    }
}

impl<P> std::fmt::Debug for EventSerializer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSerializer")
            .field("pending", &self.pending.as_ref().map(|start| &start.name))
            .field("open_elements", &self.open_elements.len())
            .field("data_source_depth", &self.data_source_depth)
            .field("error", &self.error)
            .finish()
    }
}
