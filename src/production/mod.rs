/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod serializer;

use std::io;
use std::io::Write;

pub use serializer::EventSerializer;

use crate::Attributes;
use crate::DefaultFormatter;
use crate::Formatter;

/// Writes the output of a [Formatter] to a sink.
///
/// Each method formats one fragment with the matching formatter method
/// and writes it out immediately, in call order. Implementors provide
/// the formatter and [write()](Production::write).
pub trait Production {
    fn formatter(&self) -> &dyn Formatter;

    fn write(&mut self, text: &str) -> io::Result<()>;

    fn document_start(&mut self) -> io::Result<()> {
        let text = self.formatter().document_start();
        self.write(&text)
    }

    fn xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .xml_declaration(version, encoding, standalone);
        self.write(&text)
    }

    fn document_type_declaration_before_internal_subset(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        has_internal_subset: bool,
    ) -> io::Result<()> {
        let text = self.formatter().document_type_declaration_before_internal_subset(
            name,
            public_id,
            system_id,
            has_internal_subset,
        );
        self.write(&text)
    }

    fn document_type_declaration_internal_subset_start(&mut self) -> io::Result<()> {
        let text = self
            .formatter()
            .document_type_declaration_internal_subset_start();
        self.write(&text)
    }

    fn document_type_declaration_internal_subset_end(&mut self) -> io::Result<()> {
        let text = self
            .formatter()
            .document_type_declaration_internal_subset_end();
        self.write(&text)
    }

    fn document_type_declaration_after_internal_subset(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        has_internal_subset: bool,
    ) -> io::Result<()> {
        let text = self.formatter().document_type_declaration_after_internal_subset(
            name,
            public_id,
            system_id,
            has_internal_subset,
        );
        self.write(&text)
    }

    fn element_start_before_attributes(
        &mut self,
        name: &str,
        has_attributes: bool,
        is_empty: bool,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .element_start_before_attributes(name, has_attributes, is_empty);
        self.write(&text)
    }

    fn attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        let text = self.formatter().attribute(name, value);
        self.write(&text)
    }

    /// Writes all attributes which have a value, in the order given by
    /// [sorted_attribute_names()](Formatter::sorted_attribute_names).
    fn attributes(&mut self, attributes: &Attributes) -> io::Result<()> {
        let names: Vec<&str> = attributes
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(name, _)| name.as_str())
            .collect();
        let names = self.formatter().sorted_attribute_names(names);
        for name in names {
            if let Some(Some(value)) = attributes.get(name) {
                self.attribute(name, value)?;
            }
        }
        Ok(())
    }

    fn element_start_after_attributes(
        &mut self,
        name: &str,
        has_attributes: bool,
        is_empty: bool,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .element_start_after_attributes(name, has_attributes, is_empty);
        self.write(&text)
    }

    fn element_end(&mut self, name: &str, has_attributes: bool, is_empty: bool) -> io::Result<()> {
        let text = self.formatter().element_end(name, has_attributes, is_empty);
        self.write(&text)
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        let text = self.formatter().text(text);
        self.write(&text)
    }

    fn cdata_section(&mut self, text: &str) -> io::Result<()> {
        let text = self.formatter().cdata_section(text);
        self.write(&text)
    }

    fn processing_instruction(&mut self, target: &str, data: Option<&str>) -> io::Result<()> {
        let text = self.formatter().processing_instruction(target, data);
        self.write(&text)
    }

    fn comment(&mut self, text: &str) -> io::Result<()> {
        let text = self.formatter().comment(text);
        self.write(&text)
    }

    fn internal_entity_declaration(&mut self, name: &str, value: &str) -> io::Result<()> {
        let text = self.formatter().internal_entity_declaration(name, value);
        self.write(&text)
    }

    fn parameter_entity_declaration(&mut self, name: &str, value: &str) -> io::Result<()> {
        let text = self.formatter().parameter_entity_declaration(name, value);
        self.write(&text)
    }

    fn external_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .external_entity_declaration(name, public_id, system_id);
        self.write(&text)
    }

    fn unparsed_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        notation: &str,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .unparsed_entity_declaration(name, public_id, system_id, notation);
        self.write(&text)
    }

    fn notation_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> io::Result<()> {
        let text = self
            .formatter()
            .notation_declaration(name, public_id, system_id);
        self.write(&text)
    }

    fn internal_entity(&mut self, name: &str) -> io::Result<()> {
        let text = self.formatter().internal_entity(name);
        self.write(&text)
    }

    fn external_entity(&mut self, name: &str) -> io::Result<()> {
        let text = self.formatter().external_entity(name);
        self.write(&text)
    }

    fn element_declaration(&mut self, name: &str, literal: &str) -> io::Result<()> {
        let text = self.formatter().element_declaration(name, literal);
        self.write(&text)
    }

    fn attribute_list_declaration(&mut self, element_name: &str, literal: &str) -> io::Result<()> {
        let text = self
            .formatter()
            .attribute_list_declaration(element_name, literal);
        self.write(&text)
    }

    fn document_end(&mut self) -> io::Result<()> {
        let text = self.formatter().document_end();
        self.write(&text)
    }
}

/// A [Production] writing UTF-8 text to any [Write] sink.
///
/// ```
/// use xmlevents::{DefaultProduction, Production};
///
/// let mut production = DefaultProduction::new(Vec::new());
/// production.element_start_before_attributes("p", false, false).unwrap();
/// production.element_start_after_attributes("p", false, false).unwrap();
/// production.text("1 < 2").unwrap();
/// production.element_end("p", false, false).unwrap();
/// assert_eq!(production.into_inner(), b"<p>1 &lt; 2</p>");
/// ```
#[derive(Debug)]
pub struct DefaultProduction<W, F = DefaultFormatter> {
    sink: W,
    formatter: F,
}

impl<W: Write> DefaultProduction<W> {
    pub fn new(sink: W) -> Self {
        DefaultProduction {
            sink,
            formatter: DefaultFormatter::new(),
        }
    }
}

impl<W: Write, F: Formatter> DefaultProduction<W, F> {
    pub fn with_formatter(sink: W, formatter: F) -> Self {
        DefaultProduction { sink, formatter }
    }

    /// Replaces the sink and returns the previous one.
    pub fn set_sink(&mut self, sink: W) -> W {
        std::mem::replace(&mut self.sink, sink)
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn formatter_mut(&mut self) -> &mut F {
        &mut self.formatter
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write, F: Formatter> Production for DefaultProduction<W, F> {
    fn formatter(&self) -> &dyn Formatter {
        &self.formatter
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.sink.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests;
