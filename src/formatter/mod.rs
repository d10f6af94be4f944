/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::entities::escape_double_quoted_value;
use crate::entities::escape_entity_value;
use crate::entities::escape_text;

/// Converts structural facts of a document into XML text fragments.
///
/// The methods follow the event vocabulary of
/// [EventHandler](crate::EventHandler), but an element start is split
/// into the part before the attributes, one call per attribute, and the
/// part after them, and the caller already knows whether the element
/// is empty. A document type declaration is written in three phases:
///
/// 1. [document_type_declaration_before_internal_subset()](Formatter::document_type_declaration_before_internal_subset)
/// 2. only with an internal subset:
///    [document_type_declaration_internal_subset_start()](Formatter::document_type_declaration_internal_subset_start),
///    the declarations, then
///    [document_type_declaration_internal_subset_end()](Formatter::document_type_declaration_internal_subset_end)
/// 3. [document_type_declaration_after_internal_subset()](Formatter::document_type_declaration_after_internal_subset)
///
/// Every method has a default producing plain XML. Formatters carry no
/// output state, a whole document is the concatenation of the fragments
/// in event order:
///
/// ```
/// use xmlevents::{DefaultFormatter, Formatter};
///
/// let f = DefaultFormatter::new();
/// let mut xml = f.document_start();
/// xml += &f.xml_declaration("1.0", Some("UTF-8"), None);
/// xml += &f.element_start_before_attributes("root", false, true);
/// xml += &f.element_start_after_attributes("root", false, true);
/// xml += &f.element_end("root", false, true);
/// xml += &f.document_end();
/// assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>");
/// ```
#[allow(unused_variables)]
pub trait Formatter {
    fn linebreak(&self) -> &str {
        "\n"
    }

    /// Prefix of each declaration line in the internal subset.
    fn declaration_indentation(&self) -> &str {
        " "
    }

    fn document_start(&self) -> String {
        String::new()
    }

    fn xml_declaration(
        &self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
    ) -> String {
        let mut s = format!("<?xml version=\"{version}\"");
        if let Some(encoding) = encoding {
            s.push_str(&format!(" encoding=\"{encoding}\""));
        }
        if let Some(standalone) = standalone {
            s.push_str(&format!(" standalone=\"{standalone}\""));
        }
        s.push_str("?>");
        s.push_str(self.linebreak());
        s
    }

    fn document_type_declaration_before_internal_subset(
        &self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        has_internal_subset: bool,
    ) -> String {
        format!("<!DOCTYPE {}{}", name, external_id(public_id, system_id))
    }

    fn document_type_declaration_internal_subset_start(&self) -> String {
        format!("{}[{}", self.linebreak(), self.linebreak())
    }

    fn document_type_declaration_internal_subset_end(&self) -> String {
        "]".to_string()
    }

    fn document_type_declaration_after_internal_subset(
        &self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        has_internal_subset: bool,
    ) -> String {
        format!(">{}", self.linebreak())
    }

    fn element_start_before_attributes(
        &self,
        name: &str,
        has_attributes: bool,
        is_empty: bool,
    ) -> String {
        format!("<{name}")
    }

    /// Decides the order in which attributes are written.
    ///
    /// This is the only place where attributes are reordered, the
    /// default is lexicographic order.
    fn sorted_attribute_names<'n>(&self, mut names: Vec<&'n str>) -> Vec<&'n str> {
        names.sort_unstable();
        names
    }

    /// Text of an attribute value, without the surrounding quotes.
    fn attribute_value(&self, value: &str) -> String {
        escape_double_quoted_value(value).into_owned()
    }

    fn attribute(&self, name: &str, value: &str) -> String {
        format!(" {}=\"{}\"", name, self.attribute_value(value))
    }

    fn element_start_after_attributes(
        &self,
        name: &str,
        has_attributes: bool,
        is_empty: bool,
    ) -> String {
        if is_empty {
            "/>".to_string()
        } else {
            ">".to_string()
        }
    }

    /// End tag of an element, nothing for an empty element since its
    /// start tag was already closed.
    fn element_end(&self, name: &str, has_attributes: bool, is_empty: bool) -> String {
        if is_empty {
            String::new()
        } else {
            format!("</{name}>")
        }
    }

    fn text(&self, text: &str) -> String {
        escape_text(text).into_owned()
    }

    fn cdata_section(&self, text: &str) -> String {
        format!("<![CDATA[{text}]]>")
    }

    fn processing_instruction(&self, target: &str, data: Option<&str>) -> String {
        match data {
            Some(data) => format!("<?{target} {data}?>"),
            None => format!("<?{target}?>"),
        }
    }

    fn comment(&self, text: &str) -> String {
        format!("<!--{text}-->")
    }

    fn internal_entity_declaration(&self, name: &str, value: &str) -> String {
        format!(
            "{}<!ENTITY {} \"{}\">{}",
            self.declaration_indentation(),
            name,
            escape_entity_value(value),
            self.linebreak()
        )
    }

    fn parameter_entity_declaration(&self, name: &str, value: &str) -> String {
        format!(
            "{}<!ENTITY % {} \"{}\">{}",
            self.declaration_indentation(),
            name,
            escape_entity_value(value),
            self.linebreak()
        )
    }

    fn external_entity_declaration(
        &self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
    ) -> String {
        format!(
            "{}<!ENTITY {}{}>{}",
            self.declaration_indentation(),
            name,
            external_id(public_id, Some(system_id)),
            self.linebreak()
        )
    }

    fn unparsed_entity_declaration(
        &self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        notation: &str,
    ) -> String {
        format!(
            "{}<!ENTITY {}{} NDATA {}>{}",
            self.declaration_indentation(),
            name,
            external_id(public_id, Some(system_id)),
            notation,
            self.linebreak()
        )
    }

    fn notation_declaration(
        &self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> String {
        format!(
            "{}<!NOTATION {}{}>{}",
            self.declaration_indentation(),
            name,
            external_id(public_id, system_id),
            self.linebreak()
        )
    }

    fn internal_entity(&self, name: &str) -> String {
        format!("&{name};")
    }

    fn external_entity(&self, name: &str) -> String {
        format!("&{name};")
    }

    /// The element declaration is passed through as written.
    fn element_declaration(&self, name: &str, literal: &str) -> String {
        format!(
            "{}{}{}",
            self.declaration_indentation(),
            literal,
            self.linebreak()
        )
    }

    fn attribute_list_declaration(&self, element_name: &str, literal: &str) -> String {
        format!(
            "{}{}{}",
            self.declaration_indentation(),
            literal,
            self.linebreak()
        )
    }

    fn document_end(&self) -> String {
        String::new()
    }
}

/// Quotes a system or public literal, with single quotes if the
/// literal contains a double quote.
fn quoted(literal: &str) -> String {
    if literal.contains('"') {
        format!("'{literal}'")
    } else {
        format!("\"{literal}\"")
    }
}

/// The external identifier with a leading space, empty if there is none.
fn external_id(public_id: Option<&str>, system_id: Option<&str>) -> String {
    match (public_id, system_id) {
        (Some(public_id), Some(system_id)) => {
            format!(" PUBLIC {} {}", quoted(public_id), quoted(system_id))
        }
        (Some(public_id), None) => format!(" PUBLIC {}", quoted(public_id)),
        (None, Some(system_id)) => format!(" SYSTEM {}", quoted(system_id)),
        (None, None) => String::new(),
    }
}

/// The formatter with default output and configurable whitespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefaultFormatter {
    linebreak: String,
    declaration_indentation: String,
}

impl DefaultFormatter {
    pub fn new() -> Self {
        DefaultFormatter {
            linebreak: "\n".to_string(),
            declaration_indentation: " ".to_string(),
        }
    }

    pub fn set_linebreak(&mut self, linebreak: impl Into<String>) {
        self.linebreak = linebreak.into();
    }

    pub fn set_declaration_indentation(&mut self, indentation: impl Into<String>) {
        self.declaration_indentation = indentation.into();
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        DefaultFormatter::new()
    }
}

impl Formatter for DefaultFormatter {
    fn linebreak(&self) -> &str {
        &self.linebreak
    }

    fn declaration_indentation(&self) -> &str {
        &self.declaration_indentation
    }
}
