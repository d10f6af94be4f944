/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod range;
mod recorder;
mod whitespace;

use std::collections::HashMap;

use url::Url;

pub use range::DataRange;
pub use range::TextRange;
pub use recorder::Event;
pub use recorder::EventRecorder;
pub use whitespace::WhitespaceIndicator;

/// Attributes of an element start, keyed by attribute name.
///
/// A `None` value stands for an attribute which is declared but has
/// no value set. The order of the map carries no meaning; formatters
/// decide the output order with
/// [sorted_attribute_names()](crate::Formatter::sorted_attribute_names).
pub type Attributes = HashMap<String, Option<String>>;

/// Resolves internal entity references found in attribute values.
///
/// The enclosing attribute and element names are passed when known.
/// Returning `None` means the entity is unresolved. Closures with the
/// same signature implement this trait:
///
/// ```
/// use xmlevents::InternalEntityResolver;
///
/// let resolver = |name: &str, _attribute: Option<&str>, _element: Option<&str>| {
///     (name == "company").then(|| "ACME".to_string())
/// };
/// assert_eq!(resolver.resolve("company", Some("owner"), Some("doc")), Some("ACME".to_string()));
/// assert_eq!(resolver.resolve("other", None, None), None);
/// ```
pub trait InternalEntityResolver {
    fn resolve(
        &self,
        entity_name: &str,
        attribute_name: Option<&str>,
        element_name: Option<&str>,
    ) -> Option<String>;
}

impl<F> InternalEntityResolver for F
where
    F: Fn(&str, Option<&str>, Option<&str>) -> Option<String>,
{
    fn resolve(
        &self,
        entity_name: &str,
        attribute_name: Option<&str>,
        element_name: Option<&str>,
    ) -> Option<String> {
        self(entity_name, attribute_name, element_name)
    }
}

/// Receiver of the parse events of an XML document.
///
/// Every method returns `true` to continue the parse and `false` to
/// abort it. After a `false` no further events are delivered to this
/// handler or to any other handler of the same parse run.
///
/// All methods have a default implementation which ignores the event
/// and continues, so a handler only overrides the events it cares
/// about:
///
/// ```
/// use xmlevents::{DataRange, EventHandler, EventParser, Parser, ParseOutcome, TextRange};
///
/// #[derive(Default)]
/// struct Comments(Vec<String>);
///
/// impl EventHandler for Comments {
///     fn comment(&mut self, text: &str, _: Option<TextRange>, _: Option<DataRange>) -> bool {
///         self.0.push(text.to_string());
///         true
///     }
/// }
///
/// let mut comments = Comments::default();
/// let outcome = EventParser::new()
///     .parse(b"<a><!--one--><b/><!--two--></a>", None, &mut [&mut comments])
///     .unwrap();
/// assert_eq!(outcome, ParseOutcome::Completed);
/// assert_eq!(comments.0, ["one", "two"]);
/// ```
///
/// Text and data ranges are optional on every event. Strings are
/// passed decoded, before any escaping.
#[allow(unused_variables)]
pub trait EventHandler {
    fn document_start(&mut self) -> bool {
        true
    }

    fn xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// Start of the document type declaration.
    ///
    /// This is always followed by a
    /// [document_type_declaration_end()](EventHandler::document_type_declaration_end),
    /// with the declarations of the internal subset (if any) between them.
    fn document_type_declaration_start(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn document_type_declaration_end(
        &mut self,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// Start of an element.
    ///
    /// The handler may rewrite the attributes, e.g. to inject default
    /// values. Handlers later in the list and the parser see the
    /// rewritten map.
    fn element_start(
        &mut self,
        name: &str,
        attributes: &mut Attributes,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn element_end(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// Character data.
    ///
    /// A continuous text in the document may be delivered as several
    /// events, e.g. when interrupted by entity references.
    fn text(
        &mut self,
        text: &str,
        whitespace: WhitespaceIndicator,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn cdata_section(
        &mut self,
        text: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn comment(
        &mut self,
        text: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn internal_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn parameter_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn external_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn unparsed_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        notation: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn notation_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// A reference to an internal entity was found.
    ///
    /// Fired whether or not the parser expands the entity. An expansion
    /// is reported between
    /// [enter_internal_data_source()](EventHandler::enter_internal_data_source)
    /// and [leave_internal_data_source()](EventHandler::leave_internal_data_source).
    fn internal_entity(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    fn external_entity(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// An `<!ELEMENT ...>` declaration, passed through as literal text.
    fn element_declaration(
        &mut self,
        name: &str,
        literal: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// An `<!ATTLIST ...>` declaration, passed through as literal text.
    fn attribute_list_declaration(
        &mut self,
        element_name: &str,
        literal: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        true
    }

    /// The parser switches to the replacement text of an internal entity.
    ///
    /// Data ranges of the following events are relative to `data` until
    /// the matching [leave_internal_data_source()](EventHandler::leave_internal_data_source).
    fn enter_internal_data_source(&mut self, data: &[u8], entity_name: &str) -> bool {
        true
    }

    fn leave_internal_data_source(&mut self) -> bool {
        true
    }

    /// The parser switches to the content of an external entity or
    /// external subset.
    fn enter_external_data_source(
        &mut self,
        data: &[u8],
        entity_name: Option<&str>,
        url: Option<&Url>,
    ) -> bool {
        true
    }

    fn leave_external_data_source(&mut self) -> bool {
        true
    }

    fn document_end(&mut self) -> bool {
        true
    }
}

/// Handler which ignores every event and never aborts.
///
/// Useful as a placeholder main handler, e.g. when only auxiliary
/// handlers of a [ConvenienceParser](crate::ConvenienceParser) are
/// interesting.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEventHandler;

impl EventHandler for DefaultEventHandler {}

#[cfg(test)]
mod tests;
