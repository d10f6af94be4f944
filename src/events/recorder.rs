/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use url::Url;

use super::Attributes;
use super::DataRange;
use super::EventHandler;
use super::TextRange;
use super::WhitespaceIndicator;

/// An owned copy of one event of the [EventHandler] vocabulary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    DocumentStart,
    XmlDeclaration {
        version: String,
        encoding: Option<String>,
        standalone: Option<String>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    DocumentTypeDeclarationStart {
        name: String,
        public_id: Option<String>,
        system_id: Option<String>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    DocumentTypeDeclarationEnd {
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ElementStart {
        name: String,
        attributes: Attributes,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ElementEnd {
        name: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    Text {
        text: String,
        whitespace: WhitespaceIndicator,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    CDataSection {
        text: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ProcessingInstruction {
        target: String,
        data: Option<String>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    Comment {
        text: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    InternalEntityDeclaration {
        name: String,
        value: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ParameterEntityDeclaration {
        name: String,
        value: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ExternalEntityDeclaration {
        name: String,
        public_id: Option<String>,
        system_id: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    UnparsedEntityDeclaration {
        name: String,
        public_id: Option<String>,
        system_id: String,
        notation: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    NotationDeclaration {
        name: String,
        public_id: Option<String>,
        system_id: Option<String>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    InternalEntity {
        name: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ExternalEntity {
        name: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    ElementDeclaration {
        name: String,
        literal: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    AttributeListDeclaration {
        element_name: String,
        literal: String,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    },
    EnterInternalDataSource {
        data: Vec<u8>,
        entity_name: String,
    },
    LeaveInternalDataSource,
    EnterExternalDataSource {
        data: Vec<u8>,
        entity_name: Option<String>,
        url: Option<Url>,
    },
    LeaveExternalDataSource,
    DocumentEnd,
}

impl Event {
    /// Delivers this event to a handler and returns its decision.
    ///
    /// An [Event::ElementStart] is passed with its own attribute map,
    /// so the rewrites of the handler are visible in `self` afterwards.
    pub fn replay(&mut self, handler: &mut dyn EventHandler) -> bool {
        match self {
            Event::DocumentStart => handler.document_start(),
            Event::XmlDeclaration {
                version,
                encoding,
                standalone,
                text_range,
                data_range,
            } => handler.xml_declaration(
                version,
                encoding.as_deref(),
                standalone.as_deref(),
                *text_range,
                *data_range,
            ),
            Event::DocumentTypeDeclarationStart {
                name,
                public_id,
                system_id,
                text_range,
                data_range,
            } => handler.document_type_declaration_start(
                name,
                public_id.as_deref(),
                system_id.as_deref(),
                *text_range,
                *data_range,
            ),
            Event::DocumentTypeDeclarationEnd {
                text_range,
                data_range,
            } => handler.document_type_declaration_end(*text_range, *data_range),
            Event::ElementStart {
                name,
                attributes,
                text_range,
                data_range,
            } => handler.element_start(name, attributes, *text_range, *data_range),
            Event::ElementEnd {
                name,
                text_range,
                data_range,
            } => handler.element_end(name, *text_range, *data_range),
            Event::Text {
                text,
                whitespace,
                text_range,
                data_range,
            } => handler.text(text, *whitespace, *text_range, *data_range),
            Event::CDataSection {
                text,
                text_range,
                data_range,
            } => handler.cdata_section(text, *text_range, *data_range),
            Event::ProcessingInstruction {
                target,
                data,
                text_range,
                data_range,
            } => handler.processing_instruction(target, data.as_deref(), *text_range, *data_range),
            Event::Comment {
                text,
                text_range,
                data_range,
            } => handler.comment(text, *text_range, *data_range),
            Event::InternalEntityDeclaration {
                name,
                value,
                text_range,
                data_range,
            } => handler.internal_entity_declaration(name, value, *text_range, *data_range),
            Event::ParameterEntityDeclaration {
                name,
                value,
                text_range,
                data_range,
            } => handler.parameter_entity_declaration(name, value, *text_range, *data_range),
            Event::ExternalEntityDeclaration {
                name,
                public_id,
                system_id,
                text_range,
                data_range,
            } => handler.external_entity_declaration(
                name,
                public_id.as_deref(),
                system_id,
                *text_range,
                *data_range,
            ),
            Event::UnparsedEntityDeclaration {
                name,
                public_id,
                system_id,
                notation,
                text_range,
                data_range,
            } => handler.unparsed_entity_declaration(
                name,
                public_id.as_deref(),
                system_id,
                notation,
                *text_range,
                *data_range,
            ),
            Event::NotationDeclaration {
                name,
                public_id,
                system_id,
                text_range,
                data_range,
            } => handler.notation_declaration(
                name,
                public_id.as_deref(),
                system_id.as_deref(),
                *text_range,
                *data_range,
            ),
            Event::InternalEntity {
                name,
                text_range,
                data_range,
            } => handler.internal_entity(name, *text_range, *data_range),
            Event::ExternalEntity {
                name,
                text_range,
                data_range,
            } => handler.external_entity(name, *text_range, *data_range),
            Event::ElementDeclaration {
                name,
                literal,
                text_range,
                data_range,
            } => handler.element_declaration(name, literal, *text_range, *data_range),
            Event::AttributeListDeclaration {
                element_name,
                literal,
                text_range,
                data_range,
            } => handler.attribute_list_declaration(element_name, literal, *text_range, *data_range),
            Event::EnterInternalDataSource { data, entity_name } => {
                handler.enter_internal_data_source(data, entity_name)
            }
            Event::LeaveInternalDataSource => handler.leave_internal_data_source(),
            Event::EnterExternalDataSource {
                data,
                entity_name,
                url,
            } => handler.enter_external_data_source(data, entity_name.as_deref(), url.as_ref()),
            Event::LeaveExternalDataSource => handler.leave_external_data_source(),
            Event::DocumentEnd => handler.document_end(),
        }
    }

    /// Replays a sequence of events, stopping at the first abort.
    ///
    /// Returns `false` if the handler aborted.
    pub fn replay_all(events: &mut [Event], handler: &mut dyn EventHandler) -> bool {
        events.iter_mut().all(|event| event.replay(handler))
    }
}

/// Handler which keeps an owned copy of every event it receives.
///
/// It can be configured to drop the text and data ranges, which keeps
/// expected event lists in tests short.
#[derive(Clone, Debug)]
pub struct EventRecorder {
    events: Vec<Event>,
    keep_ranges: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        EventRecorder {
            events: Vec::new(),
            keep_ranges: true,
        }
    }

    /// Creates a recorder which stores `None` instead of the ranges.
    pub fn without_ranges() -> Self {
        EventRecorder {
            events: Vec::new(),
            keep_ranges: false,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn ranges(
        &self,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> (Option<TextRange>, Option<DataRange>) {
        if self.keep_ranges {
            (text_range, data_range)
        } else {
            (None, None)
        }
    }

    fn push(&mut self, event: Event) -> bool {
        self.events.push(event);
        true
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for EventRecorder {
    fn document_start(&mut self) -> bool {
        self.push(Event::DocumentStart)
    }

    fn xml_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::XmlDeclaration {
            version: version.to_string(),
            encoding: encoding.map(str::to_string),
            standalone: standalone.map(str::to_string),
            text_range,
            data_range,
        })
    }

    fn document_type_declaration_start(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::DocumentTypeDeclarationStart {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
            text_range,
            data_range,
        })
    }

    fn document_type_declaration_end(
        &mut self,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::DocumentTypeDeclarationEnd {
            text_range,
            data_range,
        })
    }

    fn element_start(
        &mut self,
        name: &str,
        attributes: &mut Attributes,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ElementStart {
            name: name.to_string(),
            attributes: attributes.clone(),
            text_range,
            data_range,
        })
    }

    fn element_end(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ElementEnd {
            name: name.to_string(),
            text_range,
            data_range,
        })
    }

    fn text(
        &mut self,
        text: &str,
        whitespace: WhitespaceIndicator,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::Text {
            text: text.to_string(),
            whitespace,
            text_range,
            data_range,
        })
    }

    fn cdata_section(
        &mut self,
        text: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::CDataSection {
            text: text.to_string(),
            text_range,
            data_range,
        })
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ProcessingInstruction {
            target: target.to_string(),
            data: data.map(str::to_string),
            text_range,
            data_range,
        })
    }

    fn comment(
        &mut self,
        text: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::Comment {
            text: text.to_string(),
            text_range,
            data_range,
        })
    }

    fn internal_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::InternalEntityDeclaration {
            name: name.to_string(),
            value: value.to_string(),
            text_range,
            data_range,
        })
    }

    fn parameter_entity_declaration(
        &mut self,
        name: &str,
        value: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ParameterEntityDeclaration {
            name: name.to_string(),
            value: value.to_string(),
            text_range,
            data_range,
        })
    }

    fn external_entity_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ExternalEntityDeclaration {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.to_string(),
            text_range,
            data_range,
        })
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
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::UnparsedEntityDeclaration {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.to_string(),
            notation: notation.to_string(),
            text_range,
            data_range,
        })
    }

    fn notation_declaration(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::NotationDeclaration {
            name: name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
            text_range,
            data_range,
        })
    }

    fn internal_entity(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::InternalEntity {
            name: name.to_string(),
            text_range,
            data_range,
        })
    }

    fn external_entity(
        &mut self,
        name: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ExternalEntity {
            name: name.to_string(),
            text_range,
            data_range,
        })
    }

    fn element_declaration(
        &mut self,
        name: &str,
        literal: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::ElementDeclaration {
            name: name.to_string(),
            literal: literal.to_string(),
            text_range,
            data_range,
        })
    }

    fn attribute_list_declaration(
        &mut self,
        element_name: &str,
        literal: &str,
        text_range: Option<TextRange>,
        data_range: Option<DataRange>,
    ) -> bool {
        let (text_range, data_range) = self.ranges(text_range, data_range);
        self.push(Event::AttributeListDeclaration {
            element_name: element_name.to_string(),
            literal: literal.to_string(),
            text_range,
            data_range,
        })
    }

    fn enter_internal_data_source(&mut self, data: &[u8], entity_name: &str) -> bool {
        self.push(Event::EnterInternalDataSource {
            data: data.to_vec(),
            entity_name: entity_name.to_string(),
        })
    }

    fn leave_internal_data_source(&mut self) -> bool {
        self.push(Event::LeaveInternalDataSource)
    }

    fn enter_external_data_source(
        &mut self,
        data: &[u8],
        entity_name: Option<&str>,
        url: Option<&Url>,
    ) -> bool {
        self.push(Event::EnterExternalDataSource {
            data: data.to_vec(),
            entity_name: entity_name.map(str::to_string),
            url: url.cloned(),
        })
    }

    fn leave_external_data_source(&mut self) -> bool {
        self.push(Event::LeaveExternalDataSource)
    }

    fn document_end(&mut self) -> bool {
        self.push(Event::DocumentEnd)
    }
}
