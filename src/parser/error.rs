/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::borrow::Cow;
use std::error::Error;
use std::fmt::Display;

use super::Location;

/// A fatal error of a parse run.
///
/// The error carries a human readable message, and when available the
/// label of the parsed source and the location of the problem. A
/// handler requesting an abort is not an error, see
/// [ParseOutcome](super::ParseOutcome).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    message: Cow<'static, str>,
    source_info: Option<String>,
    location: Option<Location>,
}

impl ParseError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        ParseError {
            message: message.into(),
            source_info: None,
            location: None,
        }
    }

    pub fn at(message: impl Into<Cow<'static, str>>, location: Location) -> Self {
        ParseError {
            message: message.into(),
            source_info: None,
            location: Some(location),
        }
    }

    /// Labels the error with the source it happened in, unless it
    /// already has a label.
    pub fn with_source_info(mut self, source_info: Option<&str>) -> Self {
        if self.source_info.is_none() {
            self.source_info = source_info.map(str::to_string);
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_info(&self) -> Option<&str> {
        self.source_info.as_deref()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.source_info, &self.location) {
            (Some(info), Some(loc)) => {
                write!(f, "{}:{}:{}: {}", info, loc.line, loc.column, self.message)
            }
            (Some(info), None) => write!(f, "{}: {}", info, self.message),
            (None, Some(loc)) => write!(f, "{}:{}: {}", loc.line, loc.column, self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

impl Error for ParseError {}

pub(crate) mod description {
    pub(crate) const UTF8_INVALID: &str = "Document is not valid UTF-8";
    pub(crate) const CHAR_INVALID: &str = "Invalid XML character";
    pub(crate) const DOC_NO_CONTENT: &str = "Document has no root tag";
    pub(crate) const DOC_OPEN_TAGS: &str = "Document has unclosed tags";
    pub(crate) const DOC_OPEN_MARKUP: &str = "Document ends inside of a markup construct";
    pub(crate) const DOC_CDATA_WITHOUT_PARENT: &str =
        "Character data not allowed outside of the root tag";
    pub(crate) const DOC_CDATA_END_IN_TEXT: &str =
        "Character data cannot contain ']]>' outside of a character data section";
    pub(crate) const TAG_OUTSIDE_ROOT: &str = "Tags cannot be outside of the root tag";
    pub(crate) const TAG_EMPTY_NAME: &str = "Tag has no name";
    pub(crate) const TAG_MISMATCH: &str = "Start and end tags have different names";
    pub(crate) const TAG_CLOSE_WITHOUT_OPEN: &str = "Close tag without open";
    pub(crate) const TAG_END_TAG_ATTRIBUTES: &str = "End tag cannot have attributes";
    pub(crate) const TAG_EMPTY_TAG_MISSING_END: &str = "Empty element tags must end after the '/'";
    pub(crate) const TAG_ATTRIBUTE_WITHOUT_EQUAL: &str =
        "Tag attributes must have '=' before the value";
    pub(crate) const TAG_ATTRIBUTE_WITHOUT_QUOTE: &str =
        "Tag attribute value must be double or single quotes";
    pub(crate) const TAG_ATTRIBUTE_BAD_VALUE: &str =
        "Tag value cannot have '<' character without a reference";
    pub(crate) const TAG_ATTRIBUTE_DUPLICATE: &str = "Attribute name already used in this tag";
    pub(crate) const TAG_ATTRIBUTE_MISSING_SPACE: &str =
        "Tag attributes must be separated by whitespace";
    pub(crate) const REFERENCE_UNTERMINATED: &str = "Reference is not terminated with ';'";
    pub(crate) const REFERENCE_INVALID_CHAR: &str = "Character reference is not a valid XML character";
    pub(crate) const REFERENCE_EMPTY_NAME: &str = "Reference has no name";
    pub(crate) const COMMENT_MISSING_END: &str = "Comment tag should end after double dash";
    pub(crate) const MARKUP_CDATA_SECTION_OUTSIDE_ROOT: &str =
        "Character data sections cannot be outside of the root tag";
    pub(crate) const MARKUP_UNRECOGNIZED: &str =
        "Markup is not a comment, character data section, or document type declaration";
    pub(crate) const MARKUP_DOCTYPE_MISPLACED: &str =
        "Document type declaration must come before the root tag";
    pub(crate) const PI_EMPTY_TARGET: &str = "Processing instruction has no target";
    pub(crate) const PI_MISSING_SPACE: &str =
        "Processing instruction target must be followed by whitespace";
    pub(crate) const PI_RESERVED_TARGET: &str =
        "Processing instruction target 'xml' is reserved for the XML declaration";
    pub(crate) const XML_DECLARATION_MISPLACED: &str =
        "XML declaration must be at the start of the document";
    pub(crate) const XML_DECLARATION_NO_VERSION: &str = "XML declaration has no version";
    pub(crate) const XML_DECLARATION_BAD_ATTRIBUTE: &str =
        "XML declaration may only have version, encoding and standalone";
    pub(crate) const DTD_NO_NAME: &str = "Declaration has no name";
    pub(crate) const DTD_MISSING_SPACE: &str = "Declaration parts must be separated by whitespace";
    pub(crate) const DTD_MISSING_END: &str = "Declaration must end with '>'";
    pub(crate) const DTD_BAD_EXTERNAL_ID: &str =
        "External identifier must be 'SYSTEM \"uri\"' or 'PUBLIC \"id\" \"uri\"'";
    pub(crate) const DTD_MISSING_LITERAL: &str = "Quoted literal expected";
    pub(crate) const DTD_MARKUP_UNRECOGNIZED: &str =
        "Internal subset markup is not a recognized declaration";
    pub(crate) const DTD_PARAMETER_REFERENCE: &str =
        "Parameter entity references are not supported in the internal subset";
    pub(crate) const DTD_ENTITY_VALUE_REFERENCE: &str =
        "Entity values can only reference characters and predefined entities";
    pub(crate) const DTD_EXTERNAL_PARAMETER_ENTITY: &str =
        "External parameter entities are not supported";
    pub(crate) const DATA_SOURCE_NOT_ENTERED: &str = "Leaving a data source which was not entered";
    pub(crate) const DATA_SOURCE_INTERLEAVED: &str =
        "Leaving a data source of a different kind than the last entered one";
    pub(crate) const DATA_SOURCE_OPEN: &str = "Data sources are still entered at the end of the parse";
}
