/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::Attributes;
use crate::DataRange;
use crate::Event;
use crate::EventParser;
use crate::EventRecorder;
use crate::SourceError;
use crate::TextRange;

type Log = Rc<RefCell<Vec<String>>>;

/// Appends "tag:element" to a shared log, aborting at one element.
struct Tagger {
    tag: &'static str,
    log: Log,
    abort_at: Option<&'static str>,
}

impl Tagger {
    fn new(tag: &'static str, log: &Log) -> Self {
        Tagger {
            tag,
            log: log.clone(),
            abort_at: None,
        }
    }
}

impl EventHandler for Tagger {
    fn element_start(
        &mut self,
        name: &str,
        _attributes: &mut Attributes,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        self.log.borrow_mut().push(format!("{}:{}", self.tag, name));
        self.abort_at != Some(name)
    }
}

#[test]
fn main_handler_comes_first() {
    let log = Log::default();
    let mut parser = ConvenienceParser::new(EventParser::new(), Tagger::new("main", &log));
    let mut first = Tagger::new("first", &log);
    let mut second = Tagger::new("second", &log);
    let outcome = parser
        .parse_text("<a><b/></a>", None, &mut [&mut first, &mut second])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Completed);
    assert_eq!(
        *log.borrow(),
        ["main:a", "first:a", "second:a", "main:b", "first:b", "second:b"]
    );
}

#[test]
fn any_abort_ends_the_run() {
    let log = Log::default();
    let mut parser = ConvenienceParser::new(EventParser::new(), Tagger::new("main", &log));
    let mut first = Tagger {
        abort_at: Some("b"),
        ..Tagger::new("first", &log)
    };
    let mut second = Tagger::new("second", &log);
    let outcome = parser
        .parse_text("<a><b/><c/></a>", None, &mut [&mut first, &mut second])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Aborted);
    assert_eq!(
        *log.borrow(),
        ["main:a", "first:a", "second:a", "main:b", "first:b"]
    );

    log.borrow_mut().clear();
    parser.handler_mut().abort_at = Some("a");
    let outcome = parser
        .parse_bytes(b"<a/>", None, &mut [&mut second])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Aborted);
    assert_eq!(*log.borrow(), ["main:a"]);
}

#[test]
fn without_auxiliary_handlers() {
    let mut parser = ConvenienceParser::new(EventParser::new(), EventRecorder::without_ranges());
    let source = DocumentSource::Bytes(b"<only/>".to_vec());
    parser.parse(&source, None, &mut []).unwrap();
    let events = parser.into_handler().into_events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], Event::DocumentStart);
    assert_eq!(events[3], Event::DocumentEnd);
}

#[test]
fn file_sources_label_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<a>\n</b>").unwrap();
    let label = file.path().to_string_lossy().into_owned();

    let mut parser = ConvenienceParser::new(EventParser::new(), EventRecorder::without_ranges());
    match parser.parse_path(file.path(), None, &mut []) {
        Err(Error::Parse(err)) => {
            assert_eq!(err.source_info(), Some(label.as_str()));
            assert_eq!(err.to_string(), format!("{label}:2:5: {}", err.message()));
        }
        other => panic!("unexpected result {other:?}"),
    }

    match parser.parse_path(file.path(), Some("custom"), &mut []) {
        Err(Error::Parse(err)) => assert_eq!(err.source_info(), Some("custom")),
        other => panic!("unexpected result {other:?}"),
    }

    let url = Url::from_file_path(file.path()).unwrap();
    let mut parser = parser.with_path_separator(PathSeparator::Slash);
    assert_eq!(parser.path_separator(), PathSeparator::Slash);
    match parser.parse_url(&url, None, &mut []) {
        Err(Error::Parse(err)) => {
            assert_eq!(err.source_info(), Some(PathSeparator::Slash.render(&label).as_str()))
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn source_errors_come_before_events() {
    let dir = tempfile::tempdir().unwrap();
    let mut parser = ConvenienceParser::new(EventParser::new(), EventRecorder::new());
    let mut auxiliary = EventRecorder::new();
    let result = parser.parse_path(dir.path().join("none.xml"), None, &mut [&mut auxiliary]);
    assert!(matches!(result, Err(Error::Source(SourceError::Io { .. }))));
    assert!(parser.handler().events().is_empty());
    assert!(auxiliary.events().is_empty());
}

#[test]
fn text_and_bytes_agree() {
    let document = "<p class='x'>caf\u{e9}</p>";
    let mut by_text = ConvenienceParser::new(EventParser::new(), EventRecorder::new());
    by_text.parse_text(document, None, &mut []).unwrap();
    let mut by_source = ConvenienceParser::new(EventParser::new(), EventRecorder::new());
    by_source
        .parse(&DocumentSource::Text(document.to_string()), None, &mut [])
        .unwrap();
    assert_eq!(by_text.handler().events(), by_source.handler().events());
}
