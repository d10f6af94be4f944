/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use pretty_assertions::assert_eq;

use super::*;
use crate::Event;
use crate::EventHandler;
use crate::EventParser;
use crate::ParseOutcome;
use crate::Parser;
use crate::WhitespaceIndicator;

fn serialize(document: &str) -> String {
    let mut serializer = EventSerializer::new(DefaultProduction::new(Vec::new()));
    let outcome = EventParser::new()
        .parse(document.as_bytes(), None, &mut [&mut serializer])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Completed);
    assert!(serializer.take_error().is_none());
    String::from_utf8(serializer.into_production().into_inner()).unwrap()
}

#[test]
fn round_trip() {
    let document = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!DOCTYPE doc\n",
        "[\n",
        " <!ENTITY company \"ACME &amp; Co\">\n",
        " <!ENTITY logo SYSTEM \"logo.xml\">\n",
        " <!NOTATION gif PUBLIC \"image/gif\">\n",
        " <!ELEMENT doc (#PCDATA|b)*>\n",
        " <!ATTLIST doc a CDATA #IMPLIED>\n",
        "]>\n",
        "<doc a=\"1\" b=\"x &quot;y&quot;\">Hi &company;<b/>&logo;",
        "<![CDATA[<raw>]]><!--c--><?pi data?></doc>",
    );
    assert_eq!(serialize(document), document);
}

#[test]
fn entity_value_references_survive() {
    let document = concat!(
        "<!DOCTYPE r\n",
        "[\n",
        " <!ENTITY a \"x\">\n",
        " <!ENTITY b \"&#38;a; &amp; 100&#37; &#60;\">\n",
        "]>\n",
        "<r>&a;</r>",
    );
    assert_eq!(serialize(document), document);

    let mut serializer = EventSerializer::new(DefaultProduction::new(Vec::new()));
    let err = EventParser::new()
        .parse(
            b"<!DOCTYPE r [<!ENTITY a 'x'><!ENTITY c '&a;'>]><r/>",
            None,
            &mut [&mut serializer],
        )
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Entity values can only reference characters and predefined entities"
    );
}

#[test]
fn normalizes_markup() {
    assert_eq!(
        serialize("<!DOCTYPE r SYSTEM 'r.dtd'><r z = 'a\"b' a='&#65;' ><e></e ><f> </f></r>"),
        "<!DOCTYPE r SYSTEM \"r.dtd\">\n<r a=\"A\" z=\"a&quot;b\"><e/><f> </f></r>"
    );
}

#[test]
fn minimal_document() {
    let mut production = DefaultProduction::new(Vec::new());
    production.document_start().unwrap();
    production.xml_declaration("1.0", Some("UTF-8"), None).unwrap();
    production
        .element_start_before_attributes("root", false, true)
        .unwrap();
    production
        .element_start_after_attributes("root", false, true)
        .unwrap();
    production.element_end("root", false, true).unwrap();
    production.document_end().unwrap();
    assert_eq!(
        production.into_inner(),
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>"
    );
}

#[test]
fn attributes_in_formatter_order() {
    let mut production = DefaultProduction::new(Vec::new());
    let attributes = Attributes::from([
        ("b".to_string(), Some("2".to_string())),
        ("unset".to_string(), None),
        ("a".to_string(), Some("<1>".to_string())),
    ]);
    production.attributes(&attributes).unwrap();
    assert_eq!(production.get_ref(), b" a=\"&lt;1>\" b=\"2\"");
}

#[test]
fn custom_formatter_and_sink() {
    let mut formatter = DefaultFormatter::new();
    formatter.set_linebreak("\r\n");
    let mut production = DefaultProduction::with_formatter(Vec::new(), formatter);
    production.xml_declaration("1.0", None, None).unwrap();
    production.formatter_mut().set_linebreak("|");
    production.xml_declaration("1.1", None, None).unwrap();
    let first = production.set_sink(Vec::new());
    assert_eq!(
        first,
        b"<?xml version=\"1.0\"?>\r\n<?xml version=\"1.1\"?>|"
    );
    production.comment("x").unwrap();
    production.flush().unwrap();
    assert_eq!(production.into_inner(), b"<!--x-->");
}

#[test]
fn entity_content_is_not_repeated() {
    let mut events = vec![
        Event::DocumentStart,
        Event::ElementStart {
            name: "a".to_string(),
            attributes: Attributes::new(),
            text_range: None,
            data_range: None,
        },
        Event::InternalEntity {
            name: "e".to_string(),
            text_range: None,
            data_range: None,
        },
        Event::EnterInternalDataSource {
            data: b"<i>expanded</i>".to_vec(),
            entity_name: "e".to_string(),
        },
        Event::ElementStart {
            name: "i".to_string(),
            attributes: Attributes::new(),
            text_range: None,
            data_range: None,
        },
        Event::Text {
            text: "expanded".to_string(),
            whitespace: WhitespaceIndicator::NotWhitespace,
            text_range: None,
            data_range: None,
        },
        Event::ElementEnd {
            name: "i".to_string(),
            text_range: None,
            data_range: None,
        },
        Event::LeaveInternalDataSource,
        Event::ElementEnd {
            name: "a".to_string(),
            text_range: None,
            data_range: None,
        },
        Event::DocumentEnd,
    ];
    let mut serializer = EventSerializer::new(DefaultProduction::new(Vec::new()));
    assert!(Event::replay_all(&mut events, &mut serializer));
    assert_eq!(serializer.production().get_ref(), b"<a>&e;</a>");
}

/// Collects fragments instead of writing bytes.
#[derive(Default)]
struct Fragments {
    formatter: DefaultFormatter,
    fragments: Vec<String>,
}

impl Production for Fragments {
    fn formatter(&self) -> &dyn Formatter {
        &self.formatter
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        if !text.is_empty() {
            self.fragments.push(text.to_string());
        }
        Ok(())
    }
}

#[test]
fn doctype_phases() {
    let mut serializer = EventSerializer::new(Fragments::default());
    EventParser::new()
        .parse(b"<!DOCTYPE a><a/>", None, &mut [&mut serializer])
        .unwrap();
    assert_eq!(
        serializer.production().fragments,
        ["<!DOCTYPE a", ">\n", "<a", "/>"]
    );

    let mut serializer = EventSerializer::new(Fragments::default());
    EventParser::new()
        .parse(
            b"<!DOCTYPE a [<!ENTITY e 'v'>]><a/>",
            None,
            &mut [&mut serializer],
        )
        .unwrap();
    assert_eq!(
        serializer.production().fragments,
        [
            "<!DOCTYPE a",
            "\n[\n",
            " <!ENTITY e \"v\">\n",
            "]",
            ">\n",
            "<a",
            "/>"
        ]
    );
}

struct BrokenSink;

impl io::Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_errors_abort() {
    let mut serializer = EventSerializer::new(DefaultProduction::new(BrokenSink));
    let outcome = EventParser::new()
        .parse(b"<a><b/></a>", None, &mut [&mut serializer])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Aborted);
    let err = serializer.take_error().unwrap();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(serializer.take_error().is_none());
}

#[test]
fn serializer_is_a_plain_handler() {
    let mut serializer = EventSerializer::new(DefaultProduction::new(Vec::new()));
    let handler: &mut dyn EventHandler = &mut serializer;
    assert!(handler.element_start("x", &mut Attributes::new(), None, None));
    assert!(handler.document_end());
    assert_eq!(serializer.production().get_ref(), b"<x>");
}
