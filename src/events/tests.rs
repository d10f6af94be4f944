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

fn sample_events() -> Vec<Event> {
    vec![
        Event::DocumentStart,
        Event::ElementStart {
            name: "root".to_string(),
            attributes: Attributes::from([("id".to_string(), Some("1".to_string()))]),
            text_range: Some(TextRange::new(1, 1, 1, 11)),
            data_range: Some(DataRange::new(0, 11)),
        },
        Event::Text {
            text: "hi".to_string(),
            whitespace: WhitespaceIndicator::NotWhitespace,
            text_range: None,
            data_range: None,
        },
        Event::ElementEnd {
            name: "root".to_string(),
            text_range: None,
            data_range: None,
        },
        Event::DocumentEnd,
    ]
}

struct DefaultInjector;

impl EventHandler for DefaultInjector {
    fn element_start(
        &mut self,
        _name: &str,
        attributes: &mut Attributes,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        attributes
            .entry("lang".to_string())
            .or_insert_with(|| Some("en".to_string()));
        true
    }
}

struct StopAtText;

impl EventHandler for StopAtText {
    fn text(
        &mut self,
        _text: &str,
        _whitespace: WhitespaceIndicator,
        _text_range: Option<TextRange>,
        _data_range: Option<DataRange>,
    ) -> bool {
        false
    }
}

#[test]
fn default_handler_continues() {
    let mut events = sample_events();
    let mut handler = DefaultEventHandler;
    assert!(Event::replay_all(&mut events, &mut handler));

    let mut attributes = Attributes::new();
    assert!(handler.element_start("x", &mut attributes, None, None));
    assert!(handler.enter_internal_data_source(b"text", "ent"));
    assert!(handler.leave_internal_data_source());
    assert!(handler.enter_external_data_source(b"", None, None));
    assert!(handler.leave_external_data_source());
    assert!(attributes.is_empty());
}

#[test]
fn recorder_keeps_events_in_order() {
    let mut events = sample_events();
    let mut recorder = EventRecorder::new();
    assert!(Event::replay_all(&mut events, &mut recorder));
    assert_eq!(recorder.events(), events.as_slice());
    assert_eq!(recorder.into_events(), sample_events());
}

#[test]
fn recorder_without_ranges() {
    let mut events = sample_events();
    let mut recorder = EventRecorder::without_ranges();
    assert!(Event::replay_all(&mut events, &mut recorder));
    let recorded = recorder.take_events();
    assert_eq!(
        recorded[1],
        Event::ElementStart {
            name: "root".to_string(),
            attributes: Attributes::from([("id".to_string(), Some("1".to_string()))]),
            text_range: None,
            data_range: None,
        }
    );
    assert!(recorder.events().is_empty());
}

#[test]
fn element_start_attributes_are_rewritable() {
    let mut events = sample_events();
    assert!(Event::replay_all(&mut events, &mut DefaultInjector));
    match &events[1] {
        Event::ElementStart { attributes, .. } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes["lang"].as_deref(), Some("en"));
            assert_eq!(attributes["id"].as_deref(), Some("1"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn replay_stops_at_abort() {
    let mut events = sample_events();
    let mut handler = StopAtText;
    assert!(!Event::replay_all(&mut events, &mut handler));
    assert!(events[0].replay(&mut handler));
    assert!(!events[2].replay(&mut handler));
}

#[test]
fn data_source_events_are_recorded() {
    let url = Url::parse("file:///tmp/chapter.xml").unwrap();
    let mut recorder = EventRecorder::new();
    assert!(recorder.enter_external_data_source(b"<p/>", Some("chapter"), Some(&url)));
    assert!(recorder.enter_internal_data_source(b"x", "inner"));
    assert!(recorder.leave_internal_data_source());
    assert!(recorder.leave_external_data_source());
    assert_eq!(
        recorder.events(),
        [
            Event::EnterExternalDataSource {
                data: b"<p/>".to_vec(),
                entity_name: Some("chapter".to_string()),
                url: Some(url.clone()),
            },
            Event::EnterInternalDataSource {
                data: b"x".to_vec(),
                entity_name: "inner".to_string(),
            },
            Event::LeaveInternalDataSource,
            Event::LeaveExternalDataSource,
        ]
    );
}

#[test]
fn closure_resolver() {
    let resolver = |name: &str, attribute: Option<&str>, element: Option<&str>| {
        Some(format!("{name}/{}/{}", attribute.unwrap_or("-"), element.unwrap_or("-")))
    };
    assert_eq!(
        resolver.resolve("e", Some("a"), None),
        Some("e/a/-".to_string())
    );
}
