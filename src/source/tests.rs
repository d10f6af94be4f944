/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn memory_sources_borrow() {
    let text = DocumentSource::from("<a/>".to_string());
    let resolved = text.resolve(PathSeparator::Slash).unwrap();
    assert_eq!(resolved.data(), b"<a/>");
    assert_eq!(resolved.label(), None);
    assert!(matches!(resolved.data, Cow::Borrowed(_)));

    let bytes = DocumentSource::from(b"<b/>".to_vec());
    let resolved = bytes.resolve(PathSeparator::Slash).unwrap();
    assert_eq!(resolved.data(), b"<b/>");
    assert_eq!(resolved.label(), None);
}

#[test]
fn path_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<doc>path</doc>").unwrap();

    let source = DocumentSource::from(file.path());
    let resolved = source.resolve(PathSeparator::native()).unwrap();
    assert_eq!(resolved.data(), b"<doc>path</doc>");
    assert_eq!(resolved.label(), Some(&*file.path().to_string_lossy()));
}

#[test]
fn file_url_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<doc>url</doc>").unwrap();
    let url = Url::from_file_path(file.path()).unwrap();

    let source = DocumentSource::from(url);
    let resolved = source.resolve(PathSeparator::Slash).unwrap();
    assert_eq!(resolved.data(), b"<doc>url</doc>");
    let label = resolved.label().unwrap();
    assert!(!label.contains('\\'));

    let resolved = source.resolve(PathSeparator::Backslash).unwrap();
    let label = resolved.label().unwrap();
    assert!(!label.contains('/'));
    assert!(label.ends_with(&*file.path().file_name().unwrap().to_string_lossy()));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xml");
    let err = DocumentSource::from(path.clone())
        .resolve(PathSeparator::Slash)
        .unwrap_err();
    match &err {
        SourceError::Io { label, source } => {
            assert_eq!(label, &path.to_string_lossy());
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().starts_with(&*path.to_string_lossy()));
}

#[test]
fn unsupported_urls() {
    let url = Url::parse("ftp://example.org/doc.xml").unwrap();
    match DocumentSource::Url(url).resolve(PathSeparator::Slash) {
        Err(SourceError::UnsupportedScheme(scheme)) => assert_eq!(scheme, "ftp"),
        other => panic!("unexpected result {other:?}"),
    }

    #[cfg(not(windows))]
    {
        let url = Url::parse("file://remote.example.org/doc.xml").unwrap();
        assert!(matches!(
            DocumentSource::Url(url).resolve(PathSeparator::Slash),
            Err(SourceError::InvalidFileUrl(_))
        ));
    }
}

#[test]
fn separators() {
    assert_eq!(PathSeparator::Slash.render("a\\b/c"), "a/b/c");
    assert_eq!(PathSeparator::Backslash.render("a\\b/c"), "a\\b\\c");
    assert_eq!(PathSeparator::default(), PathSeparator::native());
    if cfg!(windows) {
        assert_eq!(PathSeparator::native().as_char(), '\\');
    } else {
        assert_eq!(PathSeparator::native().as_char(), '/');
    }
}
