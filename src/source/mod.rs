/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Document sources and their resolution to a byte buffer.

mod error;

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use url::Url;

pub use error::SourceError;

/// Where the bytes of a document come from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentSource {
    /// A `file:` URL, or with the `http` feature an HTTP(S) URL.
    Url(Url),
    /// A file system path.
    Path(PathBuf),
    /// The document text itself, parsed as its UTF-8 encoding.
    Text(String),
    /// Raw document bytes.
    Bytes(Vec<u8>),
}

impl From<Url> for DocumentSource {
    fn from(url: Url) -> Self {
        DocumentSource::Url(url)
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::Path(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        DocumentSource::Path(path.to_path_buf())
    }
}

impl From<String> for DocumentSource {
    fn from(text: String) -> Self {
        DocumentSource::Text(text)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

/// Separator used when a file location is rendered as a label.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSeparator {
    Slash,
    Backslash,
}

impl PathSeparator {
    /// The separator of the platform this crate was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            PathSeparator::Backslash
        } else {
            PathSeparator::Slash
        }
    }

    pub fn as_char(self) -> char {
        match self {
            PathSeparator::Slash => '/',
            PathSeparator::Backslash => '\\',
        }
    }

    /// Rewrites every separator of `path` to this one.
    ///
    /// ```
    /// use xmlevents::PathSeparator;
    ///
    /// assert_eq!(PathSeparator::Backslash.render("/data/doc.xml"), "\\data\\doc.xml");
    /// assert_eq!(PathSeparator::Slash.render("C:\\doc.xml"), "C:/doc.xml");
    /// ```
    pub fn render(self, path: &str) -> String {
        let separator = self.as_char().to_string();
        path.replace(['/', '\\'], &separator)
    }
}

impl Default for PathSeparator {
    fn default() -> Self {
        PathSeparator::native()
    }
}

/// The bytes of a document source, with the label to report it by.
///
/// Borrowed sources are not copied. Data read from a file or fetched
/// from a URL is owned, and released when this value is dropped.
#[derive(Debug)]
pub struct ResolvedSource<'a> {
    data: Cow<'a, [u8]>,
    label: Option<String>,
}

impl ResolvedSource<'_> {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Default diagnostic label, the path or URL for sources which
    /// have one.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl DocumentSource {
    /// Reads the source into memory.
    pub fn resolve(&self, separator: PathSeparator) -> Result<ResolvedSource<'_>, SourceError> {
        let resolved = match self {
            DocumentSource::Text(text) => ResolvedSource {
                data: Cow::Borrowed(text.as_bytes()),
                label: None,
            },
            DocumentSource::Bytes(bytes) => ResolvedSource {
                data: Cow::Borrowed(bytes),
                label: None,
            },
            DocumentSource::Path(path) => {
                let label = path.to_string_lossy().into_owned();
                ResolvedSource {
                    data: Cow::Owned(read_file(path, &label)?),
                    label: Some(label),
                }
            }
            DocumentSource::Url(url) => resolve_url(url, separator)?,
        };
        debug!(
            "resolved document source {} ({} bytes)",
            resolved.label().unwrap_or("<memory>"),
            resolved.data.len()
        );
        Ok(resolved)
    }
}

fn read_file(path: &Path, label: &str) -> Result<Vec<u8>, SourceError> {
    std::fs::read(path).map_err(|source| SourceError::Io {
        label: label.to_string(),
        source,
    })
}

fn resolve_url(url: &Url, separator: PathSeparator) -> Result<ResolvedSource<'static>, SourceError> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| SourceError::InvalidFileUrl(url.clone()))?;
            let label = separator.render(&path.to_string_lossy());
            Ok(ResolvedSource {
                data: Cow::Owned(read_file(&path, &label)?),
                label: Some(label),
            })
        }
        #[cfg(feature = "http")]
        "http" | "https" => Ok(ResolvedSource {
            data: Cow::Owned(fetch(url)?),
            label: Some(url.to_string()),
        }),
        scheme => Err(SourceError::UnsupportedScheme(scheme.to_string())),
    }
}

#[cfg(feature = "http")]
fn fetch(url: &Url) -> Result<Vec<u8>, SourceError> {
    use std::io::Read;

    let fetch_error = |message: String| SourceError::Fetch {
        url: url.to_string(),
        message,
    };
    let response = ureq::get(url.as_str())
        .call()
        .map_err(|err| fetch_error(err.to_string()))?;
    let mut buf = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut buf)
        .map_err(|err| fetch_error(err.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests;
