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

/// A document source could not be turned into bytes.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{label}: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },
    #[error("URL does not name a local file: {0}")]
    InvalidFileUrl(Url),
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),
    #[cfg(feature = "http")]
    #[error("cannot fetch {url}: {message}")]
    Fetch { url: String, message: String },
}
