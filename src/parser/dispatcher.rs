/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use log::debug;
use log::trace;
use url::Url;

use super::ParseError;
use super::ParseOutcome;
use super::error::description;
use crate::EventHandler;

/// Kind of a data source entered during the parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataSourceKind {
    Internal,
    External,
}

/// Delivers the events of one parse run to an ordered list of handlers.
///
/// Each event goes to the handlers in list order. When a handler
/// returns `false` the event is not passed to the rest of the list,
/// and every later dispatch is refused, so a [Parser](super::Parser)
/// implementation only has to stop when a dispatch returns `false`.
///
/// The dispatcher also keeps the stack of entered data sources and
/// rejects a leave event which does not match the last enter event.
pub struct Dispatcher<'a, 'h> {
    handlers: &'a mut [&'h mut dyn EventHandler],
    aborted: bool,
    data_sources: Vec<DataSourceKind>,
}

impl<'a, 'h> Dispatcher<'a, 'h> {
    pub fn new(handlers: &'a mut [&'h mut dyn EventHandler]) -> Self {
        Dispatcher {
            handlers,
            aborted: false,
            data_sources: Vec::new(),
        }
    }

    /// Passes one event to all handlers in order.
    ///
    /// Returns `false` if a handler aborted the run now or earlier.
    pub fn dispatch<F>(&mut self, mut event: F) -> bool
    where
        F: FnMut(&mut dyn EventHandler) -> bool,
    {
        if self.aborted {
            return false;
        }
        for (index, handler) in self.handlers.iter_mut().enumerate() {
            if !event(&mut **handler) {
                debug!("event handler #{index} aborted the parse");
                self.aborted = true;
                return false;
            }
        }
        true
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn outcome(&self) -> ParseOutcome {
        if self.aborted {
            ParseOutcome::Aborted
        } else {
            ParseOutcome::Completed
        }
    }

    pub fn nr_handlers(&self) -> usize {
        self.handlers.len()
    }

    /// Number of data sources entered and not yet left.
    pub fn data_source_depth(&self) -> usize {
        self.data_sources.len()
    }

    pub fn enter_internal_data_source(&mut self, data: &[u8], entity_name: &str) -> bool {
        self.data_sources.push(DataSourceKind::Internal);
        trace!(
            "entering internal entity '{}' ({} bytes, depth {})",
            entity_name,
            data.len(),
            self.data_sources.len()
        );
        self.dispatch(|handler| handler.enter_internal_data_source(data, entity_name))
    }

    pub fn leave_internal_data_source(&mut self) -> Result<bool, ParseError> {
        self.pop_data_source(DataSourceKind::Internal)?;
        Ok(self.dispatch(|handler| handler.leave_internal_data_source()))
    }

    pub fn enter_external_data_source(
        &mut self,
        data: &[u8],
        entity_name: Option<&str>,
        url: Option<&Url>,
    ) -> bool {
        self.data_sources.push(DataSourceKind::External);
        trace!(
            "entering external data source {:?} ({} bytes, depth {})",
            entity_name,
            data.len(),
            self.data_sources.len()
        );
        self.dispatch(|handler| handler.enter_external_data_source(data, entity_name, url))
    }

    pub fn leave_external_data_source(&mut self) -> Result<bool, ParseError> {
        self.pop_data_source(DataSourceKind::External)?;
        Ok(self.dispatch(|handler| handler.leave_external_data_source()))
    }

    fn pop_data_source(&mut self, kind: DataSourceKind) -> Result<(), ParseError> {
        match self.data_sources.last() {
            None => Err(ParseError::new(description::DATA_SOURCE_NOT_ENTERED)),
            Some(top) if *top != kind => Err(ParseError::new(description::DATA_SOURCE_INTERLEAVED)),
            Some(_) => {
                self.data_sources.pop();
                trace!("left {:?} data source", kind);
                Ok(())
            }
        }
    }

    /// Checks that every entered data source was left.
    pub fn finish(&self) -> Result<(), ParseError> {
        if self.data_sources.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(description::DATA_SOURCE_OPEN))
        }
    }
}

impl std::fmt::Debug for Dispatcher<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .field("aborted", &self.aborted)
            .field("data_sources", &self.data_sources)
            .finish()
    }
}
