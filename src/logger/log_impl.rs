// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Append;
use crate::Diagnostic;
use crate::Error;
use crate::Filter;
use crate::Severity;
use crate::Trap;
use crate::filter::FilterResult;
use crate::record::Record;

/// A sink that dispatches log records to one or more dispatches.
///
/// Errors raised by appenders never reach the caller of [`Logger::log`]; they are handed to the
/// logger's [`Trap`].
#[derive(Debug)]
pub struct Logger {
    dispatches: Vec<Dispatch>,
    trap: Box<dyn Trap>,
}

impl Logger {
    pub(super) fn new(dispatches: Vec<Dispatch>, trap: Box<dyn Trap>) -> Self {
        Self { dispatches, trap }
    }

    /// Determine if a record of this severity would be processed by any dispatch.
    pub fn enabled(&self, level: Severity) -> bool {
        self.dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(level))
    }

    /// Log the record.
    pub fn log(&self, record: &Record) {
        for dispatch in &self.dispatches {
            for err in dispatch.log(record) {
                let err = Error::new("failed to append record")
                    .with_context("level", record.level().code())
                    .with_context("message", record.message())
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    /// Flush any buffered records.
    pub fn flush(&self) {
        for dispatch in &self.dispatches {
            for err in dispatch.flush() {
                let err = Error::new("failed to flush appender").with_source(err);
                self.trap.trap(&err);
            }
        }
    }
}

/// A grouped set of appenders, filters, and optional diagnostics.
///
/// The [`Logger`] facade dispatches log records to one or more [`Dispatch`] instances.
/// Each [`Dispatch`] instance contains a set of filters, appenders, and diagnostics.
///
/// `filters` are used to determine whether a log record should be passed to the appenders.
/// `appends` are used to write log records to a destination.
/// `diagnostics` are used to enrich log records with ambient context.
#[derive(Debug)]
pub(super) struct Dispatch {
    filters: Vec<Box<dyn Filter>>,
    diagnostics: Vec<Box<dyn Diagnostic>>,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    pub(super) fn new(
        filters: Vec<Box<dyn Filter>>,
        diagnostics: Vec<Box<dyn Diagnostic>>,
        appends: Vec<Box<dyn Append>>,
    ) -> Self {
        debug_assert!(
            !appends.is_empty(),
            "A Dispatch must have at least one append"
        );

        Self {
            filters,
            diagnostics,
            appends,
        }
    }

    fn enabled(&self, level: Severity) -> bool {
        let diagnostics = &self.diagnostics;

        for filter in &self.filters {
            match filter.enabled(level, diagnostics) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    // one failing appender does not keep the record from the others
    fn log(&self, record: &Record) -> Vec<Error> {
        let diagnostics = &self.diagnostics;

        for filter in &self.filters {
            match filter.matches(record, diagnostics) {
                FilterResult::Reject => return vec![],
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        self.appends
            .iter()
            .filter_map(|append| append.append(record, diagnostics).err())
            .collect()
    }

    fn flush(&self) -> Vec<Error> {
        self.appends
            .iter()
            .filter_map(|append| append.flush().err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::append::Memory;
    use crate::filter::MinSeverity;

    #[derive(Debug)]
    struct FailingAppend;

    impl Append for FailingAppend {
        fn append(&self, _: &Record, _: &[Box<dyn Diagnostic>]) -> Result<(), Error> {
            Err(Error::new("disk on fire"))
        }

        fn flush(&self) -> Result<(), Error> {
            Err(Error::new("still on fire"))
        }
    }

    #[derive(Debug, Clone, Default)]
    struct CollectTrap(Arc<Mutex<Vec<String>>>);

    impl Trap for CollectTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.to_string());
        }
    }

    #[test]
    fn test_enabled_if_any_dispatch_accepts() {
        let logger = crate::builder()
            .dispatch(|d| d.filter(MinSeverity(Severity::Error)).append(Memory::default()))
            .dispatch(|d| d.filter(MinSeverity(Severity::Warning)).append(Memory::default()))
            .build();

        assert!(!logger.enabled(Severity::Information));
        assert!(logger.enabled(Severity::Warning));
        assert!(logger.enabled(Severity::Fatal));
    }

    #[test]
    fn test_append_errors_go_to_the_trap() {
        let trap = CollectTrap::default();
        let memory = Memory::default();
        let logger = crate::builder()
            .trap(trap.clone())
            .dispatch(|d| d.append(FailingAppend).append(memory.clone()))
            .build();

        logger.log(&Record::builder().message("still delivered").build());
        logger.flush();

        assert_eq!(memory.messages(), vec!["still delivered".to_string()]);
        let trapped = trap.0.lock().unwrap();
        assert_eq!(trapped.len(), 2);
        assert!(trapped[0].contains("failed to append record"));
        assert!(trapped[0].contains("disk on fire"));
        assert!(trapped[1].contains("still on fire"));
    }
}
