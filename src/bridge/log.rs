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

use crate::LogState;
use crate::Severity;
use crate::diagnostic::LogContext;
use crate::record::Record;
use crate::scope::CALL_SITE_PROPERTY;
use crate::scope::ELAPSED_PROPERTY;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogState::global().is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let state = LogState::global();
        let level = Severity::from(record.level());
        if !state.gate().is_enabled(level) {
            return;
        }
        let logger = state.logger();
        if !logger.enabled(level) {
            return;
        }

        // records from the facade have no scope: the target stands in for the call site
        let _call_site = LogContext::push_property(CALL_SITE_PROPERTY, record.target().to_string());
        let _elapsed = LogContext::push_property(ELAPSED_PROPERTY, "<1ms");

        let mut properties = vec![];
        let mut visitor = KeyValueVisitor {
            properties: &mut properties,
        };
        // a failing source only loses its remaining key-values
        let _ = record.key_values().visit(&mut visitor);

        let message = record.args().to_string();
        let template = match record.args().as_str() {
            Some(template) => template,
            None => message.as_str(),
        };
        let record = Record::builder()
            .level(level)
            .target(record.target())
            .template(template)
            .message(message.as_str())
            .properties(&properties)
            .build();
        logger.log(&record);
    }

    fn flush(&self) {
        LogState::global().flush();
    }
}

struct KeyValueVisitor<'a> {
    properties: &'a mut Vec<(String, String)>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.properties.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to forward every record of the `log` facade into the
/// active sink of [`LogState::global`], subject to the same minimum severity as scoped records.
/// The record's target is rendered in place of the call site.
///
/// The maximum level of the `log` crate is set to `Trace`; filtering happens in the gate.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// let _ = logscope::bridge::try_setup_log_crate();
/// logscope::builder().apply();
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logscope::bridge::setup_log_crate();
/// logscope::builder().apply();
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logscope::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    #[test]
    fn test_enabled_does_not_set_up_the_default_sink() {
        let logger = LogCrateLogger(());
        let info = log::Metadata::builder()
            .level(log::Level::Info)
            .target("orders")
            .build();
        let trace = log::Metadata::builder()
            .level(log::Level::Trace)
            .target("orders")
            .build();

        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&trace));
        assert!(!LogState::global().is_initialized());
    }
}
