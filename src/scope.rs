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

//! Scopes timing a unit of work and emitting records on its behalf.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crate::LogState;
use crate::Logger;
use crate::ScopeIdentity;
use crate::Severity;
use crate::diagnostic::LogContext;
use crate::elapsed::format_elapsed;
use crate::record::Record;
use crate::template;

/// Context property holding `<identity>.<caller>`.
pub const CALL_SITE_PROPERTY: &str = "CallSite";
/// Context property holding the elapsed bucket of the emitting scope.
pub const ELAPSED_PROPERTY: &str = "Elapsed";
/// Context property holding the caller name; attached to error and fatal records only.
pub const METHOD_PROPERTY: &str = "Method";

/// The caller name used when none is given.
pub const UNKNOWN_CALLER: &str = "<unknown>";

/// A logical unit of work whose start time and identity anchor every record emitted through it.
///
/// A scope is opened at the start of the work and closed when dropped, on every exit path
/// including unwinding. If in/out tracing is on, opening emits `[I] Entering <caller>` and
/// dropping emits `[O] Exiting <caller>`, both at information level.
///
/// Every record carries the context properties `CallSite` (`<identity>.<caller>`) and `Elapsed`
/// (see [`format_elapsed`]); error and fatal records also carry `Method` (the caller name). The
/// properties are pushed right before the record is handed to the sink and popped right after.
///
/// Nothing is rendered, and no producer closure is called, for a severity that the gate or the
/// sink rejects.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use logscope::LogScope;
/// use logscope::LogState;
/// use logscope::ScopeIdentity;
/// use logscope::append::Memory;
///
/// static BIZ_LOGIC: ScopeIdentity = ScopeIdentity::from_static("MyApplication.BizLogic");
///
/// let state = LogState::new();
/// let memory = Memory::default();
/// state.install(logscope::builder().dispatch(|d| d.append(memory.clone())).build());
///
/// {
///     let scope = LogScope::open_in(&state, &BIZ_LOGIC, "execute");
///     scope.info_with("Processing execute request for a total of {0} items.", &[&408]);
///     scope.warning_over_time(Duration::from_secs(3600), "Too slow!");
/// }
///
/// let records = memory.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(
///     records[0].message(),
///     "Processing execute request for a total of 408 items."
/// );
/// assert_eq!(
///     records[0].property("CallSite"),
///     Some("MyApplication.BizLogic.execute")
/// );
/// ```
pub struct LogScope<'a> {
    state: &'a LogState,
    identity: &'a ScopeIdentity,
    caller: String,
    call_site: String,
    start: Instant,
}

impl fmt::Debug for LogScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogScope")
            .field("call_site", &self.call_site)
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

impl<'a> LogScope<'a> {
    /// Open a scope against the process-wide [`LogState`].
    ///
    /// `caller` names the operation the scope covers; [`log_scope!`](crate::log_scope) fills it
    /// with the enclosing function's name.
    pub fn open(identity: &'a ScopeIdentity, caller: &str) -> LogScope<'a> {
        LogScope::open_in(LogState::global(), identity, caller)
    }

    /// Open a scope against `state`.
    ///
    /// One leading `.` is stripped from `caller`; an empty caller becomes `<unknown>`. If the
    /// state has no sink yet, the default one is set up.
    pub fn open_in(state: &'a LogState, identity: &'a ScopeIdentity, caller: &str) -> LogScope<'a> {
        let caller = caller.strip_prefix('.').unwrap_or(caller);
        let caller = if caller.is_empty() {
            UNKNOWN_CALLER.to_string()
        } else {
            caller.to_string()
        };
        let call_site = format!("{}.{caller}", identity.name());

        // first use of a state triggers the default sink set up
        let _ = state.logger();

        let scope = LogScope {
            state,
            identity,
            caller,
            call_site,
            start: Instant::now(),
        };
        if state.in_out_enabled() {
            scope.info(&format!("[I] Entering {}", scope.caller));
        }
        scope
    }

    /// The time since the scope was opened.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The identity the scope was opened with.
    pub fn identity(&self) -> &ScopeIdentity {
        self.identity
    }

    /// The caller name, as attached to records.
    pub fn caller_name(&self) -> &str {
        &self.caller
    }

    /// The `<identity>.<caller>` string attached to records.
    pub fn call_site(&self) -> &str {
        &self.call_site
    }

    // both the gate and the sink must accept the severity
    fn enabled_logger(&self, level: Severity) -> Option<Arc<Logger>> {
        if !self.state.gate().is_enabled(level) {
            return None;
        }
        let logger = self.state.logger();
        logger.enabled(level).then_some(logger)
    }

    fn emit(&self, logger: &Logger, level: Severity, template: &str, args: &[&dyn fmt::Display]) {
        let _call_site = LogContext::push_property(CALL_SITE_PROPERTY, self.call_site.clone());
        let _method = matches!(level, Severity::Error | Severity::Fatal)
            .then(|| LogContext::push_property(METHOD_PROPERTY, self.caller.clone()));
        let _elapsed = LogContext::push_property(ELAPSED_PROPERTY, format_elapsed(self.elapsed()));

        let rendered = template::render(template, args);
        let record = Record::builder()
            .level(level)
            .target(&self.call_site)
            .template(template)
            .message(rendered.text)
            .properties(&rendered.properties)
            .build();
        logger.log(&record);
    }

    fn emit_produced<T, A, I>(&self, logger: &Logger, level: Severity, template: T, args: A)
    where
        T: FnOnce() -> String,
        A: FnOnce() -> I,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let template = template();
        let args = args().into_iter().collect::<Vec<_>>();
        let args = args
            .iter()
            .map(|arg| arg as &dyn fmt::Display)
            .collect::<Vec<_>>();
        self.emit(logger, level, &template, &args);
    }

    /// Emit a record of `level`.
    pub fn log(&self, level: Severity, template: &str) {
        if let Some(logger) = self.enabled_logger(level) {
            self.emit(&logger, level, template, &[]);
        }
    }

    /// Emit a record of `level`, filling the template holes with `args`.
    ///
    /// See [`template`](crate::template) for the hole syntax.
    pub fn log_with(&self, level: Severity, template: &str, args: &[&dyn fmt::Display]) {
        if let Some(logger) = self.enabled_logger(level) {
            self.emit(&logger, level, template, args);
        }
    }

    /// Emit a record of `level` if `predicate` returns `true`.
    ///
    /// The predicate is called exactly once, before the severity is checked.
    pub fn log_when(&self, level: Severity, predicate: impl FnOnce() -> bool, template: &str) {
        if predicate() {
            self.log(level, template);
        }
    }

    /// Emit a record of `level` if `predicate` returns `true`.
    ///
    /// The template and arguments are produced only if the record is emitted.
    pub fn log_when_with<T, A, I>(
        &self,
        level: Severity,
        predicate: impl FnOnce() -> bool,
        template: T,
        args: A,
    ) where
        T: FnOnce() -> String,
        A: FnOnce() -> I,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        if !predicate() {
            return;
        }
        if let Some(logger) = self.enabled_logger(level) {
            self.emit_produced(&logger, level, template, args);
        }
    }

    /// Emit a record of `level` if strictly more than `deadline` has passed since the scope was
    /// opened.
    ///
    /// The comparison is strict, so a zero deadline right after opening may not pass on a
    /// platform whose monotonic clock has not ticked yet.
    pub fn log_over_time(&self, level: Severity, deadline: Duration, template: &str) {
        if self.elapsed() > deadline {
            self.log(level, template);
        }
    }

    /// Emit a record of `level` if strictly more than `deadline` has passed since the scope was
    /// opened.
    ///
    /// The template and arguments are produced only if the record is emitted.
    pub fn log_over_time_with<T, A, I>(&self, level: Severity, deadline: Duration, template: T, args: A)
    where
        T: FnOnce() -> String,
        A: FnOnce() -> I,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        if self.elapsed() <= deadline {
            return;
        }
        if let Some(logger) = self.enabled_logger(level) {
            self.emit_produced(&logger, level, template, args);
        }
    }
}

macro_rules! severity_methods {
    (
        $level:expr, $name:literal,
        $plain:ident, $with:ident, $when:ident, $when_with:ident, $over:ident, $over_with:ident
    ) => {
        #[doc = concat!("Emit a ", $name, " record.")]
        pub fn $plain(&self, template: &str) {
            self.log($level, template);
        }

        #[doc = concat!("Emit a ", $name, " record, filling the template holes with `args`.")]
        pub fn $with(&self, template: &str, args: &[&dyn fmt::Display]) {
            self.log_with($level, template, args);
        }

        #[doc = concat!("Emit a ", $name, " record if `predicate` returns `true`.")]
        pub fn $when(&self, predicate: impl FnOnce() -> bool, template: &str) {
            self.log_when($level, predicate, template);
        }

        #[doc = concat!(
            "Emit a ", $name, " record if `predicate` returns `true`, producing the template ",
            "and arguments only if the record is emitted."
        )]
        pub fn $when_with<T, A, I>(&self, predicate: impl FnOnce() -> bool, template: T, args: A)
        where
            T: FnOnce() -> String,
            A: FnOnce() -> I,
            I: IntoIterator,
            I::Item: fmt::Display,
        {
            self.log_when_with($level, predicate, template, args);
        }

        #[doc = concat!(
            "Emit a ", $name, " record if strictly more than `deadline` has passed since the ",
            "scope was opened."
        )]
        pub fn $over(&self, deadline: Duration, template: &str) {
            self.log_over_time($level, deadline, template);
        }

        #[doc = concat!(
            "Emit a ", $name, " record if strictly more than `deadline` has passed since the ",
            "scope was opened, producing the template and arguments only if the record is emitted."
        )]
        pub fn $over_with<T, A, I>(&self, deadline: Duration, template: T, args: A)
        where
            T: FnOnce() -> String,
            A: FnOnce() -> I,
            I: IntoIterator,
            I::Item: fmt::Display,
        {
            self.log_over_time_with($level, deadline, template, args);
        }
    };
}

impl LogScope<'_> {
    severity_methods!(
        Severity::Verbose, "verbose",
        verbose, verbose_with, verbose_when, verbose_when_with, verbose_over_time,
        verbose_over_time_with
    );
    severity_methods!(
        Severity::Debug, "debug",
        debug, debug_with, debug_when, debug_when_with, debug_over_time, debug_over_time_with
    );
    severity_methods!(
        Severity::Information, "information",
        info, info_with, info_when, info_when_with, info_over_time, info_over_time_with
    );
    severity_methods!(
        Severity::Warning, "warning",
        warning, warning_with, warning_when, warning_when_with, warning_over_time,
        warning_over_time_with
    );
    severity_methods!(
        Severity::Error, "error",
        error, error_with, error_when, error_when_with, error_over_time, error_over_time_with
    );
    severity_methods!(
        Severity::Fatal, "fatal",
        fatal, fatal_with, fatal_when, fatal_when_with, fatal_over_time, fatal_over_time_with
    );
}

impl Drop for LogScope<'_> {
    fn drop(&mut self) {
        if self.state.in_out_enabled() {
            self.info(&format!("[O] Exiting {}", self.caller));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::append::Memory;
    use crate::filter::GateFilter;

    static COMPONENT: ScopeIdentity = ScopeIdentity::from_static("Orders.Service");

    fn memory_state() -> (LogState, Memory) {
        let state = LogState::new();
        let memory = Memory::default();
        state.install(
            crate::builder()
                .dispatch(|d| {
                    d.filter(GateFilter::new(state.gate().clone()))
                        .append(memory.clone())
                })
                .build(),
        );
        (state, memory)
    }

    #[test]
    fn test_caller_name_normalization() {
        let (state, _memory) = memory_state();

        let scope = LogScope::open_in(&state, &COMPONENT, ".ctor");
        assert_eq!(scope.caller_name(), "ctor");
        assert_eq!(scope.call_site(), "Orders.Service.ctor");

        let scope = LogScope::open_in(&state, &COMPONENT, "..twice");
        assert_eq!(scope.caller_name(), ".twice");

        let scope = LogScope::open_in(&state, &COMPONENT, "");
        assert_eq!(scope.caller_name(), UNKNOWN_CALLER);
        assert_eq!(scope.identity().name(), "Orders.Service");
    }

    #[test]
    fn test_context_is_popped_after_emission() {
        let (state, memory) = memory_state();
        let depth = LogContext::depth();

        let scope = LogScope::open_in(&state, &COMPONENT, "submit");
        scope.info("plain");
        scope.error("broken");
        assert_eq!(LogContext::depth(), depth);

        let records = memory.records();
        assert_eq!(records[0].property(METHOD_PROPERTY), None);
        assert_eq!(records[1].property(METHOD_PROPERTY), Some("submit"));
        for record in &records {
            assert_eq!(record.property(CALL_SITE_PROPERTY), Some("Orders.Service.submit"));
            assert!(record.property(ELAPSED_PROPERTY).is_some());
        }
    }

    #[test]
    fn test_producers_are_not_called_when_gated_out() {
        let (state, memory) = memory_state();
        let scope = LogScope::open_in(&state, &COMPONENT, "gated");
        let produced = Cell::new(0);
        let produce_template = || {
            produced.set(produced.get() + 1);
            "{0}".to_string()
        };

        scope.debug_when_with(|| true, produce_template, || [1]);
        scope.verbose_over_time_with(Duration::ZERO, produce_template, || [2]);
        assert_eq!(produced.get(), 0);
        assert!(memory.is_empty());

        scope.info_when_with(|| false, produce_template, || [3]);
        assert_eq!(produced.get(), 0);

        scope.info_when_with(|| true, produce_template, || [4]);
        assert_eq!(produced.get(), 1);
        assert_eq!(memory.messages(), vec!["4".to_string()]);
    }

    #[test]
    fn test_predicate_called_once_even_when_gated_out() {
        let (state, memory) = memory_state();
        let scope = LogScope::open_in(&state, &COMPONENT, "predicate");
        let calls = Cell::new(0);

        scope.verbose_when(
            || {
                calls.set(calls.get() + 1);
                true
            },
            "never",
        );
        assert_eq!(calls.get(), 1);
        assert!(memory.is_empty());
    }
}
