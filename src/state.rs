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

use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::RwLock;

use crate::Error;
use crate::Logger;
use crate::Severity;
use crate::SeverityGate;
use crate::SinkConfig;
use crate::TraceSwitch;
use crate::Trap;
use crate::append::Stderr;
use crate::filter::GateFilter;
use crate::trap::DefaultTrap;

static GLOBAL: LazyLock<LogState> = LazyLock::new(LogState::new);

/// The runtime controls and the active sink shared by every scope.
///
/// Most programs use the process-wide instance returned by [`LogState::global`]. Tests, or
/// components wanting their own sink, can own a separate instance and open scopes against it.
///
/// # Examples
///
/// ```
/// use logscope::LogState;
/// use logscope::Severity;
/// use logscope::append::Memory;
/// use logscope::filter::GateFilter;
///
/// let state = LogState::new();
/// let memory = Memory::default();
/// state.install(
///     logscope::builder()
///         .dispatch(|d| d.filter(GateFilter::new(state.gate().clone())).append(memory.clone()))
///         .build(),
/// );
///
/// state.set_minimum_level(Severity::Warning);
/// assert!(!state.is_enabled(Severity::Information));
/// assert!(state.is_enabled(Severity::Error));
/// ```
#[derive(Debug)]
pub struct LogState {
    gate: Arc<SeverityGate>,
    in_out: TraceSwitch,
    sink: RwLock<Option<Arc<Logger>>>,
}

impl Default for LogState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogState {
    /// Create a state with the default minimum severity, in/out tracing off, and no sink yet.
    pub fn new() -> Self {
        Self {
            gate: Arc::new(SeverityGate::default()),
            in_out: TraceSwitch::new(false),
            sink: RwLock::new(None),
        }
    }

    /// The process-wide state.
    pub fn global() -> &'static LogState {
        &GLOBAL
    }

    /// Replace the active sink with one built from `config`.
    ///
    /// The minimum severity of the gate is set to `config.minimum_severity`.
    ///
    /// # Errors
    ///
    /// Return an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if the
    /// configuration is invalid, or an error if the log file cannot be created. The active sink
    /// is left untouched on error.
    pub fn setup(&self, config: &SinkConfig) -> Result<(), Error> {
        let logger = config.build_logger(self.gate.clone())?;
        self.gate.set_minimum(config.minimum_severity);
        self.install(logger);
        Ok(())
    }

    /// Replace the active sink with `logger`. The previous sink is flushed.
    ///
    /// Use a [`GateFilter`] over [`LogState::gate`] in the logger's dispatches so that the sink
    /// follows the runtime minimum severity.
    pub fn install(&self, logger: Logger) {
        let previous = {
            let mut sink = self.sink.write().unwrap_or_else(|e| e.into_inner());
            sink.replace(Arc::new(logger))
        };
        if let Some(previous) = previous {
            previous.flush();
        }
    }

    /// Whether a sink has been set up or installed.
    pub fn is_initialized(&self) -> bool {
        self.installed().is_some()
    }

    /// The active sink, without setting up the default one.
    pub fn installed(&self) -> Option<Arc<Logger>> {
        self.sink
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The active sink.
    ///
    /// On first use without a prior setup, a sink is built from [`SinkConfig::production`]. If
    /// that fails, the error goes to the [`DefaultTrap`] and records are written to stderr
    /// instead.
    pub fn logger(&self) -> Arc<Logger> {
        if let Some(logger) = self.installed() {
            return logger;
        }

        let mut sink = self.sink.write().unwrap_or_else(|e| e.into_inner());
        // another thread may have won the race for the write lock
        if let Some(logger) = sink.as_ref() {
            return logger.clone();
        }

        let logger = match SinkConfig::production().build_logger(self.gate.clone()) {
            Ok(logger) => logger,
            Err(err) => {
                let err = Error::new("failed to set up the default sink; falling back to stderr")
                    .with_source(err);
                DefaultTrap::default().trap(&err);
                crate::builder()
                    .dispatch(|d| {
                        d.filter(GateFilter::new(self.gate.clone()))
                            .append(Stderr::default())
                    })
                    .build()
            }
        };
        sink.insert(Arc::new(logger)).clone()
    }

    /// The gate holding the runtime minimum severity.
    pub fn gate(&self) -> &Arc<SeverityGate> {
        &self.gate
    }

    /// Change the minimum severity at runtime.
    ///
    /// Return `false` if the minimum was already `level`, in which case nothing changes.
    pub fn set_minimum_level(&self, level: Severity) -> bool {
        self.gate.set_minimum(level)
    }

    /// The current minimum severity.
    pub fn minimum_level(&self) -> Severity {
        self.gate.minimum()
    }

    /// Toggle the `[I] Entering` / `[O] Exiting` records of every scope.
    pub fn set_in_out_enabled(&self, enabled: bool) {
        self.in_out.set_enabled(enabled);
    }

    /// Whether scopes emit entry and exit records.
    pub fn in_out_enabled(&self) -> bool {
        self.in_out.is_enabled()
    }

    /// Whether a record of this severity passes both the gate and the active sink.
    ///
    /// Before any sink is set up, only the gate is consulted; the default sink is not created.
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.gate.is_enabled(level)
            && self
                .installed()
                .is_none_or(|logger| logger.enabled(level))
    }

    /// Flush the active sink, if any.
    pub fn flush(&self) {
        if let Some(logger) = self.installed() {
            logger.flush();
        }
    }
}
