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

use crate::Diagnostic;
use crate::Severity;
use crate::SeverityGate;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// Rejects records below a fixed severity.
///
/// # Examples
///
/// ```
/// use logscope::Severity;
/// use logscope::append;
/// use logscope::filter::MinSeverity;
///
/// let logger = logscope::builder()
///     .dispatch(|d| {
///         d.filter(MinSeverity(Severity::Error))
///             .append(append::Stderr::default())
///     })
///     .build();
/// assert!(!logger.enabled(Severity::Warning));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MinSeverity(pub Severity);

impl Filter for MinSeverity {
    fn enabled(&self, level: Severity, _: &[Box<dyn Diagnostic>]) -> FilterResult {
        if level >= self.0 {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

/// Rejects records below the current minimum of a shared [`SeverityGate`].
///
/// Unlike [`MinSeverity`], the threshold follows every change made to the gate, without
/// rebuilding the logger.
#[derive(Debug, Clone)]
pub struct GateFilter {
    gate: Arc<SeverityGate>,
}

impl GateFilter {
    /// Create a filter over `gate`.
    pub fn new(gate: Arc<SeverityGate>) -> Self {
        Self { gate }
    }
}

impl Filter for GateFilter {
    fn enabled(&self, level: Severity, _: &[Box<dyn Diagnostic>]) -> FilterResult {
        if self.gate.is_enabled(level) {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}
