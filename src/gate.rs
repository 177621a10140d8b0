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

//! Runtime switches consulted by every emission.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Severity;

/// The minimum severity below which emissions are suppressed.
///
/// The threshold may be changed at any time from any thread; an emission racing with a change
/// observes either the old or the new value.
///
/// # Examples
///
/// ```
/// use logscope::Severity;
/// use logscope::SeverityGate;
///
/// let gate = SeverityGate::new(Severity::Information);
/// assert!(!gate.is_enabled(Severity::Debug));
///
/// gate.set_minimum(Severity::Verbose);
/// assert!(gate.is_enabled(Severity::Debug));
/// ```
#[derive(Debug)]
pub struct SeverityGate {
    minimum: AtomicU8,
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new(Severity::default())
    }
}

impl SeverityGate {
    /// Create a gate with the given minimum severity.
    pub const fn new(minimum: Severity) -> Self {
        Self {
            minimum: AtomicU8::new(minimum as u8),
        }
    }

    /// The current minimum severity.
    pub fn minimum(&self) -> Severity {
        Severity::from_u8(self.minimum.load(Ordering::Relaxed))
    }

    /// Update the minimum severity.
    ///
    /// Return `true` if the threshold changed, `false` if it already had this value.
    pub fn set_minimum(&self, level: Severity) -> bool {
        let previous = self.minimum.swap(level as u8, Ordering::Relaxed);
        previous != level as u8
    }

    /// Whether `level` passes the gate.
    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.minimum()
    }
}

/// Whether scopes emit synthetic entry and exit records.
#[derive(Debug, Default)]
pub struct TraceSwitch {
    enabled: AtomicBool,
}

impl TraceSwitch {
    /// Create a switch in the given state.
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Whether entry/exit tracing is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn entry/exit tracing on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}
