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

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The severity of a log record.
///
/// Severities are totally ordered from the most verbose to the most severe:
///
/// ```
/// use logscope::Severity;
///
/// assert!(Severity::Verbose < Severity::Debug);
/// assert!(Severity::Error < Severity::Fatal);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    /// Tracing information and debugging minutiae.
    Verbose = 0,
    /// Internal events not necessarily observable from the outside.
    Debug = 1,
    /// The lifeblood of operational intelligence.
    #[default]
    Information = 2,
    /// Service is degraded or endangered.
    Warning = 3,
    /// Functionality is unavailable.
    Error = 4,
    /// The process or component is about to go down.
    Fatal = 5,
}

impl Severity {
    /// All severities, most verbose first.
    pub const ALL: [Severity; 6] = [
        Severity::Verbose,
        Severity::Debug,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// The three-letter code rendered in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Verbose => "VRB",
            Severity::Debug => "DBG",
            Severity::Information => "INF",
            Severity::Warning => "WRN",
            Severity::Error => "ERR",
            Severity::Fatal => "FTL",
        }
    }

    /// The full name of the severity.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Verbose => "Verbose",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Severity {
        match value {
            0 => Severity::Verbose,
            1 => Severity::Debug,
            2 => Severity::Information,
            3 => Severity::Warning,
            4 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Severity, Self::Err> {
        let s = s.trim();
        for level in Severity::ALL {
            if s.eq_ignore_ascii_case(level.name()) || s.eq_ignore_ascii_case(level.code()) {
                return Ok(level);
            }
        }

        // common aliases used by other logging ecosystems
        for (name, level) in [
            ("trace", Severity::Verbose),
            ("info", Severity::Information),
            ("warn", Severity::Warning),
            ("critical", Severity::Fatal),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::invalid_argument(format!("malformed severity: {s:?}")))
    }
}

#[cfg(feature = "bridge-log")]
impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Information,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Verbose,
        }
    }
}

#[cfg(feature = "bridge-log")]
impl From<Severity> for log::LevelFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Verbose => log::LevelFilter::Trace,
            Severity::Debug => log::LevelFilter::Debug,
            Severity::Information => log::LevelFilter::Info,
            Severity::Warning => log::LevelFilter::Warn,
            Severity::Error | Severity::Fatal => log::LevelFilter::Error,
        }
    }
}
