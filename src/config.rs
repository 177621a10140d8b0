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

//! Configuration of the sink installed by [`LogState::setup`](crate::LogState::setup).
//!
//! # Examples
//!
//! ```
//! use logscope::Severity;
//! use logscope::config::RollingPeriod;
//! use logscope::config::SinkConfig;
//!
//! let config = SinkConfig::production()
//!     .with_destination("logs/orders_.slog")
//!     .with_rolling_period(RollingPeriod::Hour)
//!     .with_minimum_severity(Severity::Debug);
//! assert!(config.validate().is_ok());
//! ```

use std::env;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::Error;
use crate::Logger;
use crate::Severity;
use crate::SeverityGate;
use crate::append::RollingFileBuilder;
use crate::append::Stdout;
use crate::filter::GateFilter;
use crate::layout::DEFAULT_OUTPUT_FORMAT;
use crate::layout::TextLayout;

pub use crate::append::file::RollingPeriod;

/// The file written when no destination is configured.
pub const DEFAULT_DESTINATION: &str = "MyApplication_.slog";

/// Environment variable overriding [`SinkConfig::minimum_severity`].
pub const LEVEL_ENV: &str = "LOGSCOPE_LEVEL";

/// Environment variable overriding [`SinkConfig::console_mirror`].
pub const CONSOLE_ENV: &str = "LOGSCOPE_CONSOLE";

/// Culture-dependent rendering options.
///
/// Only the decimal separator of the elapsed bucket is affected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locale {
    /// A descriptive tag such as `de-DE`; empty for the invariant locale.
    pub name: String,
    /// The character separating the integral and fractional part of numbers.
    pub decimal_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self::invariant()
    }
}

impl Locale {
    /// The culture-independent locale, using `.` as decimal separator.
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            decimal_separator: '.',
        }
    }

    /// A named locale with its decimal separator.
    pub fn new(name: impl Into<String>, decimal_separator: char) -> Self {
        Self {
            name: name.into(),
            decimal_separator,
        }
    }
}

/// Options of the default sink: a rolling file, optionally mirrored to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SinkConfig {
    /// The output template of every line; see [`OutputTemplate`](crate::layout::OutputTemplate).
    pub output_format: String,
    /// The file name the rolling files are derived from, e.g. `MyApplication_.slog`.
    pub destination: String,
    /// How often a new file is started.
    pub rolling_period: RollingPeriod,
    /// How many files are kept, the current one included.
    pub retained_file_count: usize,
    /// Whether lines are also printed to stdout.
    pub console_mirror: bool,
    /// Whether other processes may write the same files.
    pub allow_multi_process_write: bool,
    /// Whether lines are buffered in memory until the sink is flushed. Ignored when
    /// `allow_multi_process_write` is set.
    pub buffered: bool,
    /// The initial minimum severity.
    pub minimum_severity: Severity,
    /// Culture-dependent rendering options.
    pub locale: Locale,
    /// Start a new file once the current one reaches this size in bytes.
    pub max_file_size: Option<NonZeroUsize>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl SinkConfig {
    /// Information and higher severities written to `MyApplication_.slog`, rolled every day and
    /// kept for 14 days. Other processes may write to the same files.
    pub fn production() -> Self {
        Self {
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            rolling_period: RollingPeriod::Day,
            retained_file_count: 14,
            console_mirror: false,
            allow_multi_process_write: true,
            buffered: false,
            minimum_severity: Severity::Information,
            locale: Locale::invariant(),
            max_file_size: None,
        }
    }

    /// Same as [`SinkConfig::production`], also printing every line to stdout.
    pub fn production_with_console() -> Self {
        Self {
            console_mirror: true,
            ..Self::production()
        }
    }

    /// Set [`output_format`](SinkConfig::output_format).
    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = output_format.into();
        self
    }

    /// Set [`destination`](SinkConfig::destination).
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Set [`rolling_period`](SinkConfig::rolling_period).
    pub fn with_rolling_period(mut self, rolling_period: RollingPeriod) -> Self {
        self.rolling_period = rolling_period;
        self
    }

    /// Set [`retained_file_count`](SinkConfig::retained_file_count).
    pub fn with_retained_file_count(mut self, retained_file_count: usize) -> Self {
        self.retained_file_count = retained_file_count;
        self
    }

    /// Set [`console_mirror`](SinkConfig::console_mirror).
    pub fn with_console_mirror(mut self, console_mirror: bool) -> Self {
        self.console_mirror = console_mirror;
        self
    }

    /// Set [`allow_multi_process_write`](SinkConfig::allow_multi_process_write).
    pub fn with_multi_process_write(mut self, allow: bool) -> Self {
        self.allow_multi_process_write = allow;
        self
    }

    /// Set [`buffered`](SinkConfig::buffered).
    pub fn with_buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Set [`minimum_severity`](SinkConfig::minimum_severity).
    pub fn with_minimum_severity(mut self, minimum_severity: Severity) -> Self {
        self.minimum_severity = minimum_severity;
        self
    }

    /// Set [`locale`](SinkConfig::locale).
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set [`max_file_size`](SinkConfig::max_file_size).
    pub fn with_max_file_size(mut self, max_file_size: Option<NonZeroUsize>) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Override options from the `LOGSCOPE_LEVEL` and `LOGSCOPE_CONSOLE` environment variables.
    ///
    /// # Errors
    ///
    /// Return an [`InvalidArgument`](crate::ErrorKind::InvalidArgument) error if a variable is
    /// set to a value that cannot be parsed.
    pub fn apply_env(self) -> Result<Self, Error> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        if let Some(level) = lookup(LEVEL_ENV) {
            self.minimum_severity = level
                .parse::<Severity>()
                .map_err(|err| err.with_context("variable", LEVEL_ENV))?;
        }

        if let Some(console) = lookup(CONSOLE_ENV) {
            self.console_mirror = match console.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "expected a boolean, got {console:?}"
                    ))
                    .with_context("variable", CONSOLE_ENV));
                }
            };
        }

        Ok(self)
    }

    /// Check the options before a sink is built from them.
    ///
    /// # Errors
    ///
    /// Return an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if the
    /// output format or the destination is blank, the output format is malformed, or no file
    /// would be retained.
    pub fn validate(&self) -> Result<(), Error> {
        if self.output_format.trim().is_empty() {
            return Err(Error::invalid_configuration(
                "output format must not be blank",
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(Error::invalid_configuration(
                "destination must not be blank",
            ));
        }
        if self.retained_file_count == 0 {
            return Err(Error::invalid_configuration(
                "retained file count must be positive",
            ));
        }
        self.layout().map(|_| ())
    }

    fn layout(&self) -> Result<TextLayout, Error> {
        Ok(TextLayout::new(&self.output_format)?.decimal_separator(self.locale.decimal_separator))
    }

    /// Assemble the logger described by these options, filtered by the live `gate`.
    pub(crate) fn build_logger(&self, gate: Arc<SeverityGate>) -> Result<Logger, Error> {
        self.validate()?;

        let retained = NonZeroUsize::new(self.retained_file_count).ok_or_else(|| {
            Error::invalid_configuration("retained file count must be positive")
        })?;
        let mut file = RollingFileBuilder::new(self.destination.trim())
            .layout(self.layout()?)
            .period(self.rolling_period)
            .max_log_files(retained)
            .shared(self.allow_multi_process_write)
            .buffered(self.buffered);
        if let Some(max_file_size) = self.max_file_size {
            file = file.max_file_size(max_file_size);
        }
        let file = file.build()?;

        let mut builder = crate::builder().dispatch(|d| {
            d.filter(GateFilter::new(gate.clone()))
                .append(file)
        });
        if self.console_mirror {
            let console = Stdout::default().with_layout(self.layout()?);
            builder = builder.dispatch(|d| d.filter(GateFilter::new(gate)).append(console));
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_production_defaults() {
        let config = SinkConfig::production();
        assert_eq!(config.destination, "MyApplication_.slog");
        assert_eq!(config.rolling_period, RollingPeriod::Day);
        assert_eq!(config.retained_file_count, 14);
        assert_eq!(config.minimum_severity, Severity::Information);
        assert!(config.allow_multi_process_write);
        assert!(!config.buffered);
        assert!(!config.console_mirror);
        assert_eq!(config.output_format, DEFAULT_OUTPUT_FORMAT);
        assert_eq!(config, SinkConfig::default());

        let with_console = SinkConfig::production_with_console();
        assert!(with_console.console_mirror);
        assert_eq!(with_console.with_console_mirror(false), config);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let cases = [
            SinkConfig::production().with_output_format(""),
            SinkConfig::production().with_output_format(" \t "),
            SinkConfig::production().with_destination(""),
            SinkConfig::production().with_destination("   "),
            SinkConfig::production().with_retained_file_count(0),
            SinkConfig::production().with_output_format("{message"),
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration, "{config:?}");
        }
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            (LEVEL_ENV, "warning".to_string()),
            (CONSOLE_ENV, "on".to_string()),
        ]);
        let config = SinkConfig::production()
            .apply_overrides(|key| vars.get(key).cloned())
            .unwrap();
        assert_eq!(config.minimum_severity, Severity::Warning);
        assert!(config.console_mirror);

        let untouched = SinkConfig::production().apply_overrides(|_| None).unwrap();
        assert_eq!(untouched, SinkConfig::production());

        let err = SinkConfig::production()
            .apply_overrides(|key| (key == LEVEL_ENV).then(|| "loud".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = SinkConfig::production()
            .apply_overrides(|key| (key == CONSOLE_ENV).then(|| "maybe".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_build_logger_follows_the_gate() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("svc_.slog");
        let gate = Arc::new(SeverityGate::new(Severity::Warning));
        let logger = SinkConfig::production()
            .with_destination(destination.to_string_lossy())
            .build_logger(gate.clone())
            .unwrap();

        assert!(!logger.enabled(Severity::Information));
        gate.set_minimum(Severity::Verbose);
        assert!(logger.enabled(Severity::Verbose));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_fills_defaults() {
        let config: SinkConfig = serde_json::from_str(
            r#"{"destination": "orders_.slog", "rolling_period": "Hour", "minimum_severity": "Debug"}"#,
        )
        .unwrap();
        assert_eq!(config.destination, "orders_.slog");
        assert_eq!(config.rolling_period, RollingPeriod::Hour);
        assert_eq!(config.minimum_severity, Severity::Debug);
        assert_eq!(config.retained_file_count, 14);
        assert_eq!(config.locale, Locale::invariant());
    }
}
