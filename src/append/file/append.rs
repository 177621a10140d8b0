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

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Diagnostic;
use crate::Error;
use crate::Layout;
use crate::Trap;
use crate::append::Append;
use crate::append::file::period::RollingPeriod;
use crate::append::file::rolling::RollingFileWriter;
use crate::append::file::rolling::RollingFileWriterBuilder;
use crate::layout::TextLayout;
use crate::record::Record;

/// A builder to configure and create a [`RollingFile`] appender.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use logscope::append::RollingFileBuilder;
/// use logscope::config::RollingPeriod;
///
/// let dir = tempfile::tempdir().unwrap();
/// let appender = RollingFileBuilder::new(dir.path().join("MyApplication_.slog"))
///     .period(RollingPeriod::Day)
///     .max_log_files(NonZeroUsize::new(14).unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct RollingFileBuilder {
    builder: RollingFileWriterBuilder,
    layout: Box<dyn Layout>,
}

impl RollingFileBuilder {
    /// Create a new rolling file appender builder writing files derived from `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            builder: RollingFileWriterBuilder::new(destination),
            layout: Box::new(TextLayout::default()),
        }
    }

    /// Build the [`RollingFile`] appender.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The destination does not name a file.
    /// * The log directory or the current log file cannot be created.
    pub fn build(self) -> Result<RollingFile, Error> {
        let RollingFileBuilder { builder, layout } = self;
        let writer = builder.build()?;
        Ok(RollingFile::new(writer, layout))
    }

    /// Set the layout for the logs.
    ///
    /// Default to [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the trap for errors raised while rolling files.
    ///
    /// Default to [`DefaultTrap`](crate::trap::DefaultTrap).
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.builder = self.builder.trap(trap);
        self
    }

    /// Set how often a new log file is started.
    ///
    /// Default to [`RollingPeriod::Infinite`].
    pub fn period(mut self, period: RollingPeriod) -> Self {
        self.builder = self.builder.period(period);
        self
    }

    /// Also start a new log file once the current one exceeds the given size.
    ///
    /// The size check runs after the period check.
    pub fn max_file_size(mut self, n: NonZeroUsize) -> Self {
        self.builder = self.builder.max_file_size(n);
        self
    }

    /// Set the maximum number of log files to keep, the current one included.
    pub fn max_log_files(mut self, n: NonZeroUsize) -> Self {
        self.builder = self.builder.max_log_files(n);
        self
    }

    /// Allow several processes to append to the same log files.
    pub fn shared(mut self, shared: bool) -> Self {
        self.builder = self.builder.shared(shared);
        self
    }

    /// Buffer lines in memory until flushed.
    ///
    /// Default to `false`. See [`RollingFileWriterBuilder::buffered`].
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.builder = self.builder.buffered(buffered);
        self
    }
}

/// An appender that writes log records to rolling files.
#[derive(Debug)]
pub struct RollingFile {
    writer: Mutex<RollingFileWriter>,
    layout: Box<dyn Layout>,
}

impl RollingFile {
    fn new(writer: RollingFileWriter, layout: Box<dyn Layout>) -> Self {
        let writer = Mutex::new(writer);
        Self { writer, layout }
    }

    fn writer(&self) -> MutexGuard<'_, RollingFileWriter> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The path of the file currently written.
    pub fn current_path(&self) -> PathBuf {
        self.writer().current_path()
    }
}

impl Append for RollingFile {
    fn append(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<(), Error> {
        let mut bytes = self.layout.format(record, diags)?;
        bytes.push(b'\n');
        let mut writer = self.writer();
        writer.write_all(&bytes).map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer();
        writer.flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::Severity;
    use crate::diagnostic::LogContext;

    #[test]
    fn test_lines_land_in_the_current_file() {
        let temp_dir = TempDir::new().unwrap();
        let appender = RollingFileBuilder::new(temp_dir.path().join("orders.log"))
            .layout(TextLayout::new("{level} {message}").unwrap())
            .build()
            .unwrap();
        let diags: Vec<Box<dyn Diagnostic>> = vec![Box::new(LogContext::default())];

        for (level, message) in [(Severity::Information, "one"), (Severity::Error, "two")] {
            let record = Record::builder().level(level).message(message).build();
            appender.append(&record, &diags).unwrap();
        }
        appender.flush().unwrap();

        let content = fs::read_to_string(appender.current_path()).unwrap();
        assert_eq!(content, "INF one\nERR two\n");
    }
}
