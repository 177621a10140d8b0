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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use jiff::Timestamp;
use jiff::Zoned;

use crate::Error;
use crate::Trap;
use crate::append::file::clock::Clock;
use crate::append::file::period::RollingPeriod;
use crate::trap::DefaultTrap;

/// A writer for period-stamped rolling files.
///
/// A destination such as `logs/MyApplication_.slog` rolled daily writes
/// `logs/MyApplication_20260129.slog`. When a maximum file size is set, further files of the same
/// period are suffixed `_001`, `_002`, and so on.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: LogWriter,
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            let err = Error::new("failed to flush file writer on dropped").with_source(err);
            self.state.trap.trap(&err);
        }
    }
}

impl RollingFileWriter {
    /// The path of the file currently written.
    pub fn current_path(&self) -> PathBuf {
        self.state.current_path()
    }

    fn roll_if_needed(&mut self) {
        let now = self.state.clock.now();

        if self.state.should_rollover_on_period(&now) {
            self.state.stamp = self.state.period.stamp(&now);
            self.state.sequence = 0;
            self.state.next_boundary = self.state.next_boundary(&now);
            self.state.refresh_writer(&mut self.writer);
        }

        if self.state.should_rollover_on_size() {
            self.state.sequence += 1;
            self.state.refresh_writer(&mut self.writer);
        }
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.roll_if_needed();
        self.writer
            .write(buf)
            .inspect(|&n| self.state.current_filesize += n)
    }

    // one write per line, so that concurrent appenders in shared mode never interleave a line
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.roll_if_needed();
        self.writer.write_all(buf)?;
        self.state.current_filesize += buf.len();
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[derive(Debug)]
enum LogWriter {
    Direct(File),
    Buffered(BufWriter<File>),
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::Direct(file) => file.write(buf),
            LogWriter::Buffered(writer) => writer.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            LogWriter::Direct(file) => file.write_all(buf),
            LogWriter::Buffered(writer) => writer.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::Direct(file) => file.flush(),
            LogWriter::Buffered(writer) => writer.flush(),
        }
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    // required
    destination: PathBuf,

    // has default
    period: RollingPeriod,
    max_size: Option<NonZeroUsize>,
    max_files: Option<NonZeroUsize>,
    shared: bool,
    buffered: bool,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`] writing to files derived from `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            period: RollingPeriod::Infinite,
            max_size: None,
            max_files: None,
            shared: false,
            buffered: false,
            clock: Clock::System,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for the rolling file writer.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the rolling period.
    #[must_use]
    pub fn period(mut self, period: RollingPeriod) -> Self {
        self.period = period;
        self
    }

    /// Set the maximum number of log files to keep, the current one included.
    #[must_use]
    pub fn max_log_files(mut self, n: NonZeroUsize) -> Self {
        self.max_files = Some(n);
        self
    }

    /// Set the maximum size of a log file in bytes.
    #[must_use]
    pub fn max_file_size(mut self, n: NonZeroUsize) -> Self {
        self.max_size = Some(n);
        self
    }

    /// Allow other processes to append to the same files.
    ///
    /// Shared files are always written unbuffered, one write per line.
    #[must_use]
    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// Keep lines in memory until the writer is flushed, rolled or dropped.
    ///
    /// Off by default: every line reaches the file as soon as it is written. Buffered lines of a
    /// writer that is never dropped, such as one held by [`LogState::global`], are lost at exit
    /// unless flushed. Ignored for shared files.
    ///
    /// [`LogState::global`]: crate::LogState::global
    #[must_use]
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`].
    ///
    /// # Errors
    ///
    /// Return an error if the destination is blank, or the log directory or file cannot be
    /// created.
    pub fn build(self) -> Result<RollingFileWriter, Error> {
        let Self {
            destination,
            period,
            max_size,
            max_files,
            shared,
            buffered,
            clock,
            trap,
        } = self;

        let buffered = buffered && !shared;
        let naming = FileNaming::new(&destination)?;
        let (state, writer) =
            State::new(naming, period, max_size, max_files, buffered, clock, trap)?;
        Ok(RollingFileWriter { state, writer })
    }
}

/// Splits a destination such as `logs/MyApplication_.slog` into the directory, the stem
/// `MyApplication_` and the extension `.slog`.
#[derive(Debug)]
struct FileNaming {
    dir: PathBuf,
    stem: String,
    extension: String,
}

impl FileNaming {
    fn new(destination: &Path) -> Result<Self, Error> {
        let name = destination
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(Error::invalid_configuration(
                "destination must name a file",
            )
            .with_context("destination", destination.display()));
        }

        let (stem, extension) = match name.rfind('.') {
            Some(pos) if pos > 0 => name.split_at(pos),
            _ => (name, ""),
        };

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(FileNaming {
            dir,
            stem: stem.to_string(),
            extension: extension.to_string(),
        })
    }

    fn path(&self, stamp: &str, sequence: usize) -> PathBuf {
        let Self {
            dir,
            stem,
            extension,
        } = self;
        let filename = match sequence {
            0 => format!("{stem}{stamp}{extension}"),
            n => format!("{stem}{stamp}_{n:03}{extension}"),
        };
        dir.join(filename)
    }

    /// Recover `(stamp, sequence)` from a file name written under this naming, if it is one.
    fn parse<'a>(&self, filename: &'a str, period: RollingPeriod) -> Option<(&'a str, usize)> {
        let middle = filename
            .strip_prefix(self.stem.as_str())?
            .strip_suffix(self.extension.as_str())?;

        let stamp_len = period.stamp_len();
        let stamp = middle.get(..stamp_len)?;
        if !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let rest = middle.get(stamp_len..)?;
        if rest.is_empty() {
            return Some((stamp, 0));
        }
        let sequence = rest.strip_prefix('_')?;
        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((stamp, sequence.parse().ok()?))
    }
}

#[derive(Debug)]
struct LogFile {
    filepath: PathBuf,
    stamp: String,
    sequence: usize,
}

#[derive(Debug)]
struct State {
    naming: FileNaming,
    period: RollingPeriod,
    stamp: String,
    sequence: usize,
    current_filesize: usize,
    next_boundary: Option<Timestamp>,
    max_size: Option<NonZeroUsize>,
    max_files: Option<NonZeroUsize>,
    buffered: bool,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl State {
    fn new(
        naming: FileNaming,
        period: RollingPeriod,
        max_size: Option<NonZeroUsize>,
        max_files: Option<NonZeroUsize>,
        buffered: bool,
        clock: Clock,
        trap: Box<dyn Trap>,
    ) -> Result<(Self, LogWriter), Error> {
        fs::create_dir_all(&naming.dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", naming.dir.display())
                .with_source(err)
        })?;

        let now = clock.now();
        let mut state = State {
            stamp: period.stamp(&now),
            sequence: 0,
            current_filesize: 0,
            next_boundary: None,
            naming,
            period,
            max_size,
            max_files,
            buffered,
            clock,
            trap,
        };
        state.next_boundary = state.next_boundary(&now);

        // continue with the latest file of the current period, if any
        state.sequence = state
            .list_logfiles()?
            .into_iter()
            .filter(|file| file.stamp == state.stamp)
            .map(|file| file.sequence)
            .max()
            .unwrap_or(0);

        let (writer, len) = state.open_log_writer()?;
        state.current_filesize = len;

        if let Some(max_files) = state.max_files {
            if let Err(err) = state.delete_oldest_logs(max_files.get()) {
                let err = Error::new("failed to delete oldest logs").with_source(err);
                state.trap.trap(&err);
            }
        }

        Ok((state, writer))
    }

    fn current_path(&self) -> PathBuf {
        self.naming.path(&self.stamp, self.sequence)
    }

    fn next_boundary(&self, now: &Zoned) -> Option<Timestamp> {
        match self.period.next_boundary(now) {
            Ok(next) => next.map(|next| next.timestamp()),
            Err(err) => {
                let err = Error::new("failed to compute the next rollover time")
                    .with_context("period", self.period)
                    .with_source(err);
                self.trap.trap(&err);
                None
            }
        }
    }

    fn open_log_writer(&self) -> Result<(LogWriter, usize), Error> {
        let filepath = self.current_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filepath)
            .map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", filepath.display())
                    .with_source(err)
            })?;
        let len = file.metadata().map_or(0, |metadata| metadata.len() as usize);

        let writer = if self.buffered {
            LogWriter::Buffered(BufWriter::new(file))
        } else {
            LogWriter::Direct(file)
        };
        Ok((writer, len))
    }

    fn list_logfiles(&self) -> Result<Vec<LogFile>, Error> {
        let read_dir = fs::read_dir(&self.naming.dir).map_err(|err| {
            Error::new(format!(
                "failed to read log dir: {}",
                self.naming.dir.display()
            ))
            .with_source(err)
        })?;

        let files = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                // the appender only creates files, not directories or symlinks
                if !metadata.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                let (stamp, sequence) = self.naming.parse(filename.to_str()?, self.period)?;
                Some(LogFile {
                    filepath: entry.path(),
                    stamp: stamp.to_string(),
                    sequence,
                })
            })
            .collect::<Vec<_>>();

        Ok(files)
    }

    fn delete_oldest_logs(&self, max_files: usize) -> Result<(), Error> {
        let files = self.list_logfiles()?;
        if files.len() <= max_files {
            return Ok(());
        }

        let excess = files.len() - max_files;
        let current = self.current_path();
        let mut candidates = files
            .into_iter()
            .filter(|file| file.filepath != current)
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| (&a.stamp, a.sequence).cmp(&(&b.stamp, b.sequence)));

        for file in candidates.iter().take(excess) {
            let filepath = &file.filepath;
            match fs::remove_file(filepath) {
                Ok(()) => {}
                // another process may have cleaned it up already
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(Error::new(format!(
                        "failed to remove old log: {}",
                        filepath.display()
                    ))
                    .with_source(err));
                }
            }
        }

        Ok(())
    }

    fn refresh_writer(&mut self, writer: &mut LogWriter) {
        match self.open_log_writer() {
            Ok((new_writer, len)) => {
                if let Err(err) = writer.flush() {
                    let err = Error::new("failed to flush previous writer").with_source(err);
                    self.trap.trap(&err);
                }
                *writer = new_writer;
                self.current_filesize = len;
            }
            Err(err) => {
                let err = Error::new("failed to roll log writer").with_source(err);
                self.trap.trap(&err);
                return;
            }
        }

        if let Some(max_files) = self.max_files {
            if let Err(err) = self.delete_oldest_logs(max_files.get()) {
                let err = Error::new("failed to delete oldest logs").with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn should_rollover_on_period(&self, now: &Zoned) -> bool {
        self.next_boundary.is_some_and(|ts| now.timestamp() >= ts)
    }

    fn should_rollover_on_size(&self) -> bool {
        self.max_size
            .is_some_and(|n| self.current_filesize >= n.get())
    }
}
