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
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Diagnostic;
use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::record::RecordOwned;

#[derive(Debug, Default)]
struct Captured {
    records: Vec<RecordOwned>,
    lines: Vec<String>,
}

/// An appender that keeps log records in memory.
///
/// Clones share the same buffer, so a handle can be kept after the appender is moved into a
/// logger. Each record is stored together with the context properties visible when it was
/// emitted, and with its line as rendered by the layout.
///
/// # Examples
///
/// ```
/// use logscope::append::Memory;
/// use logscope::record::Record;
///
/// let memory = Memory::default();
/// let logger = logscope::builder()
///     .dispatch(|d| d.append(memory.clone()))
///     .build();
///
/// logger.log(&Record::builder().message("hello").build());
/// assert_eq!(memory.records()[0].message(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct Memory {
    captured: Arc<Mutex<Captured>>,
    layout: Arc<dyn Layout>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            captured: Arc::default(),
            layout: Arc::new(TextLayout::default()),
        }
    }
}

impl Memory {
    /// Set the layout used to render [`lines`](Memory::lines).
    pub fn with_layout(mut self, layout: impl Layout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    fn captured(&self) -> MutexGuard<'_, Captured> {
        self.captured.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A snapshot of the captured records, oldest first.
    pub fn records(&self) -> Vec<RecordOwned> {
        self.captured().records.clone()
    }

    /// A snapshot of the rendered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.captured().lines.clone()
    }

    /// The captured messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.captured()
            .records
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    /// Take all captured records, leaving the buffer empty.
    pub fn drain(&self) -> Vec<RecordOwned> {
        let mut captured = self.captured();
        captured.lines.clear();
        std::mem::take(&mut captured.records)
    }

    /// The number of captured records.
    pub fn len(&self) -> usize {
        self.captured().records.len()
    }

    /// Whether no record has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Append for Memory {
    fn append(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<(), Error> {
        let line = self.layout.format(record, diags)?;
        let owned = record.to_owned().capture_context(diags)?;

        let mut captured = self.captured();
        captured.records.push(owned);
        captured.lines.push(String::from_utf8_lossy(&line).into_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use crate::diagnostic::LogContext;
    use crate::layout::TextLayout;

    #[test]
    fn test_clones_share_the_buffer() {
        let memory = Memory::default().with_layout(TextLayout::new("{level} {message}").unwrap());
        let handle = memory.clone();
        let diags: Vec<Box<dyn Diagnostic>> = vec![Box::new(LogContext::default())];

        let _guard = LogContext::push_property("Tenant", "acme");
        let record = Record::builder()
            .level(Severity::Warning)
            .message("disk almost full")
            .build();
        memory.append(&record, &diags).unwrap();

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.lines(), vec!["WRN disk almost full".to_string()]);
        assert_eq!(handle.records()[0].property("Tenant"), Some("acme"));

        let drained = handle.drain();
        assert_eq!(drained.len(), 1);
        assert!(memory.is_empty());
        assert!(memory.lines().is_empty());
    }
}
