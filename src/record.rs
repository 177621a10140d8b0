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

//! Log record and its owned form.

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use crate::Diagnostic;
use crate::Error;
use crate::Severity;
use crate::kv::CollectVisitor;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// A small numeric identifier of the current thread.
///
/// Threads are numbered 1, 2, ... in the order they first log.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}

/// The payload of a log event.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    level: Severity,
    thread_id: u64,
    target: &'a str,

    // the payload
    template: &'a str,
    message: Cow<'a, str>,

    // structural logging
    properties: &'a [(String, String)],
}

impl<'a> Record<'a> {
    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity of the event.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// The numeric identifier of the emitting thread.
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// The name of the source of the event, e.g. the `log` target for bridged records.
    pub fn target(&self) -> &'a str {
        self.target
    }

    /// The message template the event was emitted with.
    pub fn template(&self) -> &'a str {
        self.template
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Properties captured from named template holes.
    pub fn properties(&self) -> &'a [(String, String)] {
        self.properties
    }

    /// Convert to an owned record.
    pub fn to_owned(&self) -> RecordOwned {
        RecordOwned {
            now: self.now,
            level: self.level,
            thread_id: self.thread_id,
            target: self.target.to_string(),
            template: self.template.to_string(),
            message: self.message.to_string(),
            properties: self.properties.to_vec(),
            context: vec![],
        }
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: SystemTime::now(),
                level: Severity::Information,
                thread_id: current_thread_id(),
                target: "",
                template: "",
                message: Cow::Borrowed(""),
                properties: &[],
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`time`](Record::time).
    pub fn time(mut self, now: SystemTime) -> Self {
        self.record.now = now;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Severity) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`target`](Record::target).
    pub fn target(mut self, target: &'a str) -> Self {
        self.record.target = target;
        self
    }

    /// Set [`template`](Record::template).
    pub fn template(mut self, template: &'a str) -> Self {
        self.record.template = template;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Set [`properties`](Record::properties).
    pub fn properties(mut self, properties: &'a [(String, String)]) -> Self {
        self.record.properties = properties;
        self
    }

    /// Invoke the builder and return a `Record`.
    pub fn build(self) -> Record<'a> {
        self.record
    }
}

/// Owned version of a log record, together with the context it was emitted in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordOwned {
    now: SystemTime,
    level: Severity,
    thread_id: u64,
    target: String,
    template: String,
    message: String,
    properties: Vec<(String, String)>,
    context: Vec<(String, String)>,
}

impl RecordOwned {
    /// Snapshot the key-value pairs currently exposed by `diags` into this record.
    pub fn capture_context(mut self, diags: &[Box<dyn Diagnostic>]) -> Result<Self, Error> {
        let mut visitor = CollectVisitor::default();
        for d in diags {
            d.visit(&mut visitor)?;
        }
        self.context = visitor.pairs;
        Ok(self)
    }

    /// Create a `Record` referencing the data in this `RecordOwned`.
    pub fn as_record(&self) -> Record<'_> {
        Record {
            now: self.now,
            level: self.level,
            thread_id: self.thread_id,
            target: &self.target,
            template: &self.template,
            message: Cow::Borrowed(&self.message),
            properties: &self.properties,
        }
    }

    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity of the event.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// The numeric identifier of the emitting thread.
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// The message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The context pairs captured at emission, in push order.
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Look up a property, first among the record's own properties, then the innermost matching
    /// context property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .chain(self.context.iter().rev())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
