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

//! Diagnostic contexts enriching log records with ambient key-value pairs.

use std::fmt;

use crate::Error;
use crate::kv::Visitor;

mod log_context;
mod process;

pub use self::log_context::LogContext;
pub use self::log_context::PropertyGuard;
pub use self::process::PROCESS_ID_PROPERTY;
pub use self::process::ProcessDiagnostic;

/// A diagnostic exposes key-value pairs of the ambient context to layouts and appenders.
pub trait Diagnostic: fmt::Debug + Send + Sync + 'static {
    /// Visit the key-value pairs in the diagnostic context.
    fn visit(&self, visitor: &mut dyn Visitor) -> Result<(), Error>;
}

impl<T: Diagnostic> From<T> for Box<dyn Diagnostic> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
