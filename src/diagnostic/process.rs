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

use std::process;

use crate::Diagnostic;
use crate::Error;
use crate::kv::Visitor;

/// The property holding the id of the writing process.
pub const PROCESS_ID_PROPERTY: &str = "ProcessId";

/// A diagnostic exposing the id of the current process as `ProcessId`.
///
/// Every dispatch carries it, so a custom output template can tell apart the processes writing
/// a shared file.
///
/// ## Example
///
/// ```
/// use logscope::diagnostic::ProcessDiagnostic;
///
/// let diag = ProcessDiagnostic::default();
/// assert_eq!(diag.process_id(), std::process::id().to_string());
/// ```
#[derive(Debug, Clone)]
pub struct ProcessDiagnostic {
    process_id: String,
}

impl Default for ProcessDiagnostic {
    fn default() -> Self {
        Self {
            process_id: process::id().to_string(),
        }
    }
}

impl ProcessDiagnostic {
    /// The process id as rendered.
    pub fn process_id(&self) -> &str {
        &self.process_id
    }
}

impl Diagnostic for ProcessDiagnostic {
    fn visit(&self, visitor: &mut dyn Visitor) -> Result<(), Error> {
        visitor.visit(PROCESS_ID_PROPERTY, &self.process_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::CollectVisitor;

    #[test]
    fn test_visits_the_process_id() {
        let mut visitor = CollectVisitor::default();
        ProcessDiagnostic::default().visit(&mut visitor).unwrap();
        assert_eq!(
            visitor.pairs,
            vec![(PROCESS_ID_PROPERTY.to_string(), process::id().to_string())]
        );
    }
}
