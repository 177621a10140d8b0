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

//! Key-value properties attached to log records.

use crate::Error;

/// A visitor to walk through key-value properties.
pub trait Visitor {
    /// Visit a key-value pair.
    fn visit(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// A visitor that collects every pair in visiting order.
#[derive(Debug, Default)]
pub(crate) struct CollectVisitor {
    pub(crate) pairs: Vec<(String, String)>,
}

impl Visitor for CollectVisitor {
    fn visit(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
