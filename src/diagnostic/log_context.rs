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

use std::borrow::Cow;
use std::cell::RefCell;
use std::marker::PhantomData;

use crate::Diagnostic;
use crate::Error;
use crate::kv::Visitor;

thread_local! {
    static PROPERTIES: RefCell<Vec<(Cow<'static, str>, String)>> = const { RefCell::new(Vec::new()) };
}

/// A diagnostic over a thread-local stack of properties.
///
/// Properties are pushed with [`LogContext::push_property`] and stay visible to every record
/// emitted on the same thread until the returned guard is dropped.
///
/// ## Example
///
/// ```
/// use logscope::diagnostic::LogContext;
///
/// let _guard = LogContext::push_property("RequestId", "42");
/// assert_eq!(LogContext::get("RequestId").as_deref(), Some("42"));
/// ```
#[derive(Default, Debug, Clone, Copy)]
#[non_exhaustive]
pub struct LogContext {}

impl LogContext {
    /// Push a property onto the current thread's context.
    ///
    /// The property is popped when the returned guard is dropped, including during unwinding.
    #[must_use = "the property is popped as soon as the guard is dropped"]
    pub fn push_property<K, V>(key: K, value: V) -> PropertyGuard
    where
        K: Into<Cow<'static, str>>,
        V: Into<String>,
    {
        PROPERTIES.with(|stack| {
            let mut stack = stack.borrow_mut();
            let depth = stack.len();
            stack.push((key.into(), value.into()));
            PropertyGuard {
                depth,
                _not_send: PhantomData,
            }
        })
    }

    /// The innermost value pushed for `key` on the current thread.
    pub fn get(key: &str) -> Option<String> {
        PROPERTIES.with(|stack| {
            stack
                .borrow()
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    /// The number of properties currently pushed on this thread.
    pub fn depth() -> usize {
        PROPERTIES.with(|stack| stack.borrow().len())
    }
}

impl Diagnostic for LogContext {
    fn visit(&self, visitor: &mut dyn Visitor) -> Result<(), Error> {
        PROPERTIES.with(|stack| {
            let stack = stack.borrow();
            for (key, value) in stack.iter() {
                visitor.visit(key, value)?;
            }
            Ok(())
        })
    }
}

/// Pops a pushed property when dropped.
///
/// Guards must be dropped on the thread that created them, in reverse push order; dropping an
/// outer guard first also pops everything pushed after it.
#[derive(Debug)]
pub struct PropertyGuard {
    depth: usize,
    // the property lives in a thread-local stack
    _not_send: PhantomData<*const ()>,
}

impl Drop for PropertyGuard {
    fn drop(&mut self) {
        // the thread-local may already be gone during thread teardown
        let _ = PROPERTIES.try_with(|stack| {
            if let Ok(mut stack) = stack.try_borrow_mut() {
                stack.truncate(self.depth);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;
    use crate::kv::CollectVisitor;

    #[test]
    fn test_push_and_pop_in_order() {
        let base = LogContext::depth();
        {
            let _a = LogContext::push_property("A", "1");
            let _b = LogContext::push_property("B", "2");
            assert_eq!(LogContext::depth(), base + 2);

            let mut visitor = CollectVisitor::default();
            LogContext::default().visit(&mut visitor).unwrap();
            let keys = visitor
                .pairs
                .iter()
                .map(|(k, _)| k.as_str())
                .collect::<Vec<_>>();
            assert!(keys.ends_with(&["A", "B"]));
        }
        assert_eq!(LogContext::depth(), base);
    }

    #[test]
    fn test_innermost_value_wins() {
        let _outer = LogContext::push_property("Key", "outer");
        {
            let _inner = LogContext::push_property("Key", "inner");
            assert_eq!(LogContext::get("Key").as_deref(), Some("inner"));
        }
        assert_eq!(LogContext::get("Key").as_deref(), Some("outer"));
    }

    #[test]
    fn test_pop_on_unwind() {
        let base = LogContext::depth();
        let result = panic::catch_unwind(|| {
            let _guard = LogContext::push_property("Doomed", "yes");
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(LogContext::depth(), base);
        assert_eq!(LogContext::get("Doomed"), None);
    }
}
