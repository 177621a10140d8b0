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
use std::fmt;

/// The name of the logical component a [`LogScope`](crate::LogScope) belongs to.
///
/// An identity is created once per component and shared by every scope opened on behalf of it.
/// It is never mutated after construction.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
///
/// use logscope::ScopeIdentity;
///
/// struct BizLogic;
///
/// static BIZ_LOGIC: LazyLock<ScopeIdentity> = LazyLock::new(ScopeIdentity::of::<BizLogic>);
/// static BILLING: ScopeIdentity = ScopeIdentity::from_static("billing");
///
/// assert!(BIZ_LOGIC.name().ends_with("BizLogic"));
/// assert_eq!(BILLING.name(), "billing");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdentity {
    name: Cow<'static, str>,
}

impl ScopeIdentity {
    /// Create an identity from any name, including an empty one.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Create an identity from a static name, usable in `static` items.
    pub const fn from_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// Create an identity named after the fully qualified path of `T`.
    ///
    /// Generic arguments are kept as written by [`std::any::type_name`].
    pub fn of<T: ?Sized>() -> Self {
        Self::from_static(std::any::type_name::<T>())
    }

    /// The identity name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ScopeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopeIdentity").field(&self.name()).finish()
    }
}

impl fmt::Display for ScopeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&'static str> for ScopeIdentity {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for ScopeIdentity {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Component;

    #[test]
    fn test_type_derived_identity() {
        let identity = ScopeIdentity::of::<Component>();
        assert_eq!(identity.name(), "logscope::identity::tests::Component");
    }

    #[test]
    fn test_string_identity_accepts_anything() {
        assert_eq!(ScopeIdentity::new("").name(), "");
        assert_eq!(ScopeIdentity::new(String::from("a b.c")).name(), "a b.c");
        assert_eq!(ScopeIdentity::from("x"), ScopeIdentity::from_static("x"));
    }
}
