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

//! Macros capturing the caller name of a scope.

/// Expand to the name of the enclosing function, without its module path.
///
/// Closures are skipped, so the name is the one of the function the closure is written in.
///
/// # Examples
///
/// ```
/// fn submit_order() -> &'static str {
///     logscope::function_name!()
/// }
///
/// assert_eq!(submit_order(), "submit_order");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let mut name = name;
        while let Some(stripped) = name.strip_suffix("::{{closure}}") {
            name = stripped;
        }
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Open a [`LogScope`](crate::LogScope) named after the enclosing function.
///
/// The identity must outlive the scope; a `static` [`ScopeIdentity`](crate::ScopeIdentity) is
/// the usual choice. Pass a [`LogState`](crate::LogState) first to open the scope against it
/// instead of the process-wide state.
///
/// # Examples
///
/// ```
/// use logscope::LogState;
/// use logscope::ScopeIdentity;
/// use logscope::log_scope;
///
/// static BIZ_LOGIC: ScopeIdentity = ScopeIdentity::from_static("MyApplication.BizLogic");
///
/// fn execute(state: &LogState) -> String {
///     let scope = log_scope!(state, BIZ_LOGIC);
///     scope.call_site().to_string()
/// }
///
/// let state = LogState::new();
/// state.install(logscope::builder().build());
/// assert_eq!(execute(&state), "MyApplication.BizLogic.execute");
/// ```
#[macro_export]
macro_rules! log_scope {
    ($identity:expr) => {
        $crate::LogScope::open(&$identity, $crate::function_name!())
    };
    ($state:expr, $identity:expr) => {
        $crate::LogScope::open_in($state, &$identity, $crate::function_name!())
    };
}

#[cfg(test)]
mod tests {
    use crate::LogState;
    use crate::ScopeIdentity;

    static IDENTITY: ScopeIdentity = ScopeIdentity::from_static("Macros");

    fn outer() -> &'static str {
        let inner = || crate::function_name!();
        inner()
    }

    #[test]
    fn test_function_name() {
        assert_eq!(crate::function_name!(), "test_function_name");
        assert_eq!(outer(), "outer");
    }

    #[test]
    fn test_log_scope_with_state() {
        let state = LogState::new();
        state.install(crate::builder().build());
        let scope = log_scope!(&state, IDENTITY);
        assert_eq!(scope.call_site(), "Macros.test_log_scope_with_state");
    }
}
