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

//! Logscope is a scope-based logging library: a unit of work opens a [`LogScope`], and every
//! record emitted through it is enriched with the scope's call site and the time elapsed since
//! the scope was opened.
//!
//! # Overview
//!
//! A scope is identified by a [`ScopeIdentity`], usually the component or type doing the work,
//! and a caller name, usually the function. Records are gated by a runtime-adjustable minimum
//! [`Severity`] before any message is rendered, and are written through a [`Logger`] made of
//! dispatches, filters and appenders. The default sink writes to a rolling log file and can
//! mirror to the console.
//!
//! # Examples
//!
//! Log through the default sink, set up on first use:
//!
//! ```no_run
//! use logscope::ScopeIdentity;
//! use logscope::log_scope;
//!
//! static BIZ_LOGIC: ScopeIdentity = ScopeIdentity::from_static("MyApplication.BizLogic");
//!
//! fn execute(items: &[u32]) {
//!     let scope = log_scope!(BIZ_LOGIC);
//!     scope.info_with(
//!         "Processing execute request for a total of {0} items.",
//!         &[&items.len()],
//!     );
//! }
//!
//! execute(&[1, 2, 3]);
//! ```
//!
//! Set up the sink explicitly and change the minimum severity at runtime:
//!
//! ```no_run
//! use logscope::LogState;
//! use logscope::Severity;
//! use logscope::SinkConfig;
//!
//! let config = SinkConfig::production_with_console()
//!     .with_destination("logs/orders_.slog")
//!     .with_minimum_severity(Severity::Debug);
//! LogState::global().setup(&config).unwrap();
//!
//! LogState::global().set_minimum_level(Severity::Warning);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod config;
pub mod diagnostic;
pub mod filter;
pub mod kv;
pub mod layout;
pub mod record;
pub mod template;
pub mod trap;

pub use append::Append;
pub use config::Locale;
pub use config::SinkConfig;
pub use diagnostic::Diagnostic;
pub use filter::Filter;
pub use layout::Layout;
pub use trap::Trap;

mod elapsed;
pub use elapsed::format_elapsed;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod gate;
pub use gate::SeverityGate;
pub use gate::TraceSwitch;

mod identity;
pub use identity::ScopeIdentity;

mod logger;
pub use logger::*;

mod macros;

mod scope;
pub use scope::CALL_SITE_PROPERTY;
pub use scope::ELAPSED_PROPERTY;
pub use scope::LogScope;
pub use scope::METHOD_PROPERTY;
pub use scope::UNKNOWN_CALLER;

mod severity;
pub use severity::Severity;

mod state;
pub use state::LogState;
