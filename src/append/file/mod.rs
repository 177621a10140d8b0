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

//! Appender for writing log records to period-stamped rolling files.
//!
//! # Example
//!
//!```
//! use std::num::NonZeroUsize;
//!
//! use logscope::append::file::RollingFileBuilder;
//! use logscope::config::RollingPeriod;
//! use logscope::layout::TextLayout;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let rolling = RollingFileBuilder::new(dir.path().join("MyApplication_.slog"))
//!     .layout(TextLayout::default())
//!     .period(RollingPeriod::Day)
//!     .max_log_files(NonZeroUsize::new(10).unwrap())
//!     .shared(true)
//!     .build()
//!     .unwrap();
//!
//! logscope::builder()
//!     .dispatch(|d| d.append(rolling))
//!     .build();
//! ```

pub use self::append::RollingFile;
pub use self::append::RollingFileBuilder;
pub use self::period::RollingPeriod;
pub use self::rolling::RollingFileWriter;
pub use self::rolling::RollingFileWriterBuilder;

mod append;
mod clock;
mod period;
mod rolling;
