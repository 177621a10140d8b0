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

use std::fs;

use logscope::LogScope;
use logscope::LogState;
use logscope::ScopeIdentity;
use logscope::SinkConfig;
use logscope::config::RollingPeriod;
use tempfile::TempDir;

static PAYMENTS: ScopeIdentity = ScopeIdentity::from_static("MyApplication.Payments");

#[test]
fn test_global_exclusive_sink_persists_without_flush() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("payments_.slog");
    let config = SinkConfig::production()
        .with_destination(destination.to_string_lossy())
        .with_rolling_period(RollingPeriod::Infinite)
        .with_output_format("{ProcessId} {level} {message}")
        .with_multi_process_write(false);
    LogState::global().setup(&config).unwrap();

    {
        let scope = LogScope::open(&PAYMENTS, "settle");
        scope.error("important");
    }

    // the global state is never dropped, so nothing else would write the line out
    let content = fs::read_to_string(&destination).unwrap();
    assert_eq!(content, format!("{} ERR important\n", std::process::id()));
}
