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
use std::path::PathBuf;

use logscope::LogScope;
use logscope::LogState;
use logscope::ScopeIdentity;
use logscope::Severity;
use logscope::SinkConfig;
use logscope::config::RollingPeriod;
use tempfile::TempDir;

static ORDERS: ScopeIdentity = ScopeIdentity::from_static("MyApplication.Orders");

fn log_files(dir: &TempDir) -> Vec<PathBuf> {
    let mut files = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    files.sort();
    files
}

#[test]
fn test_lines_written_by_the_default_format() {
    let temp_dir = TempDir::new().unwrap();
    let state = LogState::new();
    let config = SinkConfig::production()
        .with_destination(temp_dir.path().join("orders_.slog").to_string_lossy())
        .with_rolling_period(RollingPeriod::Infinite);
    state.setup(&config).unwrap();

    {
        let scope = LogScope::open_in(&state, &ORDERS, "place");
        scope.info_with("Placing {Count} orders", &[&3]);
        scope.debug("not written");
        scope.error("Failed to place");
    }
    state.flush();

    let files = log_files(&temp_dir);
    assert_eq!(files, vec![temp_dir.path().join("orders_.slog")]);

    let content = fs::read_to_string(&files[0]).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "{content}");

    let call_site = format!("{:>75}", "MyApplication.Orders.place");
    assert!(lines[0].contains(" INF "), "{}", lines[0]);
    assert!(
        lines[0].ends_with(&format!("{call_site} Placing 3 orders")),
        "{}",
        lines[0]
    );
    assert!(lines[1].contains(" ERR "), "{}", lines[1]);
    assert!(
        lines[1].ends_with(&format!("{call_site} Failed to place")),
        "{}",
        lines[1]
    );

    // 2026-01-29 20:18:45.702
    let timestamp = &lines[0][..23];
    assert_eq!(timestamp.as_bytes()[10], b' ');
    assert_eq!(timestamp.as_bytes()[19], b'.');
}

#[test]
fn test_daily_file_name_and_custom_format() {
    let temp_dir = TempDir::new().unwrap();
    let state = LogState::new();
    let config = SinkConfig::production()
        .with_destination(temp_dir.path().join("daily_.slog").to_string_lossy())
        .with_output_format("{level}|{method}|{call_site}|{message}")
        .with_minimum_severity(Severity::Verbose)
        .with_multi_process_write(false);
    state.setup(&config).unwrap();
    assert_eq!(state.minimum_level(), Severity::Verbose);

    {
        let scope = LogScope::open_in(&state, &ORDERS, "ship");
        scope.verbose("tracking");
        scope.fatal("lost");
    }
    state.flush();

    let files = log_files(&temp_dir);
    assert_eq!(files.len(), 1);
    let filename = files[0].file_name().unwrap().to_str().unwrap().to_string();
    // daily_YYYYMMDD.slog
    assert_eq!(filename.len(), "daily_20260129.slog".len(), "{filename}");
    assert!(filename.starts_with("daily_") && filename.ends_with(".slog"));
    assert!(filename[6..14].bytes().all(|b| b.is_ascii_digit()));

    let content = fs::read_to_string(&files[0]).unwrap();
    assert_eq!(
        content,
        "VRB||MyApplication.Orders.ship|tracking\nFTL|ship|MyApplication.Orders.ship|lost\n"
    );
}

#[test]
fn test_re_setup_switches_files() {
    let temp_dir = TempDir::new().unwrap();
    let state = LogState::new();
    let config = |name: &str| {
        SinkConfig::production()
            .with_destination(temp_dir.path().join(name).to_string_lossy())
            .with_rolling_period(RollingPeriod::Infinite)
            .with_output_format("{message}")
    };

    state.setup(&config("first.slog")).unwrap();
    let scope = LogScope::open_in(&state, &ORDERS, "switch");
    scope.info("one");

    state.setup(&config("second.slog")).unwrap();
    scope.info("two");
    drop(scope);
    state.flush();

    let first = fs::read_to_string(temp_dir.path().join("first.slog")).unwrap();
    let second = fs::read_to_string(temp_dir.path().join("second.slog")).unwrap();
    assert_eq!(first, "one\n");
    assert_eq!(second, "two\n");
}
