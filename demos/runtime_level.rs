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

use std::time::Duration;

use logscope::LogState;
use logscope::ScopeIdentity;
use logscope::Severity;
use logscope::SinkConfig;
use logscope::log_scope;

static WORKER: ScopeIdentity = ScopeIdentity::from_static("MyApplication.Worker");

fn tick(round: usize) {
    let scope = log_scope!(WORKER);
    scope.verbose_with("Round {0} verbose", &[&round]);
    scope.debug_with("Round {0} debug", &[&round]);
    scope.info_with("Round {0} info", &[&round]);
    scope.warning_with("Round {0} warning", &[&round]);
}

fn main() {
    let config = SinkConfig::production_with_console()
        .with_destination("logs/RuntimeLevel_.slog")
        .with_output_format("{timestamp} {level} {elapsed:>10} {call_site:>30} {message}");
    LogState::global().setup(&config).unwrap();

    let state = LogState::global();
    for (round, level) in [
        Severity::Verbose,
        Severity::Information,
        Severity::Warning,
        Severity::Debug,
    ]
    .into_iter()
    .enumerate()
    {
        if state.set_minimum_level(level) {
            println!("minimum level is now {}", level.name());
        }
        // trace entry and exit of every other round
        state.set_in_out_enabled(round % 2 == 1);
        tick(round);
        std::thread::sleep(Duration::from_millis(100));
    }

    state.flush();
}
