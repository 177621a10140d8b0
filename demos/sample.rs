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

use std::sync::LazyLock;
use std::time::Duration;

use logscope::LogState;
use logscope::ScopeIdentity;
use logscope::Severity;
use logscope::SinkConfig;
use logscope::log_scope;

struct BizLogic;

static BIZ_LOGIC: LazyLock<ScopeIdentity> = LazyLock::new(ScopeIdentity::of::<BizLogic>);
static NAMED: ScopeIdentity = ScopeIdentity::from_static("MyApplication.Named");

impl BizLogic {
    fn execute(&self, items: &[u32]) {
        let scope = log_scope!(BIZ_LOGIC);
        scope.verbose("Starting");
        scope.info_with(
            "Processing execute request for a total of {0} items.",
            &[&items.len()],
        );

        for item in items {
            scope.debug_when_with(
                || item % 2 == 0,
                || "Item {Item} is even".to_string(),
                || [item],
            );
        }

        std::thread::sleep(Duration::from_millis(20));
        scope.warning_over_time(Duration::from_millis(10), "Too slow!");
    }
}

fn named() {
    let scope = log_scope!(NAMED);
    scope.error_with("Connection to {Database} lost", &[&"orders"]);
    scope.fatal_when(|| true, "Giving up");
}

fn main() {
    let config = SinkConfig::production_with_console()
        .with_destination("logs/MyApplication_.slog")
        .with_minimum_severity(Severity::Verbose)
        .apply_env()
        .unwrap();
    LogState::global().setup(&config).unwrap();
    LogState::global().set_in_out_enabled(true);

    #[cfg(feature = "bridge-log")]
    logscope::bridge::setup_log_crate();

    BizLogic.execute(&[1, 2, 3, 4]);
    named();

    #[cfg(feature = "bridge-log")]
    log::info!(target: "sample", "Hello from the log crate!");

    LogState::global().flush();
}
