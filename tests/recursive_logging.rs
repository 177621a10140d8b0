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

use std::fmt;

use logscope::Diagnostic;
use logscope::Error;
use logscope::Layout;
use logscope::LogScope;
use logscope::LogState;
use logscope::ScopeIdentity;
use logscope::Severity;
use logscope::append;
use logscope::append::file::RollingFileBuilder;
use logscope::filter::GateFilter;
use logscope::record::Record;

static OUTER: ScopeIdentity = ScopeIdentity::from_static("Recursive.Outer");
static NESTED: ScopeIdentity = ScopeIdentity::from_static("Recursive.Nested");

#[derive(Debug)]
struct CustomLayout(&'static str);

impl Layout for CustomLayout {
    fn format(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<Vec<u8>, Error> {
        let _ = diags;
        Ok(format!("{} [{}] {}", self.0, record.level(), record.message()).into_bytes())
    }
}

struct Thing<'a> {
    state: &'a LogState,
    name: &'a str,
}

impl fmt::Display for Thing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scope = LogScope::open_in(self.state, &NESTED, "fmt");
        scope.debug_with("formatting wrapping ({0})", &[&self.name]);
        f.write_str(self.name)
    }
}

// a record may be emitted while the arguments of another one are rendered
#[test]
fn test_logging_while_rendering_arguments() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state = LogState::new();
    let memory = append::Memory::default().with_layout(CustomLayout("mem"));
    let rolling = RollingFileBuilder::new(temp_dir.path().join("recursive_.slog"))
        .layout(CustomLayout("file"))
        .build()
        .unwrap();
    let path = rolling.current_path();

    state.install(
        logscope::builder()
            .dispatch(|d| {
                d.filter(GateFilter::new(state.gate().clone()))
                    .append(memory.clone())
            })
            .dispatch(|d| {
                d.filter(GateFilter::new(state.gate().clone()))
                    .append(rolling)
            })
            .dispatch(|d| d.append(append::Testing::default().with_layout(CustomLayout("test"))))
            .build(),
    );
    state.set_minimum_level(Severity::Verbose);

    {
        let scope = LogScope::open_in(&state, &OUTER, "render");
        let thing = Thing {
            state: &state,
            name: "a",
        };
        scope.info_with("outer {0}", &[&thing]);
    }
    state.flush();

    assert_eq!(memory.lines(), vec![
        "mem [DBG] formatting wrapping (a)".to_string(),
        "mem [INF] outer a".to_string(),
    ]);

    let records = memory.records();
    assert_eq!(records[0].property("CallSite"), Some("Recursive.Nested.fmt"));
    assert_eq!(records[1].property("CallSite"), Some("Recursive.Outer.render"));

    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        content,
        "file [DBG] formatting wrapping (a)\nfile [INF] outer a\n"
    );
}
