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

//! Message templates with positional arguments.
//!
//! A template is plain text with holes:
//!
//! * `{0}`, `{1}`, ... pick the argument at that index;
//! * `{Name}` binds the next unused argument, in order of appearance, and also records
//!   `Name=value` as a property of the record;
//! * `{{` and `}}` are literal braces.
//!
//! Rendering is best effort: a hole without a matching argument, or anything that does not
//! look like a hole, is written as-is.

use std::fmt;
use std::fmt::Write;

/// The outcome of rendering a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    /// The rendered text.
    pub text: String,
    /// `(name, value)` pairs captured by named holes.
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, PartialEq, Eq)]
enum Hole<'a> {
    Positional(usize),
    Named(&'a str),
}

fn parse_hole(content: &str) -> Option<Hole<'_>> {
    // destructuring hints are accepted and ignored
    let content = content
        .strip_prefix('@')
        .or_else(|| content.strip_prefix('$'))
        .unwrap_or(content);

    if content.is_empty() {
        return None;
    }
    if content.bytes().all(|b| b.is_ascii_digit()) {
        return content.parse().ok().map(Hole::Positional);
    }
    if content.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some(Hole::Named(content));
    }
    None
}

/// Render `template` with `args`.
///
/// # Examples
///
/// ```
/// use logscope::template::render;
///
/// let rendered = render("Processing {0} of {1}", &[&3, &408]);
/// assert_eq!(rendered.text, "Processing 3 of 408");
///
/// let rendered = render("Connecting to {Database}", &[&"orders"]);
/// assert_eq!(rendered.text, "Connecting to orders");
/// assert_eq!(rendered.properties, vec![("Database".to_string(), "orders".to_string())]);
/// ```
pub fn render(template: &str, args: &[&dyn fmt::Display]) -> RenderedMessage {
    let mut rendered = RenderedMessage {
        text: String::with_capacity(template.len()),
        properties: vec![],
    };
    let mut next_named = 0;
    let mut rest = template;

    while !rest.is_empty() {
        let Some(pos) = rest.find(['{', '}']) else {
            rendered.text.push_str(rest);
            break;
        };

        rendered.text.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with("{{") {
            rendered.text.push('{');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with("}}") {
            rendered.text.push('}');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with('}') {
            rendered.text.push('}');
            rest = &rest[1..];
            continue;
        }

        // rest starts with a single '{'
        let Some(end) = rest.find('}') else {
            rendered.text.push_str(rest);
            break;
        };
        let raw = &rest[..=end];
        rest = &rest[end + 1..];

        let arg = match parse_hole(&raw[1..raw.len() - 1]) {
            Some(Hole::Positional(index)) => args.get(index).map(|arg| (None, *arg)),
            Some(Hole::Named(name)) => {
                let arg = args.get(next_named).map(|arg| (Some(name), *arg));
                next_named += 1;
                arg
            }
            None => None,
        };

        match arg {
            None => rendered.text.push_str(raw),
            Some((name, arg)) => {
                let start = rendered.text.len();
                // a failing Display impl leaves the hole as-is
                if write!(&mut rendered.text, "{arg}").is_err() {
                    rendered.text.truncate(start);
                    rendered.text.push_str(raw);
                    continue;
                }
                if let Some(name) = name {
                    let value = rendered.text[start..].to_string();
                    rendered.properties.push((name.to_string(), value));
                }
            }
        }
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let rendered = render("Hello world", &[]);
        assert_eq!(rendered.text, "Hello world");
        assert!(rendered.properties.is_empty());
    }

    #[test]
    fn test_positional_holes() {
        assert_eq!(render("TraceMarker{0}Done", &[&6]).text, "TraceMarker6Done");
        assert_eq!(render("{1}-{0}-{1}", &[&"a", &"b"]).text, "b-a-b");
    }

    #[test]
    fn test_named_holes_bind_in_order() {
        let rendered = render("{User} bought {Count} items", &[&"ann", &3]);
        assert_eq!(rendered.text, "ann bought 3 items");
        assert_eq!(
            rendered.properties,
            vec![
                ("User".to_string(), "ann".to_string()),
                ("Count".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_destructuring_hint_is_ignored() {
        assert_eq!(render("to @{Database}", &[]).text, "to @{Database}");
        assert_eq!(render("to {@Database}", &[&"db"]).text, "to db");
    }

    #[test]
    fn test_missing_arguments_render_verbatim() {
        assert_eq!(render("{0} and {1}", &[&"x"]).text, "x and {1}");
        assert_eq!(render("needs {Name}", &[]).text, "needs {Name}");
    }

    #[test]
    fn test_escapes_and_malformed_holes() {
        assert_eq!(render("{{literal}}", &[&1]).text, "{literal}");
        assert_eq!(render("a } b", &[]).text, "a } b");
        assert_eq!(render("open { end", &[&1]).text, "open { end");
        assert_eq!(render("{not a hole}", &[&1]).text, "{not a hole}");
        assert_eq!(render("{}", &[&1]).text, "{}");
    }

    #[test]
    fn test_failing_argument_renders_the_hole() {
        struct Broken;

        impl fmt::Display for Broken {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("partial")?;
                Err(fmt::Error)
            }
        }

        let rendered = render("value {Value} and {1}", &[&Broken, &2]);
        assert_eq!(rendered.text, "value {Value} and 2");
        assert!(rendered.properties.is_empty());
    }
}
