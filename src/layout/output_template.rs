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

use std::str::FromStr;

use crate::Error;

/// A parsed output template, describing how a record is laid out as a line of text.
///
/// Placeholders are `{name}` or `{name:spec}`. For text fields `spec` is an alignment, `<N` or
/// `>N`; for `timestamp` it is a [`jiff::fmt::strtime`] format. `{{` and `}}` are literal
/// braces.
///
/// Known names are `timestamp`, `level`, `thread_id`, `elapsed`, `call_site`, `method`,
/// `message`, `template` and `newline`. Any other name renders the record or context property
/// of that name, or nothing if it is absent.
///
/// # Examples
///
/// ```
/// use logscope::layout::OutputTemplate;
///
/// let template: OutputTemplate = "{level} {call_site:<20} {message}".parse().unwrap();
/// assert!("{level".parse::<OutputTemplate>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Timestamp(Option<String>),
    Field(Field, Option<Align>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Field {
    Level,
    ThreadId,
    Elapsed,
    CallSite,
    Method,
    Message,
    Template,
    NewLine,
    Property(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left(usize),
    Right(usize),
}

impl Align {
    pub(crate) fn apply(&self, text: &str) -> String {
        match *self {
            Align::Left(width) => format!("{text:<width$}"),
            Align::Right(width) => format!("{text:>width$}"),
        }
    }
}

impl OutputTemplate {
    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn parse_placeholder(content: &str) -> Result<Segment, Error> {
    let (name, spec) = match content.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec)),
        None => (content.trim(), None),
    };

    if name.is_empty() {
        return Err(Error::invalid_configuration("empty placeholder in output template"));
    }

    if name.eq_ignore_ascii_case("timestamp") {
        return match spec {
            Some(spec) if spec.trim().is_empty() => Err(Error::invalid_configuration(
                "empty timestamp format in output template",
            )),
            spec => Ok(Segment::Timestamp(spec.map(str::to_string))),
        };
    }

    let field = match name.to_ascii_lowercase().as_str() {
        "level" => Field::Level,
        "thread_id" => Field::ThreadId,
        "elapsed" => Field::Elapsed,
        "call_site" => Field::CallSite,
        "method" => Field::Method,
        "message" => Field::Message,
        "template" => Field::Template,
        "newline" => Field::NewLine,
        _ => Field::Property(name.to_string()),
    };

    let align = match spec {
        None => None,
        Some(spec) => {
            let spec = spec.trim();
            let (left, width) = if let Some(width) = spec.strip_prefix('<') {
                (true, width)
            } else if let Some(width) = spec.strip_prefix('>') {
                (false, width)
            } else {
                (false, spec)
            };
            let width = usize::from_str(width).map_err(|err| {
                Error::invalid_configuration(format!("malformed alignment: {spec:?}"))
                    .with_context("placeholder", name)
                    .with_source(err)
            })?;
            Some(if left {
                Align::Left(width)
            } else {
                Align::Right(width)
            })
        }
    };

    Ok(Segment::Field(field, align))
}

impl FromStr for OutputTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(Error::invalid_configuration(
                "output format must not be blank",
            ));
        }

        let mut segments = vec![];
        let mut literal = String::new();
        let mut rest = s;

        while !rest.is_empty() {
            let Some(pos) = rest.find(['{', '}']) else {
                literal.push_str(rest);
                break;
            };
            literal.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if rest.starts_with("{{") {
                literal.push('{');
                rest = &rest[2..];
            } else if rest.starts_with("}}") {
                literal.push('}');
                rest = &rest[2..];
            } else if rest.starts_with('}') {
                return Err(Error::invalid_configuration(
                    "unmatched '}' in output template",
                )
                .with_context("template", s));
            } else {
                let end = rest.find('}').ok_or_else(|| {
                    Error::invalid_configuration("unclosed '{' in output template")
                        .with_context("template", s)
                })?;
                let content = &rest[1..end];
                if content.contains('{') {
                    return Err(Error::invalid_configuration(
                        "nested '{' in output template",
                    )
                    .with_context("template", s));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_placeholder(content)?);
                rest = &rest[end + 1..];
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(OutputTemplate { segments })
    }
}
