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

use std::fmt::Write;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Diagnostic;
use crate::Error;
use crate::Layout;
use crate::Severity;
use crate::kv::CollectVisitor;
use crate::layout::output_template::Field;
use crate::layout::output_template::OutputTemplate;
use crate::layout::output_template::Segment;
use crate::record::Record;
use crate::scope::CALL_SITE_PROPERTY;
use crate::scope::ELAPSED_PROPERTY;
use crate::scope::METHOD_PROPERTY;

/// The output format used when none is configured.
///
/// Renders lines such as:
///
/// ```text
/// 2026-01-29 20:18:45.702 INF 13     10.0ms                MyApplication::BizLogic.execute Processing 408 items.
/// ```
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "{timestamp} {level} {thread_id:>2} {elapsed:>10} {call_site:>75} {message}";

/// A layout that formats a log record as a line of text following an [`OutputTemplate`].
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logscope::layout::TextLayout;
///
/// let layout = TextLayout::default().timezone(TimeZone::UTC);
/// let custom = TextLayout::new("{level} {message}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    template: OutputTemplate,
    timezone: TimeZone,
    decimal_separator: char,
    colored: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            template: DEFAULT_OUTPUT_FORMAT
                .parse()
                .expect("the default output format must be valid"),
            timezone: TimeZone::system(),
            decimal_separator: '.',
            colored: false,
        }
    }
}

impl TextLayout {
    /// Create a layout rendering the given output format.
    ///
    /// # Errors
    ///
    /// Return an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if the
    /// format is blank or malformed.
    pub fn new(output_format: &str) -> Result<Self, Error> {
        let template = output_format.parse()?;
        Ok(Self {
            template,
            ..Self::default()
        })
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the decimal separator used when rendering the elapsed bucket. Default to `.`.
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Color the severity code.
    ///
    /// No effect unless the `colored` feature is enabled.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn format_level(&self, level: Severity, text: String) -> String {
        #[cfg(feature = "colored")]
        if self.colored {
            use colored::Color;
            use colored::Colorize;

            let color = match level {
                Severity::Verbose => Color::Magenta,
                Severity::Debug => Color::Blue,
                Severity::Information => Color::Green,
                Severity::Warning => Color::Yellow,
                Severity::Error => Color::Red,
                Severity::Fatal => Color::BrightRed,
            };
            return text.color(color).to_string();
        }

        let _ = level;
        text
    }

    fn format_timestamp(&self, record: &Record, format: Option<&str>) -> Result<String, Error> {
        let ts = Timestamp::try_from(record.time())
            .map_err(|err| Error::new("record time is out of range").with_source(err))?;
        let zoned = ts.to_zoned(self.timezone.clone());

        let mut text = String::new();
        match format {
            Some(format) => write!(&mut text, "{}", zoned.strftime(format)),
            None => write!(
                &mut text,
                "{}.{:03}",
                zoned.strftime("%Y-%m-%d %H:%M:%S"),
                zoned.millisecond()
            ),
        }
        .map_err(Error::from_fmt_error)?;
        Ok(text)
    }
}

fn lookup<'a>(record: &'a Record, context: &'a [(String, String)], key: &str) -> Option<&'a str> {
    record
        .properties()
        .iter()
        .rev()
        .chain(context.iter().rev())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl Layout for TextLayout {
    fn format(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<Vec<u8>, Error> {
        let mut visitor = CollectVisitor::default();
        for d in diags {
            d.visit(&mut visitor)?;
        }
        let context = visitor.pairs;

        let mut text = String::new();
        for segment in self.template.segments() {
            let (field, align) = match segment {
                Segment::Literal(literal) => {
                    text.push_str(literal);
                    continue;
                }
                Segment::Timestamp(format) => {
                    text.push_str(&self.format_timestamp(record, format.as_deref())?);
                    continue;
                }
                Segment::Field(field, align) => (field, align),
            };

            let value = match field {
                Field::Level => record.level().code().to_string(),
                Field::ThreadId => record.thread_id().to_string(),
                Field::Elapsed => {
                    let elapsed = lookup(record, &context, ELAPSED_PROPERTY).unwrap_or_default();
                    if self.decimal_separator == '.' {
                        elapsed.to_string()
                    } else {
                        elapsed.replace('.', &self.decimal_separator.to_string())
                    }
                }
                Field::CallSite => lookup(record, &context, CALL_SITE_PROPERTY)
                    .unwrap_or(record.target())
                    .to_string(),
                Field::Method => lookup(record, &context, METHOD_PROPERTY)
                    .unwrap_or_default()
                    .to_string(),
                Field::Message => record.message().to_string(),
                Field::Template => record.template().to_string(),
                Field::NewLine => "\n".to_string(),
                Field::Property(name) => lookup(record, &context, name)
                    .unwrap_or_default()
                    .to_string(),
            };

            let value = match align {
                Some(align) => align.apply(&value),
                None => value,
            };

            if matches!(field, Field::Level) {
                text.push_str(&self.format_level(record.level(), value));
            } else {
                text.push_str(&value);
            }
        }

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::SystemTime;

    use super::*;
    use crate::diagnostic::LogContext;
    use crate::diagnostic::ProcessDiagnostic;

    fn at_epoch_plus(millis: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(millis)
    }

    fn render(layout: &TextLayout, record: &Record) -> String {
        let diags: Vec<Box<dyn Diagnostic>> = vec![Box::new(LogContext::default())];
        String::from_utf8(layout.format(record, &diags).unwrap()).unwrap()
    }

    #[test]
    fn test_default_line_shape() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let record = Record::builder()
            .time(at_epoch_plus(1_769_717_925_702))
            .level(Severity::Information)
            .message("Processing execute request for a total of 408 items.")
            .build();

        let _call_site = LogContext::push_property(CALL_SITE_PROPERTY, "app::BizLogic.execute");
        let _elapsed = LogContext::push_property(ELAPSED_PROPERTY, "10.0ms");
        let line = render(&layout, &record);

        let fields = line.split_whitespace().collect::<Vec<_>>();
        assert_eq!(fields[0], "2026-01-29");
        assert_eq!(fields[1], "20:18:45.702");
        assert_eq!(fields[2], "INF");
        assert_eq!(fields[3], record.thread_id().to_string());
        assert_eq!(fields[4], "10.0ms");
        assert_eq!(fields[5], "app::BizLogic.execute");
        assert_eq!(
            fields[6..].join(" "),
            "Processing execute request for a total of 408 items."
        );
    }

    #[test]
    fn test_custom_template_with_properties() {
        let layout = TextLayout::new("{level:<5}|{method}|{Database}|{Missing}|{template}")
            .unwrap()
            .timezone(TimeZone::UTC);
        let properties = vec![("Database".to_string(), "orders".to_string())];
        let record = Record::builder()
            .level(Severity::Error)
            .template("connect {Database}")
            .message("connect orders")
            .properties(&properties)
            .build();

        let _method = LogContext::push_property(METHOD_PROPERTY, "execute");
        insta::assert_snapshot!(render(&layout, &record), @"ERR  |execute|orders||connect {Database}");
    }

    #[test]
    fn test_decimal_separator_applies_to_elapsed() {
        let layout = TextLayout::new("{elapsed}").unwrap().decimal_separator(',');
        let record = Record::builder().build();

        let _elapsed = LogContext::push_property(ELAPSED_PROPERTY, "2.50S");
        assert_eq!(render(&layout, &record), "2,50S");
    }

    #[test]
    fn test_call_site_falls_back_to_target() {
        let layout = TextLayout::new("{call_site} {message}").unwrap();
        let record = Record::builder().target("hyper::client").message("hi").build();
        assert_eq!(render(&layout, &record), "hyper::client hi");
    }

    #[test]
    fn test_process_id_placeholder() {
        let layout = TextLayout::new("[{ProcessId}] {message}").unwrap();
        let record = Record::builder().message("started").build();
        let diags: Vec<Box<dyn Diagnostic>> = vec![
            Box::new(ProcessDiagnostic::default()),
            Box::new(LogContext::default()),
        ];

        let line = String::from_utf8(layout.format(&record, &diags).unwrap()).unwrap();
        assert_eq!(line, format!("[{}] started", std::process::id()));
    }

    #[test]
    fn test_custom_timestamp_format() {
        let layout = TextLayout::new("{timestamp:%Y/%m/%d}")
            .unwrap()
            .timezone(TimeZone::UTC);
        let record = Record::builder().time(at_epoch_plus(0)).build();
        assert_eq!(render(&layout, &record), "1970/01/01");
    }
}
