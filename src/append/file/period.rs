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
use std::str::FromStr;

use jiff::Span;
use jiff::Zoned;

use crate::Error;

/// How often a new log file is started.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollingPeriod {
    /// Keep writing the same file.
    Infinite,
    /// A new file every calendar year.
    Year,
    /// A new file every calendar month.
    Month,
    /// A new file every day, at local midnight.
    #[default]
    Day,
    /// A new file every hour.
    Hour,
    /// A new file every minute.
    Minute,
}

impl RollingPeriod {
    /// The `strftime` format of the period stamp embedded in file names.
    pub(crate) fn stamp_format(&self) -> Option<&'static str> {
        match self {
            RollingPeriod::Infinite => None,
            RollingPeriod::Year => Some("%Y"),
            RollingPeriod::Month => Some("%Y%m"),
            RollingPeriod::Day => Some("%Y%m%d"),
            RollingPeriod::Hour => Some("%Y%m%d%H"),
            RollingPeriod::Minute => Some("%Y%m%d%H%M"),
        }
    }

    /// The number of digits of the period stamp.
    pub(crate) fn stamp_len(&self) -> usize {
        match self {
            RollingPeriod::Infinite => 0,
            RollingPeriod::Year => 4,
            RollingPeriod::Month => 6,
            RollingPeriod::Day => 8,
            RollingPeriod::Hour => 10,
            RollingPeriod::Minute => 12,
        }
    }

    /// The stamp of the period containing `now`; empty for [`RollingPeriod::Infinite`].
    pub(crate) fn stamp(&self, now: &Zoned) -> String {
        match self.stamp_format() {
            None => String::new(),
            Some(format) => now.strftime(format).to_string(),
        }
    }

    /// The start of the period after the one containing `now`.
    pub(crate) fn next_boundary(&self, now: &Zoned) -> Result<Option<Zoned>, jiff::Error> {
        let (start, step) = match self {
            RollingPeriod::Infinite => return Ok(None),
            RollingPeriod::Year => (
                now.first_of_year()?.start_of_day()?,
                Span::new().years(1),
            ),
            RollingPeriod::Month => (
                now.first_of_month()?.start_of_day()?,
                Span::new().months(1),
            ),
            RollingPeriod::Day => (now.start_of_day()?, Span::new().days(1)),
            RollingPeriod::Hour => (
                now.with()
                    .minute(0)
                    .second(0)
                    .subsec_nanosecond(0)
                    .build()?,
                Span::new().hours(1),
            ),
            RollingPeriod::Minute => (
                now.with().second(0).subsec_nanosecond(0).build()?,
                Span::new().minutes(1),
            ),
        };
        start.checked_add(step).map(Some)
    }

    fn as_str(&self) -> &'static str {
        match self {
            RollingPeriod::Infinite => "Infinite",
            RollingPeriod::Year => "Year",
            RollingPeriod::Month => "Month",
            RollingPeriod::Day => "Day",
            RollingPeriod::Hour => "Hour",
            RollingPeriod::Minute => "Minute",
        }
    }
}

impl fmt::Display for RollingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollingPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infinite" | "never" => Ok(RollingPeriod::Infinite),
            "year" | "yearly" => Ok(RollingPeriod::Year),
            "month" | "monthly" => Ok(RollingPeriod::Month),
            "day" | "daily" => Ok(RollingPeriod::Day),
            "hour" | "hourly" => Ok(RollingPeriod::Hour),
            "minute" | "minutely" => Ok(RollingPeriod::Minute),
            _ => Err(Error::invalid_argument(format!(
                "unknown rolling period: {s:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_next_boundary() {
        let now = Zoned::from_str("2024-08-10T17:12:52+08[+08]").unwrap();
        let next = |period: RollingPeriod| {
            period
                .next_boundary(&now)
                .unwrap()
                .map(|z| z.timestamp().to_string())
        };

        assert_eq!(next(RollingPeriod::Infinite), None);
        assert_eq!(
            next(RollingPeriod::Minute).as_deref(),
            Some("2024-08-10T09:13:00Z")
        );
        assert_eq!(
            next(RollingPeriod::Hour).as_deref(),
            Some("2024-08-10T10:00:00Z")
        );
        assert_eq!(
            next(RollingPeriod::Day).as_deref(),
            Some("2024-08-10T16:00:00Z")
        );
        assert_eq!(
            next(RollingPeriod::Month).as_deref(),
            Some("2024-08-31T16:00:00Z")
        );
        assert_eq!(
            next(RollingPeriod::Year).as_deref(),
            Some("2024-12-31T16:00:00Z")
        );
    }

    #[test]
    fn test_stamps() {
        let now = Zoned::from_str("2026-01-29T20:18:45+00[UTC]").unwrap();
        assert_eq!(RollingPeriod::Infinite.stamp(&now), "");
        assert_eq!(RollingPeriod::Year.stamp(&now), "2026");
        assert_eq!(RollingPeriod::Month.stamp(&now), "202601");
        assert_eq!(RollingPeriod::Day.stamp(&now), "20260129");
        assert_eq!(RollingPeriod::Hour.stamp(&now), "2026012920");
        assert_eq!(RollingPeriod::Minute.stamp(&now), "202601292018");

        for period in [
            RollingPeriod::Year,
            RollingPeriod::Month,
            RollingPeriod::Day,
            RollingPeriod::Hour,
            RollingPeriod::Minute,
        ] {
            assert_eq!(period.stamp(&now).len(), period.stamp_len());
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Day".parse::<RollingPeriod>().unwrap(), RollingPeriod::Day);
        assert_eq!(
            " hourly ".parse::<RollingPeriod>().unwrap(),
            RollingPeriod::Hour
        );
        assert_eq!(
            "Infinite".parse::<RollingPeriod>().unwrap(),
            RollingPeriod::Infinite
        );
        let err = "fortnight".parse::<RollingPeriod>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
