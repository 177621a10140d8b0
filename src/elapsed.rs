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

const ONE_MILLISECOND: Duration = Duration::from_millis(1);
const MILLISECOND_CAP: Duration = Duration::from_millis(2500);
const TEN_SECONDS: Duration = Duration::from_secs(10);
const ONE_MINUTE: Duration = Duration::from_secs(60);
const TWO_MINUTES: Duration = Duration::from_secs(120);
const TEN_MINUTES: Duration = Duration::from_secs(600);

/// Format an elapsed duration into a short human bucket.
///
/// | elapsed             | output      |
/// |---------------------|-------------|
/// | `>= 10min`          | `>10M`      |
/// | `< 1ms`             | `<1ms`      |
/// | `< 2500ms`          | `123.4ms`   |
/// | `< 60s`             | `12.34S`    |
/// | `< 2min`            | `1.25M`     |
/// | `< 10min`           | `7.5M`      |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use logscope::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_micros(250)), "<1ms");
/// assert_eq!(format_elapsed(Duration::from_millis(42)), "42.0ms");
/// assert_eq!(format_elapsed(Duration::from_millis(2500)), "2.50S");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed >= TEN_MINUTES {
        return ">10M".to_string();
    }
    if elapsed < ONE_MILLISECOND {
        return "<1ms".to_string();
    }
    if elapsed < MILLISECOND_CAP {
        let millis = elapsed.as_nanos() as f64 / 1_000_000.0;
        return format!("{millis:.1}ms");
    }

    let seconds = elapsed.as_secs_f64();
    if elapsed < TEN_SECONDS {
        return format!("{seconds:.2}S");
    }
    // kept apart from the branch above: both render seconds
    if elapsed < ONE_MINUTE {
        return format!("{seconds:.2}S");
    }

    let minutes = seconds / 60.0;
    if elapsed < TWO_MINUTES {
        return format!("{minutes:.2}M");
    }
    if elapsed < TEN_MINUTES {
        return format!("{minutes:.1}M");
    }

    ">10M".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_sub_millisecond() {
        assert_eq!(format_elapsed(Duration::ZERO), "<1ms");
        assert_eq!(format_elapsed(Duration::from_micros(999)), "<1ms");
        assert_eq!(format_elapsed(ms(1)), "1.0ms");
    }

    #[test]
    fn test_millisecond_bucket() {
        assert_eq!(format_elapsed(ms(999)), "999.0ms");
        assert_eq!(format_elapsed(Duration::from_micros(12_340)), "12.3ms");
        assert_eq!(format_elapsed(ms(2499)), "2499.0ms");
    }

    #[test]
    fn test_second_buckets() {
        assert_eq!(format_elapsed(ms(2500)), "2.50S");
        assert_eq!(format_elapsed(ms(9999)), "10.00S");
        assert_eq!(format_elapsed(ms(10_000)), "10.00S");
        assert_eq!(format_elapsed(ms(59_990)), "59.99S");
    }

    #[test]
    fn test_minute_buckets() {
        assert_eq!(format_elapsed(ms(60_000)), "1.00M");
        assert_eq!(format_elapsed(ms(90_000)), "1.50M");
        assert_eq!(format_elapsed(ms(120_000)), "2.0M");
        assert_eq!(format_elapsed(ms(450_000)), "7.5M");
    }

    #[test]
    fn test_ten_minutes_and_beyond() {
        assert_eq!(format_elapsed(ms(600_000)), ">10M");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), ">10M");
        // just under the cap still renders minutes
        assert_eq!(format_elapsed(ms(599_000)), "10.0M");
    }
}
