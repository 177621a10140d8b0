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

use jiff::Zoned;

/// Source of the wall-clock time deciding which period file a line goes to.
#[derive(Debug)]
pub(crate) enum Clock {
    System,
    #[cfg(test)]
    Manual(Zoned),
}

impl Clock {
    pub(crate) fn now(&self) -> Zoned {
        match self {
            Clock::System => Zoned::now(),
            #[cfg(test)]
            Clock::Manual(now) => now.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_now(&mut self, now: Zoned) {
        if let Clock::Manual(current) = self {
            *current = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_manual_clock_only_moves_when_told() {
        let start = Zoned::from_str("2026-01-29T23:59:59+00[UTC]").unwrap();
        let mut clock = Clock::Manual(start.clone());
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        let next = Zoned::from_str("2026-01-30T00:00:00+00[UTC]").unwrap();
        clock.set_now(next.clone());
        assert_eq!(clock.now(), next);
    }

    #[test]
    fn test_system_clock_ignores_set_now() {
        let mut clock = Clock::System;
        let fixed = Zoned::from_str("2000-01-01T00:00:00+00[UTC]").unwrap();
        clock.set_now(fixed.clone());
        assert!(clock.now() > fixed);
    }
}
