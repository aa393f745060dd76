// Compact "updated X ago" strings. The matrix only has room for two digits,
// so everything is clamped to 99.

const SECONDS_MODE_LIMIT: u64 = 90;
const MAX_MAGNITUDE: u64 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
}

impl TimeUnit {
    pub fn letter(&self) -> char {
        match *self {
            TimeUnit::Seconds => 's',
            TimeUnit::Minutes => 'm',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTime {
    pub magnitude: u8,
    pub unit: TimeUnit,
}

impl RelativeTime {
    pub fn from_elapsed_ms(elapsed_ms: u64) -> RelativeTime {
        let elapsed_s = elapsed_ms / 1000;

        let (magnitude, unit) = if elapsed_s < SECONDS_MODE_LIMIT {
            (elapsed_s, TimeUnit::Seconds)
        } else {
            (elapsed_s / 60, TimeUnit::Minutes)
        };

        return RelativeTime {
            magnitude: std::cmp::min(magnitude, MAX_MAGNITUDE) as u8,
            unit: unit,
        };
    }
}

impl std::fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        return write!(f, "{} {} ago", self.magnitude, self.unit.letter());
    }
}

pub fn format_relative_time(elapsed_ms: u64) -> String {
    return RelativeTime::from_elapsed_ms(elapsed_ms).to_string();
}
