use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotLevel {
    Year,
    Month,
    Day,
}

impl SnapshotLevel {
    pub const ALL: [SnapshotLevel; 3] = [Self::Year, Self::Month, Self::Day];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }

    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Year => None,
            Self::Month => Some(Self::Year),
            Self::Day => Some(Self::Month),
        }
    }
}

impl fmt::Display for SnapshotLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator's date choice, filled in one level at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSelection {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl SnapshotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(year: &str, month: &str, day: &str) -> Self {
        Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        }
    }

    pub fn get(&self, level: SnapshotLevel) -> &str {
        match level {
            SnapshotLevel::Year => &self.year,
            SnapshotLevel::Month => &self.month,
            SnapshotLevel::Day => &self.day,
        }
    }

    /// Stores `value` for `level` and clears every finer level so the
    /// selection never carries a day from a previously chosen month.
    pub fn set(&mut self, level: SnapshotLevel, value: impl Into<String>) {
        let value = value.into();
        match level {
            SnapshotLevel::Year => {
                self.year = value;
                self.month.clear();
                self.day.clear();
            }
            SnapshotLevel::Month => {
                self.month = value;
                self.day.clear();
            }
            SnapshotLevel::Day => self.day = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        SnapshotLevel::ALL
            .iter()
            .all(|level| !self.get(*level).is_empty())
    }

    pub fn date_label(&self) -> String {
        SnapshotLevel::ALL
            .iter()
            .map(|level| self.get(*level))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for SnapshotSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.date_label())
    }
}
