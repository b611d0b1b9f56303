use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// canonical wall-clock format for alarm times, also the key format of the state namespace
pub const TIME_FORMAT: &str = "%H:%M";

/// a repeat day, stored as its short token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Su,
    M,
    Tu,
    W,
    Th,
    F,
    S,
}

impl Day {
    /// calendar order, sunday first
    pub const ALL: [Self; 7] = [
        Self::Su,
        Self::M,
        Self::Tu,
        Self::W,
        Self::Th,
        Self::F,
        Self::S,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Su => "Su",
            Self::M => "M",
            Self::Tu => "Tu",
            Self::W => "W",
            Self::Th => "Th",
            Self::F => "F",
            Self::S => "S",
        }
    }

    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Su => "Sunday",
            Self::M => "Monday",
            Self::Tu => "Tuesday",
            Self::W => "Wednesday",
            Self::Th => "Thursday",
            Self::F => "Friday",
            Self::S => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // accepts the short token as well as common english spellings
        match s.trim().to_ascii_lowercase().as_str() {
            "su" | "sun" | "sunday" => Ok(Self::Su),
            "m" | "mo" | "mon" | "monday" => Ok(Self::M),
            "tu" | "tue" | "tues" | "tuesday" => Ok(Self::Tu),
            "w" | "we" | "wed" | "wednesday" => Ok(Self::W),
            "th" | "thu" | "thur" | "thurs" | "thursday" => Ok(Self::Th),
            "f" | "fr" | "fri" | "friday" => Ok(Self::F),
            "s" | "sa" | "sat" | "saturday" => Ok(Self::S),
            _ => Err(Error::InvalidDay(s.to_string())),
        }
    }
}

/// time of day an alarm is set for, at minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmTime(NaiveTime);

impl AlarmTime {
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// the current local time, truncated to the minute
    #[must_use]
    pub fn now() -> Self {
        Self::truncate(chrono::Local::now().time())
    }

    fn truncate(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }

    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// renders with a user chosen chrono format, e.g. `%l:%M %p`
    #[must_use]
    pub fn format(&self, time_format: &str) -> String {
        self.0.format(time_format).to_string()
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for AlarmTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidTime(s.to_string()))
    }
}

impl From<NaiveTime> for AlarmTime {
    fn from(time: NaiveTime) -> Self {
        Self::truncate(time)
    }
}

impl Serialize for AlarmTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AlarmTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// generated identity of a stored alarm
///
/// `0` means "not assigned yet", which is what alarms stored without an id load as
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AlarmId(u64);

impl AlarmId {
    pub const UNASSIGNED: Self = Self(0);

    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// `None` once the id space is used up
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlarmId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// represents an alarm
/// the time it goes off at and the days it repeats on
///
/// equality only looks at `time` and `days` (in order), never at `id`,
/// so two alarms with the same definition are the same alarm to the match based store operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub time: AlarmTime,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(default)]
    pub id: AlarmId,
}

impl Alarm {
    #[must_use]
    pub const fn new(time: AlarmTime, days: Vec<Day>) -> Self {
        Self {
            time,
            days,
            id: AlarmId::UNASSIGNED,
        }
    }

    /// the key this alarm's enabled flag is stored under
    #[must_use]
    pub fn state_key(&self) -> String {
        self.time.to_string()
    }

    #[must_use]
    pub fn days_label(&self) -> String {
        self.days
            .iter()
            .map(|day| day.token())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for Alarm {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.days == other.days
    }
}

impl Eq for Alarm {}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.time, self.days_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> AlarmTime {
        s.parse().unwrap()
    }

    #[test]
    fn time_is_zero_padded() {
        let t = AlarmTime::from_hm(7, 5).unwrap();
        assert_eq!(t.to_string(), "07:05");
        assert_eq!(time("07:05"), t);
    }

    #[test]
    fn time_rejects_garbage() {
        assert!("25:00".parse::<AlarmTime>().is_err());
        assert!("07:60".parse::<AlarmTime>().is_err());
        assert!("seven".parse::<AlarmTime>().is_err());
        assert!("".parse::<AlarmTime>().is_err());
    }

    #[test]
    fn now_has_no_seconds() {
        assert_eq!(AlarmTime::now().as_naive().second(), 0);
    }

    #[test]
    fn day_tokens_parse_both_ways() {
        for day in Day::ALL {
            assert_eq!(day.token().parse::<Day>().unwrap(), day);
            assert_eq!(day.full_name().parse::<Day>().unwrap(), day);
        }
        assert_eq!("th".parse::<Day>().unwrap(), Day::Th);
        assert_eq!("mon".parse::<Day>().unwrap(), Day::M);
        assert_eq!("Thurs".parse::<Day>().unwrap(), Day::Th);
        assert_eq!("sa".parse::<Day>().unwrap(), Day::S);
        assert!("X".parse::<Day>().is_err());
    }

    #[test]
    fn equality_ignores_id() {
        let mut a = Alarm::new(time("07:30"), vec![Day::M, Day::W]);
        let b = a.clone();
        a.id = AlarmId::new(4);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_day_order() {
        let a = Alarm::new(time("07:30"), vec![Day::M, Day::W]);
        let b = Alarm::new(time("07:30"), vec![Day::W, Day::M]);
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_time_and_day_tokens() {
        let mut alarm = Alarm::new(time("07:30"), vec![Day::M, Day::W, Day::F]);
        alarm.id = AlarmId::new(1);
        let json = serde_json::to_string(&alarm).unwrap();
        assert_eq!(json, r#"{"time":"07:30","days":["M","W","F"],"id":1}"#);
    }

    #[test]
    fn loads_records_without_id() {
        let alarm: Alarm = serde_json::from_str(r#"{"time":"06:00","days":["Su"]}"#).unwrap();
        assert_eq!(alarm.id, AlarmId::UNASSIGNED);
        assert_eq!(alarm.days, vec![Day::Su]);
    }

    #[test]
    fn id_space_runs_out() {
        assert_eq!(AlarmId::new(1).checked_next(), Some(AlarmId::new(2)));
        assert_eq!(AlarmId::new(u64::MAX).checked_next(), None);
    }

    #[test]
    fn days_label_keeps_insertion_order() {
        let alarm = Alarm::new(time("07:30"), vec![Day::F, Day::M]);
        assert_eq!(alarm.days_label(), "F, M");
        assert_eq!(alarm.to_string(), "07:30 [F, M]");
    }
}
