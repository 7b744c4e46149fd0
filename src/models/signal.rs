//! Trading signal model and session labels.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed take-profit allocation labels, nearest target first.
pub const TP_MODES: [&str; 3] = ["TP1 40%", "TP2 35%", "Runner 25%"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Pending,
    Confirmed,
    Invalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
}

/// Market session label derived from the UTC hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Killzone {
    Asia,
    London,
    NyAm,
    Lunch,
    Pm,
}

impl Killzone {
    /// Half-open `[start, end)` hour ranges. The london and ny_am
    /// ranges overlap for hours 13-15; lookup is first-match in
    /// declaration order, so those hours resolve to london.
    const SESSIONS: [(Killzone, u32, u32); 5] = [
        (Killzone::Asia, 0, 8),
        (Killzone::London, 8, 16),
        (Killzone::NyAm, 13, 17),
        (Killzone::Lunch, 17, 19),
        (Killzone::Pm, 19, 24),
    ];

    pub fn from_hour(hour: u32) -> Killzone {
        Self::SESSIONS
            .iter()
            .find(|(_, start, end)| (*start..*end).contains(&hour))
            .map(|(zone, _, _)| *zone)
            .unwrap_or(Killzone::Asia)
    }

    pub fn at(instant: DateTime<Utc>) -> Killzone {
        Self::from_hour(instant.hour())
    }
}

/// A generated trading signal. Created once by the engine in `Pending`
/// status; transitions exactly once to a terminal status via the
/// lifecycle tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub id: Uuid,
    pub status: SignalStatus,
    pub direction: SignalDirection,
    pub symbol: String,
    #[serde(with = "iso8601z")]
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub stop_loss: f64,
    /// TP1, TP2, runner - ordered nearest to farthest.
    pub take_profits: [f64; 3],
    pub tp_modes: [String; 3],
    pub reason: String,
    pub confidence: f64,
    pub rr_target: f64,
    pub killzone: Killzone,
}

/// A lifecycle transition for an in-flight signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalUpdate {
    pub id: Uuid,
    pub status: SignalStatus,
}

/// ISO-8601 UTC with trailing `Z`, the format subscribers expect on
/// the wire.
mod iso8601z {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        instant: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
