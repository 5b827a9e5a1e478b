use serde::{Deserialize, Serialize};

/// Travel direction flag as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelDirection {
    Inbound,
    Outbound,
}

impl TravelDirection {
    /// Decode the upstream single-character direction code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "0" {
            Self::Inbound
        } else {
            Self::Outbound
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

/// Coarse progress of a train relative to its reported station.
///
/// Anything outside the four documented codes maps to `Unknown`, which the
/// position mapper treats as "draw at the station" rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    Entering,
    Arrived,
    Departed,
    AllStationsDeparted,
    Unknown,
}

impl TrainStatus {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => Self::Entering,
            "1" => Self::Arrived,
            "2" => Self::Departed,
            "3" => Self::AllStationsDeparted,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Entering => "approaching",
            Self::Arrived => "at station",
            Self::Departed => "departed",
            Self::AllStationsDeparted => "left previous stop",
            Self::Unknown => "in service",
        }
    }
}

/// One train position record as it arrives over the wire from the proxy.
///
/// Flag fields keep the upstream "0"/"1" string encoding; typed access goes
/// through [`TrainPositionRecord::into_telemetry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPositionRecord {
    pub train_no: String,
    pub line_id: String,
    pub station_name: String,
    pub direction_code: String,
    pub status_code: String,
    #[serde(default)]
    pub express_flag: String,
    #[serde(default)]
    pub last_run_flag: String,
    pub destination_name: String,
    #[serde(default)]
    pub received_at: String,
}

impl TrainPositionRecord {
    #[must_use]
    pub fn into_telemetry(self) -> TrainTelemetry {
        TrainTelemetry {
            direction: TravelDirection::from_code(&self.direction_code),
            status: TrainStatus::from_code(&self.status_code),
            is_express: self.express_flag == "1",
            is_last_run: self.last_run_flag == "1",
            train_no: self.train_no,
            line_id: self.line_id,
            station_name: self.station_name,
            destination_name: self.destination_name,
            received_at: self.received_at,
        }
    }
}

/// Typed per-train telemetry, the position mapper's input.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTelemetry {
    pub train_no: String,
    pub line_id: String,
    pub station_name: String,
    pub direction: TravelDirection,
    pub status: TrainStatus,
    pub is_express: bool,
    pub is_last_run: bool,
    pub destination_name: String,
    pub received_at: String,
}

/// Normalized response from the position proxy.
///
/// An empty `trains` list together with a `diagnostic` message means "no
/// vehicles currently running" and is distinct from a transport failure,
/// which surfaces as an `Err` from the fetch call instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub diagnostic: Option<String>,
    #[serde(default)]
    pub trains: Vec<TrainPositionRecord>,
}

/// The latest successfully applied poll result for one line.
///
/// Snapshots replace each other wholesale; nothing is merged across polls.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub line_id: String,
    pub diagnostic: Option<String>,
    pub trains: Vec<TrainTelemetry>,
    pub updated_at: String,
}
