mod line;
mod marker;
mod station;
mod telemetry;

pub use line::LineInfo;
pub use marker::TrainMarker;
pub use station::{LineTopology, Station};
pub use telemetry::{
    PositionsResponse, TelemetrySnapshot, TrainPositionRecord, TrainStatus, TrainTelemetry,
    TravelDirection,
};
