use crate::constants::LANE_OFFSET;
use crate::geometry::{heading_degrees, lerp_point, upward_perpendicular};
use crate::models::{LineTopology, TrainMarker, TrainStatus, TrainTelemetry, TravelDirection};

/// Interpolation fractions for each reported status, along the segment the
/// status refers to.
const ENTERING_FRACTION: f64 = 0.75;
const DEPARTED_FRACTION: f64 = 0.25;
const ALL_STATIONS_DEPARTED_FRACTION: f64 = 0.5;

/// Maps one telemetry record onto the line map.
///
/// Returns `None` when the reported station is not part of the topology or
/// the topology is degenerate (fewer than two stations); both mean "leave
/// this train off the map for this poll cycle", never an error.
#[must_use]
pub fn map_train_position(
    train: &TrainTelemetry,
    topology: &LineTopology,
) -> Option<TrainMarker> {
    if topology.len() < 2 {
        return None;
    }
    let index = topology.index_of(&train.station_name)?;
    let current = topology.station_at(index)?;

    let moves_up = moves_toward_higher_index(train.direction, topology);
    let behind_index = neighbor_index(index, if moves_up { -1 } else { 1 }, topology);
    let ahead_index = neighbor_index(index, if moves_up { 1 } else { -1 }, topology);
    let behind = topology.station_at(behind_index)?;
    let ahead = topology.station_at(ahead_index)?;

    let (x, y) = match train.status {
        TrainStatus::Entering => {
            lerp_point(behind.position(), current.position(), ENTERING_FRACTION)
        }
        TrainStatus::Departed => {
            lerp_point(current.position(), ahead.position(), DEPARTED_FRACTION)
        }
        TrainStatus::AllStationsDeparted => lerp_point(
            behind.position(),
            current.position(),
            ALL_STATIONS_DEPARTED_FRACTION,
        ),
        TrainStatus::Arrived | TrainStatus::Unknown => current.position(),
    };

    // Heading and lane offset follow the behind->ahead track vector, not
    // the interpolated sub-segment.
    let seg_dx = ahead.x - behind.x;
    let seg_dy = ahead.y - behind.y;
    let heading = heading_degrees(seg_dx, seg_dy);
    let (offset_x, offset_y) = lane_offset(train.direction, topology, (x, y), seg_dx, seg_dy);

    Some(TrainMarker {
        train_no: train.train_no.clone(),
        x,
        y,
        heading_degrees: heading,
        offset_x,
        offset_y,
        direction: train.direction,
        is_express: train.is_express,
        is_last_run: train.is_last_run,
        status: train.status,
        station_name: train.station_name.clone(),
        destination_name: train.destination_name.clone(),
    })
}

/// Whether a train travelling in `direction` moves toward higher station
/// indices on this topology. The polarity is a per-line attribute: most
/// lines advance outbound trains upward, the inverted loop advances
/// inbound ones.
fn moves_toward_higher_index(direction: TravelDirection, topology: &LineTopology) -> bool {
    if topology.inverted_direction() {
        direction == TravelDirection::Inbound
    } else {
        direction == TravelDirection::Outbound
    }
}

/// Neighbour of `index` one step in `delta` direction: modular on circular
/// lines, clamped to the ends on linear ones.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn neighbor_index(index: usize, delta: i64, topology: &LineTopology) -> usize {
    let len = topology.len() as i64;
    let target = index as i64 + delta;
    if topology.is_circular() {
        target.rem_euclid(len) as usize
    } else {
        target.clamp(0, len - 1) as usize
    }
}

/// Lane offset separating the two running directions.
///
/// Linear lines put inbound trains on the canonical "upward" side of the
/// track. On circular lines the convention is outer/inner instead: the
/// canonical perpendicular is first normalized to point away from the loop
/// centroid, then inbound trains take the outer side.
fn lane_offset(
    direction: TravelDirection,
    topology: &LineTopology,
    position: (f64, f64),
    seg_dx: f64,
    seg_dy: f64,
) -> (f64, f64) {
    let (px, py) = upward_perpendicular(seg_dx, seg_dy);
    let inbound = direction == TravelDirection::Inbound;

    let sign = if topology.is_circular() {
        let (cx, cy) = topology.centroid();
        let to_center = (cx - position.0, cy - position.1);
        let dot = px * to_center.0 + py * to_center.1;
        let outward_sign = if dot > 0.0 { -1.0 } else { 1.0 };
        if inbound {
            outward_sign
        } else {
            -outward_sign
        }
    } else if inbound {
        1.0
    } else {
        -1.0
    };

    (px * LANE_OFFSET * sign, py * LANE_OFFSET * sign)
}
