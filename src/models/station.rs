use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A stop on a line, positioned in the logical map coordinate space.
///
/// Coordinates are authored per line in the embedded datasets and never
/// change at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Station {
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Ordered station sequence for one line.
///
/// Adjacency is encoded by order: the station at index `i` neighbours
/// `i - 1` and `i + 1`, and on circular lines the last station also
/// neighbours the first. Station names are unique within a line and act as
/// the join key against live telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTopology {
    stations: IndexMap<String, Station>,
    is_circular: bool,
    inverted_direction: bool,
}

impl LineTopology {
    /// Build a topology from an ordered station list.
    ///
    /// A later station with a duplicate name replaces the earlier entry, so
    /// datasets are expected to keep names unique.
    #[must_use]
    pub fn new(stations: Vec<Station>, is_circular: bool, inverted_direction: bool) -> Self {
        let stations = stations
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        Self {
            stations,
            is_circular,
            inverted_direction,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    #[must_use]
    pub fn is_circular(&self) -> bool {
        self.is_circular
    }

    /// Whether this line's advance-direction convention is inverted, i.e.
    /// inbound trains move toward higher indices instead of outbound ones.
    #[must_use]
    pub fn inverted_direction(&self) -> bool {
        self.inverted_direction
    }

    /// Resolve a telemetry station name to its index in the sequence.
    ///
    /// `None` is an expected, non-fatal outcome: vehicles between the depot
    /// and their first scheduled stop report station names that are not on
    /// the map.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.stations.get_index_of(name)
    }

    #[must_use]
    pub fn station_at(&self, index: usize) -> Option<&Station> {
        self.stations.get_index(index).map(|(_, s)| s)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Mean of all station coordinates. Used to orient lane offsets on
    /// circular lines (outer vs inner side of the loop).
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        crate::geometry::centroid(self.stations.values().map(Station::position))
    }

    /// Axis-aligned bounding box of all stations as
    /// `(min_x, min_y, max_x, max_y)`, or `None` for an empty topology.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut iter = self.stations.values();
        let first = iter.next()?;
        let mut bounds = (first.x, first.y, first.x, first.y);
        for s in iter {
            bounds.0 = bounds.0.min(s.x);
            bounds.1 = bounds.1.min(s.y);
            bounds.2 = bounds.2.max(s.x);
            bounds.3 = bounds.3.max(s.y);
        }
        Some(bounds)
    }
}
