use crate::models::{LineInfo, LineTopology, Station};
use serde::Deserialize;

/// On-disk shape of one embedded station dataset.
#[derive(Debug, Deserialize)]
struct LineDataFile {
    stations: Vec<Station>,
}

/// Every line the app can display, in selector order.
///
/// The loop line is the one whose running directions are laid out opposite
/// to the other lines' convention, hence the inverted polarity flag.
#[must_use]
pub fn line_catalog() -> Vec<LineInfo> {
    vec![
        LineInfo::new("red", "Red Line", "#D93A2B"),
        LineInfo::new("loop", "Loop Line", "#1E9E54").circular(true),
        LineInfo::new("harbor", "Harbor Line", "#2B6CB0"),
        LineInfo::new("airport", "Airport Line", "#C98A12"),
        LineInfo::new("crosstown", "Crosstown Line", "#7A4FA3"),
    ]
}

#[must_use]
pub fn line_info(line_id: &str) -> Option<LineInfo> {
    line_catalog().into_iter().find(|line| line.id == line_id)
}

/// Load the station topology for a line, or `None` for an unknown id or a
/// dataset that fails to parse (the latter is a build-time data bug, not a
/// runtime condition worth panicking over).
#[must_use]
pub fn topology_for(line_id: &str) -> Option<LineTopology> {
    let info = line_info(line_id)?;
    let raw = dataset_for(line_id)?;
    let parsed: LineDataFile = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            leptos::logging::warn!("station dataset for {line_id} failed to parse: {err}");
            return None;
        }
    };
    Some(LineTopology::new(
        parsed.stations,
        info.is_circular,
        info.inverted_direction,
    ))
}

fn dataset_for(line_id: &str) -> Option<&'static str> {
    match line_id {
        "red" => Some(include_str!("../data/stations/red.json")),
        "loop" => Some(include_str!("../data/stations/loop.json")),
        "harbor" => Some(include_str!("../data/stations/harbor.json")),
        "airport" => Some(include_str!("../data/stations/airport.json")),
        "crosstown" => Some(include_str!("../data/stations/crosstown.json")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_line_has_a_topology() {
        for line in line_catalog() {
            let topology = topology_for(&line.id)
                .unwrap_or_else(|| panic!("line {} should have a dataset", line.id));
            assert!(
                topology.len() >= 2,
                "line {} needs at least two stations",
                line.id
            );
        }
    }

    #[test]
    fn test_station_names_are_unique_per_line() {
        for line in line_catalog() {
            let topology = topology_for(&line.id).expect("dataset");
            // IndexMap deduplicates by name, so a collision would shrink
            // the map below the authored station count.
            let dataset = dataset_for(&line.id).expect("raw dataset");
            let authored = dataset.matches("\"name\"").count();
            assert_eq!(
                topology.len(),
                authored,
                "duplicate station name on line {}",
                line.id
            );
        }
    }

    #[test]
    fn test_loop_line_is_circular_and_inverted() {
        let topology = topology_for("loop").expect("loop dataset");
        assert!(topology.is_circular());
        assert!(topology.inverted_direction());

        let red = topology_for("red").expect("red dataset");
        assert!(!red.is_circular());
        assert!(!red.inverted_direction());
    }

    #[test]
    fn test_unknown_line_has_no_topology() {
        assert!(topology_for("funicular").is_none());
        assert!(line_info("funicular").is_none());
    }

    #[test]
    fn test_default_line_is_in_catalog() {
        assert!(line_info(crate::constants::DEFAULT_LINE_ID).is_some());
    }
}
