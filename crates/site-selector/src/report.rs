//! Display shaping for a finished selection
//!
//! Turns a [`SelectionResult`] into table rows with fixed display precision
//! and into GeoJSON for map markers. Nothing here recomputes a metric or
//! reorders the selection.

use crate::{SelectionResult, SiteInputs};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One table row per selected site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// `Node-NN`, numbered in selection order
    pub name: String,
    pub candidate_id: usize,
    /// 4 decimals
    pub latitude: f64,
    /// 4 decimals
    pub longitude: f64,
    /// 1 decimal
    pub coverage: f64,
    /// 2 decimals
    pub aqi: f64,
    /// 2 decimals
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Markdown table with the same columns as [`ReportRow`] minus the id
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("| Name | Latitude | Longitude | Coverage | AQI | Score |\n");
        out.push_str("|------|----------|-----------|----------|-----|-------|\n");
        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.1} | {:.2} | {:.2} |\n",
                row.name, row.latitude, row.longitude, row.coverage, row.aqi, row.score
            ));
        }
        out
    }
}

/// Node display name for a 1-based selection index
pub fn node_name(index: usize) -> String {
    format!("Node-{:02}", index)
}

pub fn format_report(result: &SelectionResult) -> Report {
    let rows = result
        .selected
        .iter()
        .enumerate()
        .map(|(i, s)| ReportRow {
            name: node_name(i + 1),
            candidate_id: s.candidate.id,
            latitude: round_to(s.candidate.latitude, 4),
            longitude: round_to(s.candidate.longitude, 4),
            coverage: round_to(s.coverage, 1),
            aqi: round_to(s.pollution_index, 2),
            score: round_to(s.score, 2),
        })
        .collect();

    Report { rows }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Map layer: a marker plus an overlay circle radius for every selected
/// site, followed by one marker per population center. The region midpoint
/// is attached as the `map_center` foreign member (`[lon, lat]`).
pub fn to_geojson(
    result: &SelectionResult,
    inputs: &SiteInputs,
    coverage_radius_km: f64,
) -> FeatureCollection {
    let radius_m = coverage_radius_km * 1000.0;

    let nodes = result.selected.iter().enumerate().map(|(i, s)| {
        point_feature(
            s.candidate.longitude,
            s.candidate.latitude,
            json!({
                "kind": "node",
                "name": node_name(i + 1),
                "candidate_id": s.candidate.id,
                "score": s.score,
                "coverage": s.coverage,
                "aqi": s.pollution_index,
                "radius_m": radius_m,
            }),
        )
    });

    let cities = inputs.centers.iter().map(|c| {
        point_feature(
            c.longitude,
            c.latitude,
            json!({
                "kind": "population_center",
                "name": c.name,
                "population": c.population,
            }),
        )
    });

    let (center_lat, center_lon) = inputs.region.center();
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("map_center".to_string(), json!([center_lon, center_lat]));

    FeatureCollection {
        bbox: None,
        features: nodes.chain(cities).collect(),
        foreign_members: Some(foreign_members),
    }
}

fn point_feature(lon: f64, lat: f64, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Candidate, PopulationCenter, ScoredCandidate, SelectionMetadata};

    fn sample_result() -> SelectionResult {
        let selected = vec![
            ScoredCandidate {
                candidate: Candidate {
                    id: 37,
                    latitude: -1.512_345_6,
                    longitude: 36.761_234_9,
                },
                coverage: 100_000.0,
                pollution_index: 64.876_8,
                score: 99_967.561_75,
            },
            ScoredCandidate {
                candidate: Candidate {
                    id: 4,
                    latitude: -0.9,
                    longitude: 37.3,
                },
                coverage: 51_836.278_784,
                pollution_index: 41.004,
                score: 51_815.776_784,
            },
        ];
        SelectionResult {
            metadata: SelectionMetadata {
                total_candidates: 100,
                target_count: 10,
                selected_count: selected.len(),
                exclusion_radius_km: 10.0,
            },
            selected,
        }
    }

    #[test]
    fn test_rows_follow_selection_order() {
        let report = format_report(&sample_result());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "Node-01");
        assert_eq!(report.rows[0].candidate_id, 37);
        assert_eq!(report.rows[1].name, "Node-02");
        assert_eq!(report.rows[1].candidate_id, 4);
    }

    #[test]
    fn test_rounding_precision() {
        let report = format_report(&sample_result());
        let row = &report.rows[0];

        assert_eq!(row.latitude, -1.5123);
        assert_eq!(row.longitude, 36.7612);
        assert_eq!(row.coverage, 100_000.0);
        assert_eq!(row.aqi, 64.88);
        assert_eq!(row.score, 99_967.56);
        assert_eq!(report.rows[1].coverage, 51_836.3);
    }

    #[test]
    fn test_node_name_padding() {
        assert_eq!(node_name(1), "Node-01");
        assert_eq!(node_name(10), "Node-10");
        assert_eq!(node_name(100), "Node-100");
    }

    #[test]
    fn test_markdown_table() {
        let table = format_report(&sample_result()).to_markdown();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Name | Latitude | Longitude | Coverage | AQI | Score |");
        assert_eq!(
            lines[2],
            "| Node-01 | -1.5123 | 36.7612 | 100000.0 | 64.88 | 99967.56 |"
        );
    }

    #[test]
    fn test_geojson_layers() {
        let inputs = SiteInputs {
            centers: vec![PopulationCenter {
                name: "City 1".to_string(),
                latitude: -1.5167,
                longitude: 36.75,
                population: 100_000,
            }],
            ..SiteInputs::default()
        };
        let collection = to_geojson(&sample_result(), &inputs, 10.0);

        assert_eq!(collection.features.len(), 3);

        let node = &collection.features[0];
        let props = node.properties.as_ref().unwrap();
        assert_eq!(props["kind"], "node");
        assert_eq!(props["name"], "Node-01");
        assert_eq!(props["radius_m"], 10_000.0);
        match &node.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![36.761_234_9, -1.512_345_6]),
            other => panic!("expected point, got {other:?}"),
        }

        let city = collection.features[2].properties.as_ref().unwrap();
        assert_eq!(city["kind"], "population_center");
        assert_eq!(city["population"], 100_000);
    }

    #[test]
    fn test_geojson_map_center_is_region_midpoint() {
        let collection = to_geojson(&sample_result(), &SiteInputs::default(), 10.0);
        let members = collection.foreign_members.as_ref().unwrap();
        let center = members["map_center"].as_array().unwrap();

        assert!((center[0].as_f64().unwrap() - 37.25).abs() < 1e-9);
        assert!((center[1].as_f64().unwrap() - (-1.13335)).abs() < 1e-9);
    }
}
