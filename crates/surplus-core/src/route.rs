//! Route geometry for a match result.
//!
//! A "route" here is a star: one straight segment from the restaurant to each
//! matched NGO, plus a fixed-radius drop-off circle at the NGO. Stops keep the
//! service's order and are numbered from 1. No path optimisation, road
//! snapping or chaining between NGOs happens here.
//!
//! The layer is derived from a [`MatchResult`] on demand and holds no state of
//! its own, so callers re-render whenever the result changes.

use serde_json::{Value, json};
use tracing::warn;

use crate::{GeoPoint, MatchResult, MatchedNgo, Ngo, RouteSummary};

/// Drop-off marker radius, metres.
pub const DROP_OFF_RADIUS_M: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropOff {
    pub center: GeoPoint,
    pub radius_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    /// 1-based position in the service's allocation order.
    pub number: usize,
    pub ngo: MatchedNgo,
    /// `None` when the NGO could not be located.
    pub segment: Option<Segment>,
    pub drop_off: Option<DropOff>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    pub origin: GeoPoint,
    pub stops: Vec<RouteStop>,
    pub summary: RouteSummary,
}

/// Build the route layer for `result` starting at `origin`.
///
/// NGO coordinates come from the match entry when present, otherwise from
/// `ngos` by name.
pub fn render_routes(origin: GeoPoint, result: &MatchResult, ngos: &[Ngo]) -> RouteLayer {
    let stops = result
        .matched_ngos
        .iter()
        .enumerate()
        .map(|(i, matched)| {
            let location = matched.location().or_else(|| locate(matched, ngos));
            if location.is_none() {
                warn!(ngo = %matched.ngo_name, "no coordinate for matched NGO");
            }
            RouteStop {
                number: i + 1,
                ngo: matched.clone(),
                segment: location.map(|to| Segment { from: origin, to }),
                drop_off: location.map(|center| DropOff {
                    center,
                    radius_m: DROP_OFF_RADIUS_M,
                }),
            }
        })
        .collect();

    RouteLayer {
        origin,
        stops,
        summary: result.summary(),
    }
}

fn locate(matched: &MatchedNgo, ngos: &[Ngo]) -> Option<GeoPoint> {
    let name = matched.ngo_name.trim();
    ngos.iter()
        .find(|n| n.name.trim().eq_ignore_ascii_case(name))
        .map(Ngo::location)
}

impl RouteLayer {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.stops.iter().filter_map(|s| s.segment.as_ref())
    }

    pub fn drop_offs(&self) -> impl Iterator<Item = &DropOff> {
        self.stops.iter().filter_map(|s| s.drop_off.as_ref())
    }

    /// GeoJSON `FeatureCollection`: the origin point, then per located stop a
    /// `LineString` segment and a drop-off `Point` carrying `radius_m`.
    pub fn to_geojson(&self) -> Value {
        let mut features = vec![json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": self.origin.to_position() },
            "properties": { "kind": "origin" },
        })];

        for stop in &self.stops {
            if let Some(seg) = &stop.segment {
                features.push(json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [seg.from.to_position(), seg.to.to_position()],
                    },
                    "properties": {
                        "kind": "route",
                        "stop": stop.number,
                        "ngo_name": stop.ngo.ngo_name,
                        "distance_km": stop.ngo.distance_km,
                    },
                }));
            }
            if let Some(drop) = &stop.drop_off {
                features.push(json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": drop.center.to_position() },
                    "properties": {
                        "kind": "drop_off",
                        "stop": stop.number,
                        "ngo_name": stop.ngo.ngo_name,
                        "allocated_kg": stop.ngo.allocated_kg,
                        "radius_m": drop.radius_m,
                    },
                }));
            }
        }

        json!({ "type": "FeatureCollection", "features": features })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;

    fn matched(name: &str, lat: Option<f64>, lon: Option<f64>) -> MatchedNgo {
        MatchedNgo {
            ngo_name: name.into(),
            address: String::new(),
            distance_km: 3.0,
            allocated_kg: 12.5,
            contact_person: None,
            phone: None,
            latitude: lat,
            longitude: lon,
        }
    }

    fn ngo(name: &str, lat: f64, lon: f64) -> Ngo {
        Ngo {
            id: EntityId::from(name),
            name: name.into(),
            address: String::new(),
            latitude: lat,
            longitude: lon,
            capacity_kg: 50.0,
            contact_person: None,
            phone: None,
            email: None,
            operating_hours: None,
        }
    }

    const ORIGIN: GeoPoint = GeoPoint::new(13.04, 80.23);

    #[test]
    fn two_matches_two_segments_two_circles() {
        let result = MatchResult {
            matched_ngos: vec![
                matched("Akshaya Patra", Some(13.08), Some(80.27)),
                matched("Annam Trust", Some(13.00), Some(80.20)),
            ],
            route_info: None,
            total_allocated_kg: Some(25.0),
        };
        let layer = render_routes(ORIGIN, &result, &[]);

        assert_eq!(layer.segments().count(), 2);
        assert_eq!(layer.drop_offs().count(), 2);
        let numbers: Vec<usize> = layer.stops.iter().map(|s| s.number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(layer.stops[0].ngo.ngo_name, "Akshaya Patra");
        for seg in layer.segments() {
            assert_eq!(seg.from, ORIGIN);
        }
        assert!(layer.drop_offs().all(|d| d.radius_m == DROP_OFF_RADIUS_M));
        assert_eq!(layer.stops[1].drop_off.unwrap().center, GeoPoint::new(13.00, 80.20));
    }

    #[test]
    fn order_follows_response_not_distance() {
        let mut far = matched("Far", Some(13.5), Some(80.5));
        far.distance_km = 40.0;
        let mut near = matched("Near", Some(13.05), Some(80.24));
        near.distance_km = 1.0;
        let result = MatchResult {
            matched_ngos: vec![far, near],
            ..Default::default()
        };
        let layer = render_routes(ORIGIN, &result, &[]);
        let names: Vec<&str> = layer.stops.iter().map(|s| s.ngo.ngo_name.as_str()).collect();
        assert_eq!(names, ["Far", "Near"]);
    }

    #[test]
    fn falls_back_to_cached_ngo_by_name() {
        let result = MatchResult {
            matched_ngos: vec![matched("Annam Trust", None, None), matched("Ghost", None, None)],
            ..Default::default()
        };
        let cache = [ngo("annam trust", 13.1, 80.1)];
        let layer = render_routes(ORIGIN, &result, &cache);

        assert_eq!(layer.stops.len(), 2);
        assert_eq!(layer.stops[0].segment.unwrap().to, GeoPoint::new(13.1, 80.1));
        // Unlocated stop keeps its number but has no geometry.
        assert_eq!(layer.stops[1].number, 2);
        assert!(layer.stops[1].segment.is_none());
        assert_eq!(layer.segments().count(), 1);
    }

    #[test]
    fn geojson_uses_lon_lat() {
        let result = MatchResult {
            matched_ngos: vec![matched("Akshaya Patra", Some(13.08), Some(80.27))],
            ..Default::default()
        };
        let geo = render_routes(ORIGIN, &result, &[]).to_geojson();
        let features = geo["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([80.23, 13.04]));
        assert_eq!(features[1]["geometry"]["type"], "LineString");
        assert_eq!(features[2]["properties"]["radius_m"], 200.0);
        assert_eq!(features[2]["properties"]["stop"], 1);
    }
}
