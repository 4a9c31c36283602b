//! Delivery, constraint and route records shared by every crate.

use routeplan_geo::{haversine_distance, Coordinate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field names a delivery record must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["id", "customer_name", "lat", "lng", "address"];

/// Columns kept verbatim when parsing CSV instead of being typed.
pub const TEXT_FIELDS: [&str; 6] = [
    "id",
    "customer_name",
    "address",
    "delivery_window",
    "priority",
    "notes",
];

/// One addressable stop awaiting routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPoint {
    /// Caller-supplied identifier, unique within a data set
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    /// Customer name
    #[serde(deserialize_with = "lenient::text")]
    pub customer_name: String,
    /// Latitude in degrees
    #[serde(deserialize_with = "lenient::number")]
    pub lat: f64,
    /// Longitude in degrees
    #[serde(deserialize_with = "lenient::number")]
    pub lng: f64,
    /// Street address
    #[serde(deserialize_with = "lenient::text")]
    pub address: String,
    /// Free-text delivery window, e.g. "09:00-12:00"
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub delivery_window: Option<String>,
    /// Priority label or number
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub priority: Option<String>,
    /// Driver notes
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub notes: Option<String>,
}

impl DeliveryPoint {
    /// Location of this delivery.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Lookup from delivery id to delivery point.
#[derive(Debug, Default)]
pub struct PointIndex<'a> {
    by_id: HashMap<&'a str, &'a DeliveryPoint>,
}

impl<'a> PointIndex<'a> {
    /// Index `points` by id. Later duplicates shadow earlier ones.
    pub fn new(points: &'a [DeliveryPoint]) -> Self {
        Self {
            by_id: points.iter().map(|p| (p.id.as_str(), p)).collect(),
        }
    }

    /// Resolve a delivery id.
    pub fn get(&self, id: &str) -> Option<&'a DeliveryPoint> {
        self.by_id.get(id).copied()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// User-supplied limits that parameterize route generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Maximum stops on a single route (>= 1)
    pub max_stops_per_route: u32,
    /// Vehicle capacity (>= 1)
    pub vehicle_capacity: u32,
    /// Start of the delivery window, `HH:MM`
    pub delivery_window_start: String,
    /// End of the delivery window, `HH:MM`
    pub delivery_window_end: String,
    /// Depot label
    pub start_location: String,
    /// Depot latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lat: Option<f64>,
    /// Depot longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lng: Option<f64>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_stops_per_route: 10,
            vehicle_capacity: 100,
            delivery_window_start: "09:00".to_string(),
            delivery_window_end: "17:00".to_string(),
            start_location: "Warehouse".to_string(),
            start_lat: None,
            start_lng: None,
        }
    }
}

impl Constraints {
    /// Depot coordinate, when both halves are set and in range.
    pub fn start_coordinate(&self) -> Option<Coordinate> {
        match (self.start_lat, self.start_lng) {
            (Some(lat), Some(lng)) => Coordinate::try_new(lat, lng).ok(),
            _ => None,
        }
    }

    /// Returns a copy with a single field changed.
    #[must_use]
    pub fn apply(mut self, update: ConstraintUpdate) -> Self {
        match update {
            ConstraintUpdate::MaxStopsPerRoute(v) => self.max_stops_per_route = v,
            ConstraintUpdate::VehicleCapacity(v) => self.vehicle_capacity = v,
            ConstraintUpdate::DeliveryWindowStart(v) => self.delivery_window_start = v,
            ConstraintUpdate::DeliveryWindowEnd(v) => self.delivery_window_end = v,
            ConstraintUpdate::StartLocation(v) => self.start_location = v,
            ConstraintUpdate::StartLat(v) => self.start_lat = v,
            ConstraintUpdate::StartLng(v) => self.start_lng = v,
        }
        self
    }
}

/// A single form-field edit on [`Constraints`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintUpdate {
    MaxStopsPerRoute(u32),
    VehicleCapacity(u32),
    DeliveryWindowStart(String),
    DeliveryWindowEnd(String),
    StartLocation(String),
    StartLat(Option<f64>),
    StartLng(Option<f64>),
}

impl ConstraintUpdate {
    /// Name of the field this edit touches, matching the serialized key.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::MaxStopsPerRoute(_) => "max_stops_per_route",
            Self::VehicleCapacity(_) => "vehicle_capacity",
            Self::DeliveryWindowStart(_) => "delivery_window_start",
            Self::DeliveryWindowEnd(_) => "delivery_window_end",
            Self::StartLocation(_) => "start_location",
            Self::StartLat(_) => "start_lat",
            Self::StartLng(_) => "start_lng",
        }
    }
}

/// One visit on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Id of the visited delivery point
    #[serde(alias = "id", alias = "delivery_point_id", deserialize_with = "lenient::text")]
    pub delivery_id: String,
    /// Distance from the previous stop in km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_previous: Option<f64>,
}

/// An ordered visiting sequence produced by the optimization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Service-assigned route number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<u32>,
    /// Stops in visiting order
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    /// Total distance in km
    #[serde(default)]
    pub total_distance: f64,
    /// Estimated total time in minutes
    #[serde(default, alias = "total_time")]
    pub estimated_time: f64,
    /// Human-readable summary from the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A stop paired with the delivery point it references.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedStop<'a> {
    /// 1-based position on the route
    pub sequence: usize,
    /// The stop as returned by the service
    pub stop: &'a RouteStop,
    /// Matching delivery point, `None` when the id is unknown
    pub point: Option<&'a DeliveryPoint>,
    /// Leg distance in km, backfilled from coordinates when the service omitted it
    pub leg_distance: Option<f64>,
}

impl Route {
    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Pair every stop with its delivery point and leg distance.
    ///
    /// A missing `distance_from_previous` is filled with the great-circle
    /// distance from the previous known coordinate; the first stop is
    /// measured from `start` when given.
    pub fn resolve<'a>(
        &'a self,
        index: &PointIndex<'a>,
        start: Option<Coordinate>,
    ) -> Vec<ResolvedStop<'a>> {
        let mut previous = start;
        self.stops
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let point = index.get(&stop.delivery_id);
                let here = point.map(DeliveryPoint::coordinate);
                let leg_distance = stop.distance_from_previous.or_else(|| match (previous, here) {
                    (Some(from), Some(to)) => Some(haversine_distance(&from, &to)),
                    _ => None,
                });
                previous = here;
                ResolvedStop {
                    sequence: i + 1,
                    stop,
                    point,
                    leg_distance,
                }
            })
            .collect()
    }

    /// Ids of stops that do not resolve against `index`.
    pub fn unknown_stops<'a>(&'a self, index: &PointIndex<'_>) -> Vec<&'a str> {
        self.stops
            .iter()
            .filter(|s| index.get(&s.delivery_id).is_none())
            .map(|s| s.delivery_id.as_str())
            .collect()
    }
}

/// Totals across a route plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_routes: usize,
    pub total_stops: usize,
    /// km
    pub total_distance: f64,
    /// minutes
    pub total_time: f64,
}

impl RouteSummary {
    /// Sum up `routes`.
    pub fn from_routes(routes: &[Route]) -> Self {
        routes.iter().fold(
            Self {
                total_routes: routes.len(),
                ..Self::default()
            },
            |acc, r| Self {
                total_stops: acc.total_stops + r.stop_count(),
                total_distance: acc.total_distance + r.total_distance,
                total_time: acc.total_time + r.estimated_time,
                ..acc
            },
        )
    }
}

/// Deserializers that accept the loosely typed values found in uploads:
/// CSV typing turns `"7"` into a number, hand-written JSON may quote numbers.
mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    fn value_to_text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        value_to_text(Value::deserialize(d)?).ok_or_else(|| D::Error::custom("expected a value, found null"))
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(value_to_text(Value::deserialize(d)?).filter(|s| !s.trim().is_empty()))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom("number out of range")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected a number, found '{s}'"))),
            other => Err(D::Error::custom(format!("expected a number, found {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(id: &str, lat: f64, lng: f64) -> DeliveryPoint {
        DeliveryPoint {
            id: id.to_string(),
            customer_name: format!("Customer {id}"),
            lat,
            lng,
            address: format!("{id} Main St"),
            delivery_window: None,
            priority: None,
            notes: None,
        }
    }

    fn route(ids: &[&str]) -> Route {
        Route {
            route_id: Some(1),
            stops: ids
                .iter()
                .map(|id| RouteStop {
                    delivery_id: (*id).to_string(),
                    distance_from_previous: None,
                })
                .collect(),
            total_distance: 10.0,
            estimated_time: 30.0,
            summary: None,
        }
    }

    #[test]
    fn test_delivery_point_accepts_loose_types() {
        let p: DeliveryPoint = serde_json::from_value(json!({
            "id": 7,
            "customer_name": "Acme",
            "lat": "40.7128",
            "lng": -74.006,
            "address": "1 Broadway",
            "priority": 2,
            "notes": ""
        }))
        .unwrap();

        assert_eq!(p.id, "7");
        assert_eq!(p.lat, 40.7128);
        assert_eq!(p.priority.as_deref(), Some("2"));
        assert_eq!(p.notes, None);
        assert_eq!(p.delivery_window, None);
    }

    #[test]
    fn test_delivery_point_rejects_non_numeric_coordinate() {
        let result: Result<DeliveryPoint, _> = serde_json::from_value(json!({
            "id": "A", "customer_name": "Acme", "lat": "north", "lng": 0, "address": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_route_deserializes_service_aliases() {
        let r: Route = serde_json::from_value(json!({
            "stops": [{"id": "A", "distance_from_previous": 1.2}, {"delivery_point_id": 3}],
            "total_distance": 5.5,
            "total_time": 42
        }))
        .unwrap();

        assert_eq!(r.stops[0].delivery_id, "A");
        assert_eq!(r.stops[1].delivery_id, "3");
        assert_eq!(r.estimated_time, 42.0);
        assert_eq!(r.route_id, None);
    }

    #[test]
    fn test_constraints_apply_single_field() {
        let c = Constraints::default()
            .apply(ConstraintUpdate::MaxStopsPerRoute(4))
            .apply(ConstraintUpdate::StartLocation("Depot 2".into()));
        assert_eq!(c.max_stops_per_route, 4);
        assert_eq!(c.start_location, "Depot 2");
        assert_eq!(c.vehicle_capacity, Constraints::default().vehicle_capacity);
    }

    #[test]
    fn test_start_coordinate_requires_both_halves() {
        let mut c = Constraints::default();
        assert!(c.start_coordinate().is_none());
        c.start_lat = Some(40.0);
        assert!(c.start_coordinate().is_none());
        c.start_lng = Some(-74.0);
        assert_eq!(c.start_coordinate(), Some(Coordinate::new(40.0, -74.0)));
        c.start_lat = Some(140.0);
        assert!(c.start_coordinate().is_none());
    }

    #[test]
    fn test_resolve_backfills_leg_distances() {
        let points = vec![point("A", 40.0, -74.0), point("B", 40.1, -74.0)];
        let index = PointIndex::new(&points);
        let mut r = route(&["A", "B", "ghost"]);
        r.stops[0].distance_from_previous = Some(3.0);

        let resolved = r.resolve(&index, None);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].leg_distance, Some(3.0));
        let ab = resolved[1].leg_distance.unwrap();
        assert!((ab - 11.12).abs() < 0.1, "A-B: {}", ab);
        assert!(resolved[2].point.is_none());
        assert_eq!(resolved[2].leg_distance, None);
        assert_eq!(resolved[2].sequence, 3);
    }

    #[test]
    fn test_resolve_measures_first_leg_from_start() {
        let points = vec![point("A", 40.0, -74.0)];
        let index = PointIndex::new(&points);
        let r = route(&["A"]);

        let resolved = r.resolve(&index, Some(Coordinate::new(40.0, -74.0)));
        assert_eq!(resolved[0].leg_distance, Some(0.0));
        assert_eq!(r.resolve(&index, None)[0].leg_distance, None);
    }

    #[test]
    fn test_unknown_stops() {
        let points = vec![point("A", 40.0, -74.0)];
        let index = PointIndex::new(&points);
        assert_eq!(route(&["A", "Z"]).unknown_stops(&index), vec!["Z"]);
    }

    #[test]
    fn test_summary_totals() {
        let routes = vec![route(&["A", "B"]), route(&["C"])];
        let summary = RouteSummary::from_routes(&routes);
        assert_eq!(summary.total_routes, 2);
        assert_eq!(summary.total_stops, 3);
        assert_eq!(summary.total_distance, 20.0);
        assert_eq!(summary.total_time, 60.0);
        assert_eq!(RouteSummary::from_routes(&[]), RouteSummary::default());
    }
}
