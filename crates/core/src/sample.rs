//! Built-in sample data for trying the client without the service.

use crate::model::DeliveryPoint;

const SAMPLE: &[(&str, &str, f64, f64, &str, Option<&str>, Option<&str>)] = &[
    ("D001", "Blue Bottle Cafe", 40.7420, -74.0048, "450 W 15th St, New York, NY", Some("09:00-11:00"), Some("high")),
    ("D002", "Chelsea Market Deli", 40.7424, -74.0061, "75 9th Ave, New York, NY", Some("09:00-12:00"), None),
    ("D003", "Union Square Books", 40.7359, -73.9911, "33 Union Sq W, New York, NY", None, Some("normal")),
    ("D004", "Greenwich Bakery", 40.7336, -74.0027, "120 Christopher St, New York, NY", Some("10:00-14:00"), None),
    ("D005", "SoHo Florist", 40.7233, -74.0030, "87 Spring St, New York, NY", Some("08:00-10:00"), Some("high")),
    ("D006", "Tribeca Wine Shop", 40.7163, -74.0086, "140 Franklin St, New York, NY", None, None),
    ("D007", "Financial District Pharmacy", 40.7075, -74.0113, "55 Broad St, New York, NY", Some("12:00-16:00"), Some("normal")),
    ("D008", "Lower East Side Market", 40.7150, -73.9843, "88 Essex St, New York, NY", Some("13:00-17:00"), None),
    ("D009", "East Village Hardware", 40.7265, -73.9815, "170 Avenue A, New York, NY", None, Some("low")),
    ("D010", "Midtown Office Supplies", 40.7549, -73.9840, "1 Bryant Park, New York, NY", Some("09:00-17:00"), None),
];

/// Ten canned deliveries around lower Manhattan.
pub fn sample_delivery_points() -> Vec<DeliveryPoint> {
    SAMPLE
        .iter()
        .map(|&(id, name, lat, lng, address, window, priority)| DeliveryPoint {
            id: id.to_string(),
            customer_name: name.to_string(),
            lat,
            lng,
            address: address.to_string(),
            delivery_window: window.map(str::to_string),
            priority: priority.map(str::to_string),
            notes: None,
        })
        .collect()
}
