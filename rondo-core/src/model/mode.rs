use serde::{Deserialize, Serialize};

/// transit modes recognized by the engine, following the GTFS route type
/// taxonomy. requests restrict the search to a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Trolleybus,
    Monorail,
}

impl TransitMode {
    pub const ALL: [TransitMode; 10] = [
        TransitMode::Tram,
        TransitMode::Subway,
        TransitMode::Rail,
        TransitMode::Bus,
        TransitMode::Ferry,
        TransitMode::CableCar,
        TransitMode::Gondola,
        TransitMode::Funicular,
        TransitMode::Trolleybus,
        TransitMode::Monorail,
    ];

    /// maps a GTFS route_type code to a mode, if recognized.
    pub fn from_route_type(route_type: u32) -> Option<TransitMode> {
        match route_type {
            0 => Some(TransitMode::Tram),
            1 => Some(TransitMode::Subway),
            2 => Some(TransitMode::Rail),
            3 => Some(TransitMode::Bus),
            4 => Some(TransitMode::Ferry),
            5 => Some(TransitMode::CableCar),
            6 => Some(TransitMode::Gondola),
            7 => Some(TransitMode::Funicular),
            11 => Some(TransitMode::Trolleybus),
            12 => Some(TransitMode::Monorail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::TransitMode;
    use std::collections::HashSet;

    #[test]
    fn test_from_route_type() {
        let cases = vec![
            (0, Some(TransitMode::Tram)),
            (1, Some(TransitMode::Subway)),
            (2, Some(TransitMode::Rail)),
            (3, Some(TransitMode::Bus)),
            (4, Some(TransitMode::Ferry)),
            (7, Some(TransitMode::Funicular)),
            (11, Some(TransitMode::Trolleybus)),
            (8, None),
            (100, None),
        ];
        for (route_type, expected) in cases {
            assert_eq!(
                TransitMode::from_route_type(route_type),
                expected,
                "route_type {route_type}"
            );
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = r#"["bus", "rail", "cable_car"]"#;
        let modes: HashSet<TransitMode> =
            serde_json::from_str(json).expect("modes should deserialize");
        assert!(modes.contains(&TransitMode::Bus));
        assert!(modes.contains(&TransitMode::Rail));
        assert!(modes.contains(&TransitMode::CableCar));

        let unknown: Result<TransitMode, _> = serde_json::from_str(r#""hyperloop""#);
        assert!(unknown.is_err(), "unknown modes should fail to deserialize");
    }
}
