//! QQ Maps (腾讯位置服务) Web Service API client.
//!
//! # Conventions
//!
//! - Requests carry the developer `key`.
//! - Locations are written `lat,lng`, the reverse of Amap; multiple points
//!   are separated by `;`.
//! - Responses are `{"status": 0, "message": "query ok", "result": ...}`;
//!   a non-zero status is an error.
//! - Route polylines come back delta-compressed; see [`decode_polyline`].

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::coord::LngLat;
use crate::provider::types::{field_text, status_code, take_field};
use crate::provider::{join_lat_lng, lat_lng, HttpClient, Params, Provider, ProviderError};

/// Production endpoint.
pub const QQ_BASE_URL: &str = "https://apis.map.qq.com/";

/// Search area for place search.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Within a named city or district, optionally biased towards a point.
    Region {
        city: String,
        auto_extend: bool,
        center: Option<LngLat>,
    },
    /// Within `radius` metres of a point.
    Nearby {
        center: LngLat,
        radius: u32,
        auto_extend: bool,
    },
    /// Within a rectangle given by its south-west and north-east corners.
    Rectangle {
        south_west: LngLat,
        north_east: LngLat,
    },
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Region {
                city,
                auto_extend,
                center,
            } => {
                write!(f, "region({},{}", city, *auto_extend as u8)?;
                if let Some(center) = center {
                    write!(f, ",{}", lat_lng(*center))?;
                }
                write!(f, ")")
            }
            Boundary::Nearby {
                center,
                radius,
                auto_extend,
            } => write!(
                f,
                "nearby({},{},{})",
                lat_lng(*center),
                radius,
                *auto_extend as u8
            ),
            Boundary::Rectangle {
                south_west,
                north_east,
            } => write!(
                f,
                "rectangle({},{})",
                lat_lng(*south_west),
                lat_lng(*north_east)
            ),
        }
    }
}

/// Optional parameters for place search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOptions {
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub page_size: Option<u32>,
    pub page_index: Option<u32>,
}

/// Optional parameters for keyword suggestions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionOptions {
    pub region_fix: Option<u8>,
    #[serde(skip)]
    pub location: Option<LngLat>,
    pub get_subpois: Option<u8>,
    pub policy: Option<u8>,
    pub filter: Option<String>,
    pub address_format: Option<String>,
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
}

/// Optional parameters for driving routes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QqDrivingOptions {
    pub from_poi: Option<String>,
    /// Vehicle heading at the start, degrees clockwise from north
    pub heading: Option<u16>,
    /// Speed in m/s
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    pub road_type: Option<u8>,
    pub from_track: Option<String>,
    pub to_poi: Option<String>,
    #[serde(skip)]
    pub waypoints: Vec<LngLat>,
    pub policy: Option<String>,
    pub plate_number: Option<String>,
    pub cartype: Option<u8>,
}

/// Optional parameters for transit routes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QqTransitOptions {
    /// Unix timestamp of departure
    pub departure_time: Option<i64>,
    pub policy: Option<String>,
}

/// Travel mode for distance calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
}

impl DistanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMode::Driving => "driving",
            DistanceMode::Walking => "walking",
            DistanceMode::Bicycling => "bicycling",
        }
    }
}

/// QQ Maps Web Service client.
pub struct QQMapClient<C: HttpClient> {
    http_client: C,
    key: String,
    base_url: String,
}

impl<C: HttpClient> QQMapClient<C> {
    pub fn new(http_client: C, key: impl Into<String>) -> Self {
        Self {
            http_client,
            key: key.into(),
            base_url: QQ_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get_result(&self, path: &str, params: Params) -> Result<Value, ProviderError> {
        take_field(self.get_json(path, params)?, "result")
    }

    // Geocoding

    /// Address to coordinates.
    pub fn geocoder(&self, address: &str, region: Option<&str>) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("address", address)
            .with_opt("region", region);
        self.get_result("/ws/geocoder/v1/", params)
    }

    /// Coordinates to address, optionally with nearby POIs.
    pub fn reverse_geocoder(
        &self,
        location: LngLat,
        get_poi: bool,
        poi_options: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("location", lat_lng(location))
            .with("get_poi", get_poi as u8)
            .with_opt("poi_options", poi_options);
        self.get_result("/ws/geocoder/v1/", params)
    }

    // Routing

    pub fn driving(
        &self,
        from: LngLat,
        to: LngLat,
        options: &QqDrivingOptions,
    ) -> Result<Value, ProviderError> {
        let waypoints =
            (!options.waypoints.is_empty()).then(|| join_lat_lng(&options.waypoints));
        let params = Params::new()
            .with("from", lat_lng(from))
            .with("to", lat_lng(to))
            .with_opt("waypoints", waypoints)
            .extend_from(options)?;
        self.get_result("/ws/direction/v1/driving/", params)
    }

    pub fn walking(&self, from: LngLat, to: LngLat) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("from", lat_lng(from))
            .with("to", lat_lng(to));
        self.get_result("/ws/direction/v1/walking/", params)
    }

    pub fn bicycling(&self, from: LngLat, to: LngLat) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("from", lat_lng(from))
            .with("to", lat_lng(to));
        self.get_result("/ws/direction/v1/bicycling/", params)
    }

    pub fn transit(
        &self,
        from: LngLat,
        to: LngLat,
        options: &QqTransitOptions,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("from", lat_lng(from))
            .with("to", lat_lng(to))
            .extend_from(options)?;
        self.get_result("/ws/direction/v1/transit/", params)
    }

    // Search

    /// Place search. Returns the whole body (`count` and `data`).
    pub fn search(
        &self,
        keyword: &str,
        boundary: &Boundary,
        options: &SearchOptions,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("keyword", keyword)
            .with("boundary", boundary)
            .extend_from(options)?;
        self.get_json("/ws/place/v1/search/", params)
    }

    /// Keyword completion. Returns the whole body (`count` and `data`).
    pub fn suggestion(
        &self,
        keyword: &str,
        region: &str,
        options: &SuggestionOptions,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("keyword", keyword)
            .with("region", region)
            .with_opt("location", options.location.map(lat_lng))
            .extend_from(options)?;
        self.get_json("/ws/place/v1/suggestion/", params)
    }

    // Tools

    /// All administrative districts.
    pub fn district_list(&self) -> Result<Value, ProviderError> {
        self.get_result("/ws/district/v1/list", Params::new())
    }

    /// Children of a district, or the provinces when `id` is `None`.
    pub fn district_children(&self, id: Option<&str>) -> Result<Value, ProviderError> {
        self.get_result("/ws/district/v1/getchildren", Params::new().with_opt("id", id))
    }

    pub fn district_search(&self, keyword: &str) -> Result<Value, ProviderError> {
        self.get_result("/ws/district/v1/search", Params::new().with("keyword", keyword))
    }

    /// One-to-many or many-to-one distances.
    ///
    /// Only one of `from` and `to` may hold more than one point.
    pub fn distance(
        &self,
        from: &[LngLat],
        to: &[LngLat],
        mode: DistanceMode,
    ) -> Result<Value, ProviderError> {
        if from.is_empty() || to.is_empty() || (from.len() > 1 && to.len() > 1) {
            return Err(ProviderError::InvalidArgument(
                "only one of from and to may hold multiple points".to_string(),
            ));
        }
        let params = Params::new()
            .with("from", join_lat_lng(from))
            .with("to", join_lat_lng(to))
            .with("mode", mode.as_str());
        self.get_result("/ws/distance/v1/", params)
    }

    /// Many-to-many distance matrix.
    pub fn distance_matrix(
        &self,
        from: &[LngLat],
        to: &[LngLat],
        mode: DistanceMode,
    ) -> Result<Value, ProviderError> {
        if from.is_empty() || to.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "from and to must each hold at least one point".to_string(),
            ));
        }
        let params = Params::new()
            .with("from", join_lat_lng(from))
            .with("to", join_lat_lng(to))
            .with("mode", mode.as_str());
        self.get_result("/ws/distance/v1/matrix", params)
    }

    /// Converts coordinates of `coord_type` to GCJ02.
    ///
    /// `coord_type`: 1 GPS, 2 Sogou, 3 Baidu, 4 MapBar, 5 QQ (no-op), 6 Sogou mercator.
    pub fn translate(
        &self,
        locations: &[LngLat],
        coord_type: u8,
    ) -> Result<Vec<LngLat>, ProviderError> {
        if locations.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "at least one location is required".to_string(),
            ));
        }
        let params = Params::new()
            .with("locations", join_lat_lng(locations))
            .with("type", coord_type);
        let body = self.get_json("/ws/coord/v1/translate", params)?;

        let points = body
            .get("locations")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::DecodeError("missing field 'locations'".to_string()))?;
        points
            .iter()
            .map(|point| {
                let lng = point.get("lng").and_then(Value::as_f64);
                let lat = point.get("lat").and_then(Value::as_f64);
                match (lng, lat) {
                    (Some(lng), Some(lat)) => Ok(LngLat::new(lng, lat)),
                    _ => Err(ProviderError::DecodeError(format!(
                        "bad location {}",
                        point
                    ))),
                }
            })
            .collect()
    }

    /// Locates an IP address.
    pub fn ip(&self, ip: &str) -> Result<Value, ProviderError> {
        self.get_result("/ws/location/v1/ip", Params::new().with("ip", ip))
    }
}

/// Decompresses a route `polyline` array.
///
/// The first pair is an absolute `lat, lng`; every following value is the
/// difference from the value two positions earlier, scaled by 1e6.
pub fn decode_polyline(coors: &[f64]) -> Result<Vec<LngLat>, ProviderError> {
    if coors.len() % 2 != 0 {
        return Err(ProviderError::InvalidArgument(format!(
            "polyline must hold lat/lng pairs, got {} values",
            coors.len()
        )));
    }

    let mut values = coors.to_vec();
    for i in 2..values.len() {
        values[i] = values[i - 2] + values[i] / 1_000_000.0;
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| LngLat::new(pair[1], pair[0]))
        .collect())
}

impl<C: HttpClient> Provider for QQMapClient<C> {
    type Http = C;

    fn name(&self) -> &str {
        "QQ"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &C {
        &self.http_client
    }

    fn authorize(&self, params: &mut Params) {
        params.set("key", &self.key);
    }

    fn check_envelope(&self, body: &Value) -> Result<(), ProviderError> {
        match status_code(body, "status") {
            None | Some(0) => Ok(()),
            Some(status) => Err(ProviderError::ApiError {
                provider: self.name().to_string(),
                code: status.to_string(),
                message: field_text(body, "message").unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;
    use serde_json::json;

    fn client(body: Value) -> QQMapClient<MockHttpClient> {
        QQMapClient::new(MockHttpClient::json(body), "test_key")
    }

    fn ok() -> Value {
        json!({"status": 0, "message": "query ok", "result": {}})
    }

    #[test]
    fn test_geocoder_url() {
        let client = client(ok());
        client.geocoder("北京市海淀区彩和坊路海淀西大街74号", None).unwrap();

        let url = client.http_client().last_url();
        assert!(url.starts_with("https://apis.map.qq.com/ws/geocoder/v1/?"));
        assert!(url.contains("key=test_key"));
    }

    #[test]
    fn test_reverse_geocoder_lat_lng_order() {
        let client = client(ok());
        client
            .reverse_geocoder(LngLat::new(116.307490, 39.984154), true, None)
            .unwrap();

        let url = client.http_client().last_url();
        assert!(url.contains("location=39.984154%2C116.30749"));
        assert!(url.contains("get_poi=1"));
    }

    #[test]
    fn test_error_envelope_normalized() {
        let client = client(json!({"status": 311, "message": "key格式错误"}));
        assert_eq!(
            client.ip("61.135.17.68"),
            Err(ProviderError::ApiError {
                provider: "QQ".to_string(),
                code: "311".to_string(),
                message: "key格式错误".to_string(),
            })
        );
    }

    #[test]
    fn test_ip_path_has_no_trailing_space() {
        let client = client(ok());
        client.ip("61.135.17.68").unwrap();
        assert!(client
            .http_client()
            .last_url()
            .starts_with("https://apis.map.qq.com/ws/location/v1/ip?ip=61.135.17.68"));
    }

    #[test]
    fn test_boundary_display() {
        let region = Boundary::Region {
            city: "北京".to_string(),
            auto_extend: true,
            center: None,
        };
        assert_eq!(region.to_string(), "region(北京,1)");

        let region = Boundary::Region {
            city: "北京".to_string(),
            auto_extend: false,
            center: Some(LngLat::new(116.4, 39.9)),
        };
        assert_eq!(region.to_string(), "region(北京,0,39.9,116.4)");

        let nearby = Boundary::Nearby {
            center: LngLat::new(116.4, 39.9),
            radius: 1000,
            auto_extend: true,
        };
        assert_eq!(nearby.to_string(), "nearby(39.9,116.4,1000,1)");

        let rectangle = Boundary::Rectangle {
            south_west: LngLat::new(116.3, 39.8),
            north_east: LngLat::new(116.5, 40.0),
        };
        assert_eq!(rectangle.to_string(), "rectangle(39.8,116.3,40,116.5)");
    }

    #[test]
    fn test_search_returns_whole_body() {
        let client = client(json!({"status": 0, "count": 1, "data": [{"title": "x"}]}));
        let boundary = Boundary::Nearby {
            center: LngLat::new(116.4, 39.9),
            radius: 500,
            auto_extend: false,
        };
        let options = SearchOptions {
            page_size: Some(10),
            ..Default::default()
        };
        let body = client.search("酒店", &boundary, &options).unwrap();
        assert_eq!(body["count"], 1);

        let url = client.http_client().last_url();
        assert!(url.contains("page_size=10"));
        assert!(url.contains("boundary=nearby%2839.9%2C116.4%2C500%2C0%29"));
    }

    #[test]
    fn test_distance_rejects_many_to_many() {
        let client = client(ok());
        let points = [LngLat::new(116.1, 39.1), LngLat::new(116.2, 39.2)];
        assert!(matches!(
            client.distance(&points, &points, DistanceMode::Driving),
            Err(ProviderError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.distance(&[], &points, DistanceMode::Driving),
            Err(ProviderError::InvalidArgument(_))
        ));
        assert_eq!(client.http_client().request_count(), 0);
    }

    #[test]
    fn test_distance_one_to_many() {
        let client = client(ok());
        let from = [LngLat::new(116.1, 39.1)];
        let to = [LngLat::new(116.2, 39.2), LngLat::new(116.3, 39.3)];
        client.distance(&from, &to, DistanceMode::Walking).unwrap();

        let url = client.http_client().last_url();
        assert!(url.contains("from=39.1%2C116.1"));
        assert!(url.contains("to=39.2%2C116.2%3B39.3%2C116.3"));
        assert!(url.contains("mode=walking"));
    }

    #[test]
    fn test_translate_parses_locations() {
        let client = client(json!({
            "status": 0,
            "locations": [{"lat": 39.98410, "lng": 116.30769}]
        }));
        let points = client.translate(&[LngLat::new(116.3, 39.98)], 1).unwrap();
        assert_eq!(points, vec![LngLat::new(116.30769, 39.98410)]);
        assert!(client.http_client().last_url().contains("type=1"));
    }

    #[test]
    fn test_driving_waypoints() {
        let client = client(ok());
        let options = QqDrivingOptions {
            waypoints: vec![LngLat::new(116.1, 39.1)],
            heading: Some(90),
            ..Default::default()
        };
        client
            .driving(LngLat::new(116.0, 39.0), LngLat::new(116.2, 39.2), &options)
            .unwrap();

        let url = client.http_client().last_url();
        assert!(url.contains("waypoints=39.1%2C116.1"));
        assert!(url.contains("heading=90"));
    }

    #[test]
    fn test_decode_polyline() {
        let coors = [39.984154, 116.307490, 1000.0, -2000.0, 500.0, 0.0];
        let points = decode_polyline(&coors).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], LngLat::new(116.307490, 39.984154));
        assert!((points[1].lat - 39.985154).abs() < 1e-9);
        assert!((points[1].lng - 116.305490).abs() < 1e-9);
        assert!((points[2].lat - 39.985654).abs() < 1e-9);
        assert!((points[2].lng - 116.305490).abs() < 1e-9);
    }

    #[test]
    fn test_decode_polyline_rejects_odd_length() {
        assert!(matches!(
            decode_polyline(&[39.9, 116.4, 1.0]),
            Err(ProviderError::InvalidArgument(_))
        ));
        assert!(decode_polyline(&[]).unwrap().is_empty());
    }
}
