//! Amap (高德地图) Web Service API client.
//!
//! # Authentication
//!
//! Every request carries the application `key`. When the application has
//! digital signatures enabled, a private key is also configured and each
//! request gets a `sig` parameter computed by [`Md5Signer`].
//!
//! # Envelope
//!
//! v3 endpoints answer `{"status": "1", "info": "OK", "infocode": "10000", ...}`;
//! any status other than 1 is an error. v4 endpoints use
//! `{"errcode": 0, "errmsg": "OK", "data": ...}`.
//!
//! # Example
//!
//! ```no_run
//! use lbs::coord::LngLat;
//! use lbs::provider::{AmapClient, RegeoOptions, ReqwestClient};
//!
//! let client = AmapClient::new(ReqwestClient::new()?, "YOUR_KEY");
//! let regeocode = client.regeo(LngLat::new(116.481488, 39.990464), &RegeoOptions::default())?;
//! println!("{}", regeocode["formatted_address"]);
//! # Ok::<(), lbs::provider::ProviderError>(())
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::coord::LngLat;
use crate::provider::types::{field_text, status_code, take_field};
use crate::provider::{join_lng_lat, HttpClient, Md5Signer, Params, Provider, ProviderError};

/// Production endpoint.
pub const AMAP_BASE_URL: &str = "https://restapi.amap.com/";

/// Most points accepted by one coordinate conversion request.
pub const MAX_CONVERT_POINTS: usize = 40;

/// Level of detail in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extensions {
    Base,
    All,
}

/// Optional parameters for reverse geocoding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegeoOptions {
    pub poitype: Option<String>,
    /// Search radius in metres (0-3000)
    pub radius: Option<u32>,
    pub extensions: Option<Extensions>,
    pub roadlevel: Option<u8>,
    pub homeorcorp: Option<u8>,
}

/// Optional parameters for integrated transit routing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransitOptions {
    /// Destination city for cross-city routes
    pub cityd: Option<String>,
    pub extensions: Option<Extensions>,
    pub strategy: Option<u8>,
    pub nightflag: Option<u8>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Optional parameters for driving routes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrivingOptions {
    pub originid: Option<String>,
    pub destinationid: Option<String>,
    pub origintype: Option<String>,
    pub destinationtype: Option<String>,
    pub strategy: Option<u8>,
    /// Intermediate points, at most 16
    #[serde(skip)]
    pub waypoints: Vec<LngLat>,
    pub avoidpolygons: Option<String>,
    pub avoidroad: Option<String>,
    /// Plate province abbreviation, e.g. 京
    pub province: Option<String>,
    /// Plate number without the province
    pub number: Option<String>,
    pub cartype: Option<u8>,
    pub ferry: Option<u8>,
    pub roadaggregation: Option<bool>,
    pub nosteps: Option<u8>,
    pub extensions: Option<Extensions>,
}

/// Optional parameters for administrative district queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistrictOptions {
    pub keywords: Option<String>,
    pub subdistrict: Option<u8>,
    pub page: Option<u32>,
    pub offset: Option<u32>,
    pub extensions: Option<Extensions>,
    pub filter: Option<String>,
}

/// Optional parameters for input tips.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InputTipsOptions {
    #[serde(rename = "type")]
    pub poi_type: Option<String>,
    #[serde(skip)]
    pub location: Option<LngLat>,
    pub city: Option<String>,
    pub citylimit: Option<bool>,
    pub datatype: Option<String>,
}

/// Parameters for a static map image URL.
#[derive(Debug, Clone, Serialize)]
pub struct StaticMapOptions {
    pub zoom: u8,
    #[serde(skip)]
    pub location: Option<LngLat>,
    /// Image size as `width*height`
    pub size: String,
    /// 1 for normal, 2 for high DPI
    pub scale: u8,
    pub markers: Option<String>,
    pub labels: Option<String>,
    pub paths: Option<String>,
    pub traffic: Option<u8>,
}

impl StaticMapOptions {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            location: None,
            size: "400*400".to_string(),
            scale: 1,
            markers: None,
            labels: None,
            paths: None,
            traffic: None,
        }
    }
}

/// Amap Web Service client.
pub struct AmapClient<C: HttpClient> {
    http_client: C,
    key: String,
    sig_key: Option<String>,
    base_url: String,
}

impl<C: HttpClient> AmapClient<C> {
    /// Creates a client for the given application key.
    pub fn new(http_client: C, key: impl Into<String>) -> Self {
        Self {
            http_client,
            key: key.into(),
            sig_key: None,
            base_url: AMAP_BASE_URL.to_string(),
        }
    }

    /// Enables request signing with the application's private key.
    pub fn with_sig_key(mut self, sig_key: impl Into<String>) -> Self {
        self.sig_key = Some(sig_key.into());
        self
    }

    /// Points the client at a different host, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Signature for a parameter set, as sent in `sig`.
    pub fn signature(&self, params: &Params, sig_key: &str) -> String {
        let mut signer = Md5Signer::new().with_delimiter("&").with_key(sig_key);
        for (k, v) in params.iter().filter(|(k, _)| *k != "sig") {
            signer.add_data(format!("{}={}", k, v));
        }
        signer.signature()
    }

    // Geocoding

    /// Structured address to coordinates. Returns the `geocodes` array.
    pub fn geo(&self, address: &str, city: Option<&str>) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("address", address)
            .with_opt("city", city);
        take_field(self.get_json("/v3/geocode/geo", params)?, "geocodes")
    }

    /// Geocodes several addresses in one request.
    pub fn geo_batch(&self, addresses: &[&str], city: Option<&str>) -> Result<Value, ProviderError> {
        if addresses.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "at least one address is required".to_string(),
            ));
        }
        let params = Params::new()
            .with("address", addresses.join("|"))
            .with_opt("city", city)
            .with("batch", addresses.len() > 1);
        take_field(self.get_json("/v3/geocode/geo", params)?, "geocodes")
    }

    /// Coordinates to address. Returns the `regeocode` object.
    pub fn regeo(&self, location: LngLat, options: &RegeoOptions) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("location", location)
            .extend_from(options)?;
        take_field(self.get_json("/v3/geocode/regeo", params)?, "regeocode")
    }

    /// Reverse geocodes several points. Returns the `regeocodes` array.
    pub fn regeo_batch(
        &self,
        locations: &[LngLat],
        options: &RegeoOptions,
    ) -> Result<Value, ProviderError> {
        if locations.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "at least one location is required".to_string(),
            ));
        }
        let params = Params::new()
            .with("location", join_lng_lat(locations, "|"))
            .with("batch", true)
            .extend_from(options)?;
        take_field(self.get_json("/v3/geocode/regeo", params)?, "regeocodes")
    }

    // Routing

    /// Walking route. Returns the `route` object.
    pub fn walking(&self, origin: LngLat, destination: LngLat) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("origin", origin)
            .with("destination", destination);
        take_field(self.get_json("/v3/direction/walking", params)?, "route")
    }

    /// Public transit route within or between cities.
    pub fn transit_integrated(
        &self,
        origin: LngLat,
        destination: LngLat,
        city: &str,
        options: &TransitOptions,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("origin", origin)
            .with("destination", destination)
            .with("city", city)
            .extend_from(options)?;
        take_field(
            self.get_json("/v3/direction/transit/integrated", params)?,
            "route",
        )
    }

    /// Driving route.
    pub fn driving(
        &self,
        origin: LngLat,
        destination: LngLat,
        options: &DrivingOptions,
    ) -> Result<Value, ProviderError> {
        if options.waypoints.len() > 16 {
            return Err(ProviderError::InvalidArgument(format!(
                "at most 16 waypoints are allowed, got {}",
                options.waypoints.len()
            )));
        }
        let waypoints =
            (!options.waypoints.is_empty()).then(|| join_lng_lat(&options.waypoints, ";"));
        let params = Params::new()
            .with("origin", origin)
            .with("destination", destination)
            .with_opt("waypoints", waypoints)
            .extend_from(options)?;
        take_field(self.get_json("/v3/direction/driving", params)?, "route")
    }

    // Tools

    /// Administrative district lookup. Returns the `districts` array.
    pub fn district(&self, options: &DistrictOptions) -> Result<Value, ProviderError> {
        let params = Params::new().extend_from(options)?;
        take_field(self.get_json("/v3/config/district", params)?, "districts")
    }

    /// Locates an IPv4 address.
    pub fn ip(&self, ip: &str) -> Result<Value, ProviderError> {
        self.get_json("/v3/ip", Params::new().with("ip", ip))
    }

    /// Converts GPS, Baidu or MapBar coordinates to Amap's GCJ02.
    ///
    /// # Arguments
    ///
    /// * `locations` - 1 to 40 points
    /// * `coordsys` - Source system: `gps`, `mapbar`, `baidu` or `autonavi`
    pub fn convert(&self, locations: &[LngLat], coordsys: &str) -> Result<Vec<LngLat>, ProviderError> {
        if locations.is_empty() || locations.len() > MAX_CONVERT_POINTS {
            return Err(ProviderError::InvalidArgument(format!(
                "convert takes 1 to {} points, got {}",
                MAX_CONVERT_POINTS,
                locations.len()
            )));
        }
        let params = Params::new()
            .with("locations", join_lng_lat(locations, "|"))
            .with("coordsys", coordsys);
        let body = self.get_json("/v3/assistant/coordinate/convert", params)?;

        let text = body
            .get("locations")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::DecodeError("missing field 'locations'".to_string()))?;
        text.split(';')
            .map(|pair| {
                pair.parse::<LngLat>()
                    .map_err(|e| ProviderError::DecodeError(e.to_string()))
            })
            .collect()
    }

    /// Keyword suggestions while typing. Returns the `tips` array.
    pub fn inputtips(&self, keywords: &str, options: &InputTipsOptions) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("keywords", keywords)
            .with_opt("location", options.location)
            .extend_from(options)?;
        take_field(self.get_json("/v3/assistant/inputtips", params)?, "tips")
    }

    /// Weather for a city `adcode`. `extensions` is `base` (live) or `all` (forecast).
    pub fn weather(&self, city: &str, extensions: Option<Extensions>) -> Result<Value, ProviderError> {
        let params = Params::new().with("city", city).extend_from(&WeatherParams { extensions })?;
        self.get_json("/v3/weather/weatherInfo", params)
    }

    /// URL of a static map image. Nothing is requested.
    pub fn static_map_url(&self, options: &StaticMapOptions) -> Result<String, ProviderError> {
        let params = Params::new()
            .with_opt("location", options.location)
            .extend_from(options)?;
        self.signed_url("/v3/staticmap", params)
    }

    /// Snaps a recorded driving track to roads.
    ///
    /// `points` is the JSON array of `{x, y, sp, ag, tm}` samples.
    pub fn grasproad(&self, points: &Value) -> Result<Value, ProviderError> {
        self.post_json("/v4/grasproad/driving", Params::new(), points)
    }
}

#[derive(Serialize)]
struct WeatherParams {
    extensions: Option<Extensions>,
}

impl<C: HttpClient> Provider for AmapClient<C> {
    type Http = C;

    fn name(&self) -> &str {
        "Amap"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &C {
        &self.http_client
    }

    fn authorize(&self, params: &mut Params) {
        params.set("key", &self.key);
        if let Some(sig_key) = &self.sig_key {
            let sig = self.signature(params, sig_key);
            params.set("sig", sig);
        }
    }

    fn check_envelope(&self, body: &Value) -> Result<(), ProviderError> {
        if body.get("status").is_some() {
            let status = status_code(body, "status");
            if status == Some(1) {
                return Ok(());
            }
            let code = field_text(body, "infocode")
                .or_else(|| field_text(body, "status"))
                .unwrap_or_default();
            let message = field_text(body, "info").unwrap_or_else(|| code.clone());
            return Err(ProviderError::ApiError {
                provider: self.name().to_string(),
                code,
                message,
            });
        }

        match status_code(body, "errcode") {
            None | Some(0) => Ok(()),
            Some(errcode) => Err(ProviderError::ApiError {
                provider: self.name().to_string(),
                code: errcode.to_string(),
                message: field_text(body, "errmsg").unwrap_or_default(),
            }),
        }
    }
}
