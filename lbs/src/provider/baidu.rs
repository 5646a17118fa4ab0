//! Baidu Maps (百度地图) Web Service API client.
//!
//! Requests are authenticated with the application `ak`. Baidu answers
//! `{"status": 0, "result": ...}` on success; any other status is an error
//! described by `message` (or `msg` on some older endpoints).
//!
//! Baidu expects `lat,lng` order in `location` parameters and returns BD09
//! coordinates unless told otherwise; see [`crate::coord`] for conversion.

use serde_json::Value;

use crate::coord::LngLat;
use crate::provider::types::{field_text, status_code, take_field};
use crate::provider::{lat_lng, HttpClient, Params, Provider, ProviderError};

/// Production endpoint.
pub const BAIDU_BASE_URL: &str = "https://api.map.baidu.com/";

/// Baidu Maps Web Service client.
pub struct BaiduMapClient<C: HttpClient> {
    http_client: C,
    ak: String,
    base_url: String,
}

impl<C: HttpClient> BaiduMapClient<C> {
    pub fn new(http_client: C, ak: impl Into<String>) -> Self {
        Self {
            http_client,
            ak: ak.into(),
            base_url: BAIDU_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Calls any endpoint and returns the checked response body.
    pub fn get(&self, path: &str, params: Params) -> Result<Value, ProviderError> {
        self.get_json(path, params.with("output", "json"))
    }

    /// Address to coordinates. Returns the `result` object.
    pub fn geocoding(&self, address: &str, city: Option<&str>) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("address", address)
            .with_opt("city", city);
        take_field(self.get("/geocoding/v3/", params)?, "result")
    }

    /// Coordinates to address. Returns the `result` object.
    ///
    /// `coordtype` names the input system (`bd09ll`, `gcj02ll` or `wgs84ll`).
    pub fn reverse_geocoding(
        &self,
        location: LngLat,
        coordtype: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let params = Params::new()
            .with("location", lat_lng(location))
            .with_opt("coordtype", coordtype);
        take_field(self.get("/reverse_geocoding/v3/", params)?, "result")
    }
}

impl<C: HttpClient> Provider for BaiduMapClient<C> {
    type Http = C;

    fn name(&self) -> &str {
        "Baidu"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &C {
        &self.http_client
    }

    fn authorize(&self, params: &mut Params) {
        params.set("ak", &self.ak);
    }

    fn check_envelope(&self, body: &Value) -> Result<(), ProviderError> {
        match status_code(body, "status") {
            None | Some(0) => Ok(()),
            Some(status) => Err(ProviderError::ApiError {
                provider: self.name().to_string(),
                code: status.to_string(),
                message: field_text(body, "message")
                    .or_else(|| field_text(body, "msg"))
                    .unwrap_or_default(),
            }),
        }
    }
}
