//! Web service clients for Chinese map providers
//!
//! This module provides clients for the REST APIs of Amap (高德), Baidu (百度)
//! and QQ Maps (腾讯). Each client implements the [`Provider`] trait, which
//! handles URL construction, credentials, JSON decoding and envelope checks.
//! Transport goes through the [`HttpClient`] trait so tests can substitute a
//! recording mock.
//!
//! # Example
//!
//! ```ignore
//! use lbs::provider::{QQMapClient, ReqwestClient};
//!
//! let client = QQMapClient::new(ReqwestClient::new()?, "YOUR_KEY");
//! let result = client.geocoder("北京市海淀区彩和坊路74号", None)?;
//! ```

mod amap;
mod baidu;
mod http;
mod params;
mod qq;
mod signer;
mod types;

pub use amap::{
    AmapClient, DistrictOptions, DrivingOptions, Extensions, InputTipsOptions, RegeoOptions,
    StaticMapOptions, TransitOptions, AMAP_BASE_URL, MAX_CONVERT_POINTS,
};
pub use baidu::{BaiduMapClient, BAIDU_BASE_URL};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use params::Params;
pub use qq::{
    decode_polyline, Boundary, DistanceMode, QQMapClient, QqDrivingOptions, QqTransitOptions,
    SearchOptions, SuggestionOptions, QQ_BASE_URL,
};
pub use signer::Md5Signer;
pub use types::{decode_json, Provider, ProviderError};

#[cfg(test)]
pub use http::tests::MockHttpClient;

use crate::coord::LngLat;

/// Formats points as `lng,lat` joined by `sep` (Amap order).
pub(crate) fn join_lng_lat(points: &[LngLat], sep: &str) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Formats a point as `lat,lng` (Baidu and QQ order).
pub(crate) fn lat_lng(point: LngLat) -> String {
    format!("{},{}", point.lat, point.lng)
}

/// Formats points as `lat,lng` joined by `;`.
pub(crate) fn join_lat_lng(points: &[LngLat]) -> String {
    points
        .iter()
        .map(|p| lat_lng(*p))
        .collect::<Vec<_>>()
        .join(";")
}
