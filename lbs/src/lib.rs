//! LBS - Location toolkit for Chinese map services
//!
//! This library converts coordinates between the WGS84, GCJ02 and BD09
//! reference systems, addresses Web Mercator tiles by pixel, tile index and
//! quad key, and wraps the REST APIs of Amap, Baidu and QQ Maps.
//!
//! - [`coord`]: pure coordinate conversion
//! - [`tile`]: pure tile system math
//! - [`provider`]: blocking HTTP clients for the map providers
//! - [`config`]: INI configuration file holding provider credentials

pub mod config;
pub mod coord;
pub mod provider;
pub mod tile;
