//! Query parameter builder.

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use super::types::ProviderError;

/// Ordered query parameters.
///
/// Optional values that are `None` are skipped, so endpoint methods can
/// forward every documented parameter without checking each one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for the same name.
    pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
        self
    }

    /// Builder form of [`Params::set`].
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn with_opt<T: ToString>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    /// Flattens a serializable options struct into parameters.
    ///
    /// Fields serialized as `null` are skipped and booleans become
    /// `true`/`false`. Nested arrays or objects are rejected.
    pub fn extend_from<T: Serialize>(mut self, options: &T) -> Result<Self, ProviderError> {
        let value = serde_json::to_value(options)
            .map_err(|e| ProviderError::InvalidArgument(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ProviderError::InvalidArgument(
                "options must serialize to an object".to_string(),
            ));
        };

        for (key, field) in fields {
            match field {
                Value::Null => {}
                Value::String(s) => {
                    self.set(&key, s);
                }
                Value::Bool(b) => {
                    self.set(&key, b);
                }
                Value::Number(n) => {
                    self.set(&key, n);
                }
                Value::Array(_) | Value::Object(_) => {
                    return Err(ProviderError::InvalidArgument(format!(
                        "parameter '{}' is not a scalar",
                        key
                    )));
                }
            }
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Joins `path` onto `base_url` and appends the encoded parameters.
    ///
    /// Absolute `http(s)://` paths bypass the base URL.
    pub fn to_url(&self, base_url: &str, path: &str) -> Result<String, ProviderError> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            Url::parse(base_url).and_then(|base| base.join(path))
        }
        .map_err(|e| ProviderError::InvalidArgument(format!("Bad URL '{}': {}", path, e)))?;

        if !self.pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(self.pairs.iter());
        }
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Default)]
    struct Options {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        radius: u32,
        batch: Option<bool>,
    }

    #[test]
    fn test_with_opt_skips_none() {
        let params = Params::new()
            .with("address", "北京市朝阳区")
            .with_opt("city", None::<&str>)
            .with_opt("batch", Some(true));

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("batch"), Some("true"));
        assert_eq!(params.get("city"), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let mut params = Params::new().with("key", "old");
        params.set("key", "new");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("key"), Some("new"));
    }

    #[test]
    fn test_extend_from_options() {
        let options = Options {
            city: Some("010".to_string()),
            radius: 1000,
            batch: None,
        };
        let params = Params::new().extend_from(&options).unwrap();

        assert_eq!(params.get("city"), Some("010"));
        assert_eq!(params.get("radius"), Some("1000"));
        assert_eq!(params.get("batch"), None);
    }

    #[test]
    fn test_extend_from_rejects_non_object() {
        let result = Params::new().extend_from(&vec![1, 2]);
        assert!(matches!(result, Err(ProviderError::InvalidArgument(_))));
    }

    #[test]
    fn test_to_url_joins_and_encodes() {
        let params = Params::new()
            .with("location", "116.4,39.9")
            .with("key", "abc");
        let url = params
            .to_url("https://restapi.amap.com/", "/v3/geocode/regeo")
            .unwrap();
        assert_eq!(
            url,
            "https://restapi.amap.com/v3/geocode/regeo?location=116.4%2C39.9&key=abc"
        );
    }

    #[test]
    fn test_to_url_without_params_has_no_query() {
        let url = Params::new()
            .to_url("https://apis.map.qq.com/", "/ws/district/v1/list")
            .unwrap();
        assert_eq!(url, "https://apis.map.qq.com/ws/district/v1/list");
    }

    #[test]
    fn test_to_url_absolute_path_overrides_base() {
        let url = Params::new()
            .with("a", "1")
            .to_url("https://restapi.amap.com/", "https://example.com/x")
            .unwrap();
        assert_eq!(url, "https://example.com/x?a=1");
    }
}
