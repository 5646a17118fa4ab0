//! MD5 request signing.
//!
//! Amap's digital signature: the request's `name=value` pairs are sorted,
//! joined with `&`, the private key is appended, and the MD5 hex digest of
//! the result is sent as `sig`.

use md5::{Digest, Md5};

/// Accumulates string parts and produces their MD5 signature.
///
/// # Example
///
/// ```
/// use lbs::provider::Md5Signer;
///
/// let mut signer = Md5Signer::new().with_suffix("123");
/// signer.add_data("789");
/// signer.add_data("456");
/// signer.add_data("123");
/// assert_eq!(signer.signature(), "df96220fa161767c5cbb95567855c86b");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Md5Signer {
    data: Vec<String>,
    delimiter: String,
    key: String,
    suffix: String,
}

impl Md5Signer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Separator placed between sorted parts.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Secret appended directly after the joined parts.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Trailing text appended after the key.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn add_data(&mut self, part: impl Into<String>) {
        self.data.push(part.into());
    }

    /// The string that gets hashed.
    pub fn string_to_sign(&self) -> String {
        let mut parts: Vec<&str> = self.data.iter().map(String::as_str).collect();
        parts.sort_unstable();

        let mut text = parts.join(&self.delimiter);
        text.push_str(&self.key);
        text.push_str(&self.suffix);
        text
    }

    /// Lowercase hex MD5 of [`Md5Signer::string_to_sign`].
    pub fn signature(&self) -> String {
        let digest = Md5::digest(self.string_to_sign().as_bytes());
        format!("{:x}", digest)
    }
}
