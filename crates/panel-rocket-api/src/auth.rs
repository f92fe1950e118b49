// Request signing for the 1Panel API.
//
// 1Panel authenticates API-key clients with a token derived from the key and
// the current unix second. The server rejects tokens whose timestamp has
// drifted, so a fresh pair is computed for every request.

use md5::{Digest, Md5};
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header carrying the hex token.
pub const TOKEN_HEADER: &str = "1Panel-Token";
/// Header carrying the unix timestamp the token was computed for.
pub const TIMESTAMP_HEADER: &str = "1Panel-Timestamp";
/// Locale sent when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

const TOKEN_PREFIX: &str = "1panel";

/// Timestamp and token for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Seconds since the epoch, as decimal text.
    pub timestamp: String,
    /// Lower-case hex MD5 of `"1panel" + api_key + timestamp`.
    pub token: String,
}

/// Computes the authentication headers attached to every outbound call.
///
/// Holds the API key as a [`SecretString`]; the key itself never appears in
/// a header or a log line.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    api_key: SecretString,
    language: String,
}

impl RequestSigner {
    /// Create a signer. `language` falls back to [`DEFAULT_LANGUAGE`].
    pub fn new(api_key: SecretString, language: Option<&str>) -> Self {
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_owned();
        Self { api_key, language }
    }

    /// The `Accept-Language` value sent with each request.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sign for an explicit unix timestamp.
    pub fn sign_at(&self, timestamp: i64) -> SignedHeaders {
        let timestamp = timestamp.to_string();
        let mut hasher = Md5::new();
        hasher.update(TOKEN_PREFIX.as_bytes());
        hasher.update(self.api_key.expose_secret().as_bytes());
        hasher.update(timestamp.as_bytes());
        let token = hex::encode(hasher.finalize());

        SignedHeaders { timestamp, token }
    }

    /// Sign for the current wall-clock second.
    pub fn sign_now(&self) -> SignedHeaders {
        self.sign_at(chrono::Utc::now().timestamp())
    }

    /// Attach token, timestamp and locale headers to a request.
    ///
    /// The token header is marked sensitive so it stays out of debug output.
    pub fn apply(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let signed = self.sign_now();
        let mut token =
            HeaderValue::from_str(&signed.token).map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        token.set_sensitive(true);

        Ok(builder
            .header(TOKEN_HEADER, token)
            .header(TIMESTAMP_HEADER, signed.timestamp)
            .header(reqwest::header::ACCEPT_LANGUAGE, self.language.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer(key: &str) -> RequestSigner {
        RequestSigner::new(SecretString::from(key.to_owned()), None)
    }

    #[test]
    fn same_second_same_token() {
        let s = signer("secret");
        assert_eq!(s.sign_at(1_700_000_000), s.sign_at(1_700_000_000));
    }

    #[test]
    fn different_seconds_differ() {
        let s = signer("secret");
        let a = s.sign_at(1_700_000_000);
        let b = s.sign_at(1_700_000_001);
        assert_ne!(a.token, b.token);
        assert_eq!(b.timestamp, "1700000001");
    }

    #[test]
    fn different_keys_differ() {
        let a = signer("one").sign_at(42);
        let b = signer("two").sign_at(42);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn token_is_md5_of_prefix_key_and_timestamp() {
        let signed = signer("abc").sign_at(1_234);
        assert_eq!(signed.token, hex::encode(Md5::digest(b"1panelabc1234")));
        assert_eq!(signed.token.len(), 32);
        assert!(
            signed
                .token
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn language_defaults_to_en() {
        assert_eq!(signer("k").language(), "en");
        let zh = RequestSigner::new(SecretString::from("k".to_owned()), Some("zh"));
        assert_eq!(zh.language(), "zh");
        let blank = RequestSigner::new(SecretString::from("k".to_owned()), Some("  "));
        assert_eq!(blank.language(), "en");
    }

    #[test]
    fn token_header_is_sensitive() {
        let s = RequestSigner::new(SecretString::from("k".to_owned()), Some("zh"));
        let request = s
            .apply(reqwest::Client::new().get("http://127.0.0.1/api/v1/"))
            .unwrap()
            .build()
            .unwrap();

        let headers = request.headers();
        assert!(headers[TOKEN_HEADER].is_sensitive());
        assert!(!headers[TIMESTAMP_HEADER].is_sensitive());
        assert_eq!(headers[reqwest::header::ACCEPT_LANGUAGE], "zh");
    }
}
