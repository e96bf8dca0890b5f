//! OAuth 1.0a (HMAC-SHA1) request signing for user-context calls.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Credentials;

/// Everything except RFC 3986 unreserved characters.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<sha1::Sha1>;

pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuth1Signer {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            consumer_key: credentials.api_key.clone(),
            consumer_secret: credentials.api_key_secret.clone(),
            token: credentials.access_token.clone(),
            token_secret: credentials.access_token_secret.clone(),
        }
    }

    /// `Authorization` header value for a request. `params` are the query or
    /// form-urlencoded body parameters; multipart fields are never signed.
    pub fn authorization(&self, method: &str, url: &str, params: &BTreeMap<String, String>) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        self.authorization_with(method, url, params, &nonce, &timestamp)
    }

    fn authorization_with(
        &self,
        method: &str,
        url: &str,
        params: &BTreeMap<String, String>,
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth = self.oauth_params(nonce, timestamp);

        let mut signed = oauth.clone();
        signed.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        oauth.insert("oauth_signature".into(), self.sign(&base_string(method, url, &signed)));

        let fields: Vec<String> = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ])
    }

    fn sign(&self, base: &str) -> String {
        let key = format!("{}&{}", encode(&self.consumer_secret), encode(&self.token_secret));
        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
        mac.update(base.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

fn base_string(method: &str, url: &str, params: &BTreeMap<String, String>) -> String {
    // Keys and values are sorted after encoding; for the ASCII keys used here
    // that is the same order as the BTreeMap.
    let normalized = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&normalized)
    )
}

pub fn encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986).to_string()
}
