//! Drone http-signature verification
//!
//! Drone signs outgoing webhook calls with a shared secret: the request body
//! is summarized in a `Digest: SHA-256=<base64>` header, and a `Signature`
//! header carries an HMAC-SHA256 over a signing string built from a listed
//! set of headers, e.g.
//!
//! ```text
//! Signature: keyId="hmac-key",algorithm="hmac-sha256",headers="date digest",signature="<base64>"
//! ```
//!
//! Verification checks the body digest first, then recomputes the MAC over
//! the signing string (`name: value` lines for each listed header) and
//! compares in constant time.

use crate::error::AuthError;
use crate::util::SecretString;
use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

const DIGEST_PREFIX: &str = "SHA-256=";

/// Verify the signature of an incoming webhook request.
pub fn verify(secret: &SecretString, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
    verify_digest(headers, body)?;

    let signature = header_str(headers, "signature")?;
    let params = parse_signature_params(signature)?;

    match params.get("algorithm").map(String::as_str) {
        Some("hmac-sha256") => {}
        Some(other) => {
            return Err(AuthError::MalformedHeader {
                header: "signature".to_string(),
                reason: format!("unsupported algorithm '{}'", other),
            });
        }
        None => {
            return Err(AuthError::MalformedHeader {
                header: "signature".to_string(),
                reason: "missing algorithm".to_string(),
            });
        }
    }

    let mac_b64 = params.get("signature").ok_or_else(|| AuthError::MalformedHeader {
        header: "signature".to_string(),
        reason: "missing signature parameter".to_string(),
    })?;
    let expected = BASE64
        .decode(mac_b64)
        .map_err(|_| AuthError::InvalidSignature)?;

    // httpsignatures defaults to signing the date header alone
    let signed_headers = params
        .get("headers")
        .map(String::as_str)
        .unwrap_or("date");
    let signing_string = build_signing_string(headers, signed_headers)?;

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| AuthError::InvalidSignature)?;
    mac.update(signing_string.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidSignature)
}

/// Compute the `Digest` header value for a request body
pub fn body_digest(body: &[u8]) -> String {
    format!("{}{}", DIGEST_PREFIX, BASE64.encode(Sha256::digest(body)))
}

/// Check the body against the `Digest` header
fn verify_digest(headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
    let digest = header_str(headers, "digest")?;

    let Some(claimed) = digest.strip_prefix(DIGEST_PREFIX) else {
        return Err(AuthError::MalformedHeader {
            header: "digest".to_string(),
            reason: "expected SHA-256 digest".to_string(),
        });
    };

    let actual = BASE64.encode(Sha256::digest(body));
    if claimed != actual {
        return Err(AuthError::DigestMismatch);
    }
    Ok(())
}

/// Build the signing string: one `name: value` line per listed header
fn build_signing_string(headers: &HeaderMap, signed_headers: &str) -> Result<String, AuthError> {
    let mut lines = Vec::new();
    for name in signed_headers.split_whitespace() {
        let value = header_str_owned(headers, name)?;
        lines.push(format!("{}: {}", name.to_ascii_lowercase(), value));
    }
    Ok(lines.join("\n"))
}

/// Parse `key="value",key="value"` signature parameters
fn parse_signature_params(header: &str) -> Result<HashMap<String, String>, AuthError> {
    let mut params = HashMap::new();
    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((key, value)) = part.split_once('=') else {
            return Err(AuthError::MalformedHeader {
                header: "signature".to_string(),
                reason: format!("malformed parameter '{}'", part),
            });
        };
        params.insert(
            key.trim().to_ascii_lowercase(),
            value.trim().trim_matches('"').to_string(),
        );
    }
    Ok(params)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .ok_or_else(|| AuthError::MissingHeader {
            header: name.to_string(),
        })?
        .to_str()
        .map_err(|e| AuthError::MalformedHeader {
            header: name.to_string(),
            reason: e.to_string(),
        })
}

fn header_str_owned(headers: &HeaderMap, name: &str) -> Result<String, AuthError> {
    header_str(headers, name).map(str::to_string)
}

/// Sign a request body the way Drone does.
///
/// Returns the `date`, `digest`, and `signature` headers to attach. The
/// inverse of [`verify`]; used by test fixtures and by callers driving the
/// webhook outside of Drone.
pub fn sign(secret: &SecretString, date: &str, body: &[u8]) -> HeaderMap {
    use axum::http::HeaderValue;

    let digest = body_digest(body);

    let signing_string = format!("date: {}\ndigest: {}", date, digest);
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(signing_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(date) {
        headers.insert("date", value);
    }
    if let Ok(value) = HeaderValue::from_str(&digest) {
        headers.insert("digest", value);
    }
    let header = format!(
        "keyId=\"hmac-key\",algorithm=\"hmac-sha256\",headers=\"date digest\",signature=\"{}\"",
        signature
    );
    if let Ok(value) = HeaderValue::from_str(&header) {
        headers.insert("signature", value);
    }
    headers
}
