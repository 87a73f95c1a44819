//! Device identity, request signing and session token decoding.
//!
//! The Amino service authenticates clients with three reverse-engineered
//! mechanisms:
//!
//! - every request carries a pseudo-random device identifier
//!   ([`generate_device_id`]),
//! - every request with a body carries an HMAC-SHA1 signature over the exact
//!   body bytes ([`generate_signature`]),
//! - the session id issued at login is URL-safe base64 wrapping a JSON
//!   object that embeds the account's user id ([`decode_session_id`]).
//!
//! The keys, the prefix byte and the token framing offsets below are
//! protocol constants captured from the mobile client. They are not derived
//! and must be preserved exactly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::{Map, Value};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Version marker prepended to HMAC digests and device identifier payloads.
pub const PREFIX: u8 = 0x19;

/// Key for the device identifier HMAC.
pub const DEVICE_KEY: [u8; 20] = [
    0xE7, 0x30, 0x9E, 0xCC, 0x09, 0x53, 0xC6, 0xFA, 0x60, 0x00, 0x5B, 0x27, 0x65, 0xF9, 0x9D,
    0xBB, 0xC9, 0x65, 0xC8, 0xE9,
];

/// Key for the request body signature HMAC.
pub const SIGNATURE_KEY: [u8; 20] = [
    0xDF, 0xA5, 0xED, 0x19, 0x2D, 0xDA, 0x6E, 0x88, 0xA1, 0x2F, 0xE1, 0x21, 0x30, 0xDC, 0x62,
    0x06, 0xB1, 0x25, 0x1E, 0x44,
];

/// Leading bytes of a decoded session id (version/type marker).
pub const SESSION_PREFIX_LEN: usize = 1;

/// Trailing bytes of a decoded session id (service-side MAC).
pub const SESSION_MAC_LEN: usize = 20;

/// JSON key under which the session payload stores the user id.
const USER_ID_KEY: &str = "2";

/// Errors raised while decoding a session id.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("session id is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("decoded session id is {0} bytes, shorter than the 21 byte framing")]
    TooShort(usize),
    #[error("session payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("session payload is not a JSON object")]
    NotAnObject,
    #[error("session payload has no user id under key \"2\"")]
    MissingUserId,
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> [u8; 20] {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Computes the `NDC-MSG-SIG` header value for a request body.
///
/// Standard-alphabet, padded base64 of the prefix byte followed by
/// `HMAC-SHA1(SIGNATURE_KEY, data)`. Deterministic for a given body.
pub fn generate_signature(data: &[u8]) -> String {
    let mut tag = Vec::with_capacity(1 + 20);
    tag.push(PREFIX);
    tag.extend_from_slice(&hmac_sha1(&SIGNATURE_KEY, data));
    STANDARD.encode(tag)
}

/// Builds a device identifier from caller-supplied entropy.
///
/// The identifier payload is the prefix byte followed by the 20 entropy
/// bytes; the result is the uppercase hex of the payload concatenated with
/// the uppercase hex of `HMAC-SHA1(DEVICE_KEY, payload)`, 82 characters in
/// total. Exposed separately from [`generate_device_id`] so fixed
/// identifiers can be reproduced.
pub fn device_id_from_entropy(entropy: &[u8; 20]) -> String {
    let mut identifier = [0u8; 1 + 20];
    identifier[0] = PREFIX;
    identifier[1..].copy_from_slice(entropy);
    let digest = hmac_sha1(&DEVICE_KEY, &identifier);
    format!(
        "{}{}",
        hex::encode_upper(identifier),
        hex::encode_upper(digest)
    )
}

/// Generates a fresh pseudo-random device identifier.
///
/// Draws 20 bytes from the operating system RNG and delegates to
/// [`device_id_from_entropy`]. Each call returns a new identifier; callers
/// that need a stable identity must cache the result (the
/// [`ApiClient`](crate::client::ApiClient) memoizes one per instance).
pub fn generate_device_id() -> String {
    let mut entropy = [0u8; 20];
    OsRng.fill_bytes(&mut entropy);
    device_id_from_entropy(&entropy)
}

/// Decodes a session id into the JSON object embedded in it.
///
/// Session ids are URL-safe base64 (`-`/`_` alphabet, padding stripped) of
/// a blob laid out as one version byte, a UTF-8 JSON object, and a 20 byte
/// trailing MAC. The framing bytes are discarded; only the JSON object is
/// returned.
///
/// # Errors
///
/// Fails if the input is not valid base64, decodes to fewer than 21 bytes,
/// or the middle slice is not a UTF-8 JSON object.
pub fn decode_session_id(session_id: &str) -> Result<Map<String, Value>, DecodeError> {
    let mut normalized = session_id.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let raw = STANDARD.decode(normalized.as_bytes())?;
    if raw.len() < SESSION_PREFIX_LEN + SESSION_MAC_LEN {
        return Err(DecodeError::TooShort(raw.len()));
    }

    let payload = &raw[SESSION_PREFIX_LEN..raw.len() - SESSION_MAC_LEN];
    match serde_json::from_slice(payload)? {
        Value::Object(object) => Ok(object),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Extracts the user id embedded in a session id.
///
/// # Errors
///
/// Fails on any [`decode_session_id`] error, or when the decoded object has
/// no string value under key `"2"`.
pub fn session_id_to_user_id(session_id: &str) -> Result<String, DecodeError> {
    match decode_session_id(session_id)?.get(USER_ID_KEY) {
        Some(Value::String(user_id)) => Ok(user_id.clone()),
        _ => Err(DecodeError::MissingUserId),
    }
}
