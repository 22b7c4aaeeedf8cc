//! Tobit access-token decoding.
//!
//! Tokens are JWT shaped (`header.payload.signature`). Only the payload is read; signatures are
//! checked by the backend, never here.

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};
use serde::{Deserialize, Serialize};

use crate::de::{lenient_i64, lenient_string, lenient_strings};

/// Role carried by accounting accounts; hides the intercom tapp.
pub const ROLE_TOBIT_BUHA: &str = "tobitBuha";

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Identity fields decoded from an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessTokenPayload {
    /// Tobit user id, `0` when absent.
    #[serde(rename = "TobitUserID", deserialize_with = "lenient_i64")]
    pub tobit_user_id: i64,
    /// First name.
    #[serde(rename = "FirstName", deserialize_with = "lenient_string")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "LastName", deserialize_with = "lenient_string")]
    pub last_name: String,
    /// Person id, e.g. `141-24297`.
    #[serde(rename = "PersonID", deserialize_with = "lenient_string")]
    pub person_id: String,
    /// Facebook user id.
    #[serde(rename = "FacebookUserID", deserialize_with = "lenient_string")]
    pub facebook_user_id: String,
    /// Location the token was issued for, `0` when absent.
    #[serde(rename = "LocationID", deserialize_with = "lenient_i64")]
    pub location_id: i64,
    /// Role names.
    #[serde(deserialize_with = "lenient_strings")]
    pub roles: Vec<String>,
}

impl AccessTokenPayload {
    /// Returns whether the payload carries `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|candidate| candidate == role)
    }

    /// `"First Last"` when both names are present, otherwise empty.
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Decodes the payload segment of `token`.
///
/// Returns `None` for empty, malformed, or non-JSON tokens. Never panics.
pub fn decode_access_token(token: &str) -> Option<AccessTokenPayload> {
    let token = token.trim();
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };
    let bytes = URL_SAFE_LENIENT.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Checks that `token` is structurally usable: non-blank, decodable, and bound to a user.
pub fn validate_access_token(token: &str) -> bool {
    if token.trim().is_empty() {
        return false;
    }
    decode_access_token(token).is_some_and(|payload| payload.tobit_user_id != 0)
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_LENIENT.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_LENIENT.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_identity_fields() {
        let token = encode_test_token(&json!({
            "TobitUserID": 1234,
            "FirstName": "Ada",
            "LastName": "Lovelace",
            "PersonID": "141-24297",
            "FacebookUserID": "998877",
            "LocationID": 1214,
            "roles": ["user", "tobitBuha"],
            "exp": 1900000000
        }));

        let payload = decode_access_token(&token).expect("payload");
        assert_eq!(payload.tobit_user_id, 1234);
        assert_eq!(payload.person_id, "141-24297");
        assert_eq!(payload.location_id, 1214);
        assert_eq!(payload.display_name(), "Ada Lovelace");
        assert!(payload.has_role(ROLE_TOBIT_BUHA));
        assert!(validate_access_token(&token));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let token = encode_test_token(&json!({ "TobitUserID": "42", "roles": null }));
        let payload = decode_access_token(&token).expect("payload");
        assert_eq!(
            payload,
            AccessTokenPayload {
                tobit_user_id: 42,
                ..Default::default()
            }
        );
        assert_eq!(payload.display_name(), "");
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        for token in ["", "   ", "abc", "a.b", "a.b.c.d", "a.!!!.c", "a.bm90IGpzb24.c"] {
            assert_eq!(decode_access_token(token), None, "token {token:?}");
            assert!(!validate_access_token(token), "token {token:?}");
        }
    }

    #[test]
    fn decoding_is_idempotent() {
        let token = encode_test_token(&json!({ "TobitUserID": 7 }));
        assert_eq!(decode_access_token(&token), decode_access_token(&token));
    }

    #[test]
    fn token_without_user_id_is_invalid() {
        let token = encode_test_token(&json!({ "FirstName": "Anon" }));
        assert!(decode_access_token(&token).is_some());
        assert!(!validate_access_token(&token));
    }

    #[test]
    fn accepts_padded_payloads() {
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(json!({ "TobitUserID": 5 }).to_string());
        let token = format!("e30.{payload}.sig");
        assert_eq!(
            decode_access_token(&token).map(|p| p.tobit_user_id),
            Some(5)
        );
    }
}
