//! Query-string parameters of the page URL.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameter naming the tapp to open.
pub const PARAM_TAPP_ID: &str = "tappid";
/// Query parameter naming the location.
pub const PARAM_LOCATION_ID: &str = "locationid";
/// Query parameter carrying an access token to sign in with.
pub const PARAM_ACCESS_TOKEN: &str = "accesstoken";
/// Query parameter overriding the location color mode.
pub const PARAM_COLOR_MODE: &str = "colormode";
/// Query parameter overriding the location color.
pub const PARAM_COLOR: &str = "color";
/// Query flag that forces the login flow.
pub const PARAM_FORCE_LOGIN: &str = "forcelogin";

/// Decoded query parameters with lower-cased keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParameters {
    values: BTreeMap<String, String>,
}

impl UrlParameters {
    /// Returns the value for `key` (lower-case).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value for `key` unless it is empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns whether `key` is present, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Reads the leading integer of the value for `key`.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(parse_leading_int)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for UrlParameters {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in iter {
            values.insert(key.to_lowercase(), value);
        }
        Self { values }
    }
}

/// Parses the query string of `href`.
///
/// Accepts a full URL, a bare `?query`, or a bare `a=1&b=2` string. The fragment is ignored, keys
/// are lower-cased, and the last occurrence of a key wins.
pub fn parse_url_parameters(href: &str) -> UrlParameters {
    let without_fragment = href.split_once('#').map_or(href, |(head, _)| head);
    let query = match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains('=') && !without_fragment.contains("://") => {
            without_fragment
        }
        None => "",
    };

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Parses a leading base-10 integer the way browsers' `parseInt` does: surrounding whitespace and
/// trailing garbage are ignored, a missing digit run yields `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_duplicate_wins() {
        let params = parse_url_parameters("?a=1&a=2");
        assert_eq!(params.get("a"), Some("2"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_url_parameters("").is_empty());
        assert!(parse_url_parameters("https://chayns.net/").is_empty());
        assert!(parse_url_parameters("?").is_empty());
    }

    #[test]
    fn keys_are_lower_cased_and_values_decoded() {
        let params = parse_url_parameters(
            "https://chayns.net/page?TappId=12&LocationID=1214&color=%23ff0000&name=a+b#section=x",
        );
        assert_eq!(params.get_int(PARAM_TAPP_ID), Some(12));
        assert_eq!(params.get_int(PARAM_LOCATION_ID), Some(1214));
        assert_eq!(params.get(PARAM_COLOR), Some("#ff0000"));
        assert_eq!(params.get("name"), Some("a b"));
        assert!(!params.contains("section"));
    }

    #[test]
    fn valueless_flags_are_present() {
        let params = parse_url_parameters("?tappid=1&forcelogin");
        assert!(params.contains(PARAM_FORCE_LOGIN));
        assert_eq!(params.get(PARAM_FORCE_LOGIN), Some(""));
        assert_eq!(params.get_non_empty(PARAM_FORCE_LOGIN), None);
    }

    #[test]
    fn accepts_bare_query_strings() {
        assert_eq!(parse_url_parameters("a=1&b=2").get("b"), Some("2"));
    }

    #[test]
    fn leading_int_follows_parse_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7abc"), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }
}
