//! Structural predicates: JSON, map properties, MIME types, JWT headers and
//! constrained URLs.

use crate::coerce::to_string;
use crate::patterns;
use crate::value::Value;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;

/// Any value that converts to a string holding well-formed JSON.
pub fn json(value: &Value) -> bool {
    to_string(value).is_ok_and(|s| serde_json::from_str::<serde_json::Value>(&s).is_ok())
}

/// Applies `validator` to the entry named `key` of a string-keyed map.
///
/// Fails for non-maps, maps with any non-string key, and missing keys.
pub fn property(object: &Value, key: &str, validator: impl Fn(&Value) -> bool) -> bool {
    let Some(Value::Map(entries)) = object.indirect() else {
        return false;
    };
    if entries.iter().any(|(k, _)| k.as_str().is_none()) {
        return false;
    }
    entries
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .is_some_and(|(_, v)| validator(v))
}

/// A `type/subtype` string, optionally restricted to `allowed`.
///
/// An empty `allowed` list accepts any well-formed MIME type.
pub fn mime(value: &Value, allowed: &[&str]) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let mut parts = s.split('/');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(kind), Some(subtype), None) if !kind.is_empty() && !subtype.is_empty()
    );
    well_formed && (allowed.is_empty() || allowed.contains(&s))
}

/// Options for [`jwt`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwtOptions {
    /// Required `alg` header value.
    pub algorithm: Option<String>,
}

/// A three-segment JWT whose header names a real algorithm.
///
/// Only the header is inspected. Signatures are not verified.
pub fn jwt(value: &Value, options: &JwtOptions) -> bool {
    let Some(token) = value.as_str() else {
        return false;
    };
    let segments: Vec<&str> = token.split('.').collect();
    let [header, _, _] = segments.as_slice() else {
        return false;
    };

    let Ok(bytes) = URL_SAFE_NO_PAD.decode(header.trim_end_matches('=')) else {
        return false;
    };
    let Ok(serde_json::Value::Object(header)) = serde_json::from_slice(&bytes) else {
        return false;
    };

    let Some(alg) = header.get("alg").and_then(serde_json::Value::as_str) else {
        return false;
    };
    if alg.eq_ignore_ascii_case("none") {
        return false;
    }
    if options.algorithm.as_deref().is_some_and(|want| want != alg) {
        return false;
    }
    match header.get("typ") {
        None => true,
        Some(typ) => typ.as_str() == Some("JWT"),
    }
}

/// Constraints for [`url_with`].
#[derive(Debug, Clone, Default)]
pub struct UrlOptions {
    /// Pattern the scheme must match.
    pub protocol: Option<Regex>,
    /// Pattern the host must match.
    pub hostname: Option<Regex>,
}

/// A URL passing the catalog check whose scheme and host satisfy `options`.
pub fn url_with(value: &Value, options: &UrlOptions) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    if !patterns::URL.is_match(s) {
        return false;
    }
    let Ok(parsed) = url::Url::parse(s) else {
        return false;
    };
    if let Some(protocol) = &options.protocol {
        if !protocol.is_match(parsed.scheme()) {
            return false;
        }
    }
    if let Some(hostname) = &options.hostname {
        if !parsed.host_str().is_some_and(|h| hostname.is_match(h)) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::from(v)
    }

    fn token(header: &str) -> String {
        format!("{}.e30.sig", URL_SAFE_NO_PAD.encode(header))
    }

    #[test]
    fn test_json() {
        assert!(json(&s(r#"{"a": [1, 2]}"#)));
        assert!(json(&Value::Int(42)));
        assert!(!json(&s("{broken")));
        assert!(!json(&Value::Nil));
    }

    #[test]
    fn test_property() {
        let obj = Value::Map(vec![
            (s("email"), s("ada@example.com")),
            (s("age"), Value::Int(36)),
        ]);
        assert!(property(&obj, "email", crate::validate::format::email));
        assert!(!property(&obj, "age", crate::validate::format::email));
        assert!(!property(&obj, "missing", |_| true));

        let int_keys = Value::Map(vec![(Value::Int(1), s("x"))]);
        assert!(!property(&int_keys, "1", |_| true));
        assert!(!property(&s("not a map"), "k", |_| true));
    }

    #[test]
    fn test_mime() {
        assert!(mime(&s("image/png"), &[]));
        assert!(mime(&s("image/png"), &["image/png", "image/jpeg"]));
        assert!(!mime(&s("image/gif"), &["image/png"]));
        assert!(!mime(&s("image/png/x"), &[]));
        assert!(!mime(&s("image/"), &[]));
    }

    #[test]
    fn test_jwt_header() {
        let hs = token(r#"{"alg":"HS256","typ":"JWT"}"#);
        assert!(jwt(&s(&hs), &JwtOptions::default()));
        assert!(jwt(
            &s(&hs),
            &JwtOptions {
                algorithm: Some("HS256".into())
            }
        ));
        assert!(!jwt(
            &s(&hs),
            &JwtOptions {
                algorithm: Some("RS256".into())
            }
        ));

        let none = token(r#"{"alg":"none"}"#);
        assert!(!jwt(&s(&none), &JwtOptions::default()));

        let wrong_typ = token(r#"{"alg":"HS256","typ":"JWS"}"#);
        assert!(!jwt(&s(&wrong_typ), &JwtOptions::default()));

        assert!(!jwt(&s("only.two"), &JwtOptions::default()));
        assert!(!jwt(&s("!!!.e30.sig"), &JwtOptions::default()));
    }

    #[test]
    fn test_url_with_options() {
        let opts = UrlOptions {
            protocol: Some(Regex::new("^https$").unwrap()),
            hostname: Some(Regex::new(r"\.example\.com$").unwrap()),
        };
        assert!(url_with(&s("https://api.example.com/v1"), &opts));
        assert!(!url_with(&s("http://api.example.com/v1"), &opts));
        assert!(!url_with(&s("https://example.org"), &opts));
        assert!(url_with(&s("ftp://files.test"), &UrlOptions::default()));
        assert!(!url_with(&s("not a url"), &UrlOptions::default()));
    }
}
