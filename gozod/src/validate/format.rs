//! Format predicates backed by the pattern catalog.

use crate::patterns::{self, mac as mac_pattern, uuid_for_version};
use crate::value::Value;
use regex::Regex;
use std::net::IpAddr;

/// Longest hostname accepted, in bytes.
const MAX_HOSTNAME_LEN: usize = 253;

fn matches(value: &Value, pattern: &Regex) -> bool {
    value.as_str().is_some_and(|s| pattern.is_match(s))
}

macro_rules! catalog_predicates {
    ($($(#[$doc:meta])* $fn_name:ident => $pattern:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(value: &Value) -> bool {
                matches(value, &patterns::$pattern)
            }
        )*
    };
}

catalog_predicates! {
    email => EMAIL;
    url => URL;
    uuid => UUID;
    guid => GUID;
    cuid => CUID;
    cuid2 => CUID2;
    nanoid => NANOID;
    ulid => ULID;
    xid => XID;
    ksuid => KSUID;
    ipv4 => IPV4;
    ipv6 => IPV6;
    /// Padded standard base64.
    base64 => BASE64;
    /// Unpadded URL-safe base64.
    base64url => BASE64URL;
    hex => HEX;
    md5hex => MD5_HEX;
    sha1hex => SHA1_HEX;
    sha256hex => SHA256_HEX;
    sha384hex => SHA384_HEX;
    sha512hex => SHA512_HEX;
    e164 => E164;
    emoji => EMOJI;
}

/// RFC 1123 hostname of at most 253 bytes.
pub fn hostname(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.len() <= MAX_HOSTNAME_LEN && patterns::HOSTNAME.is_match(s))
}

/// UUID of one specific version.
pub fn uuid_version(value: &Value, version: u8) -> bool {
    matches(value, &uuid_for_version(version))
}

/// CIDR block for the given IP version: `4`, `6`, or `0` for either.
///
/// The address must parse and the prefix length must fit the detected
/// family.
pub fn cidr(value: &Value, version: u8) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let mut parts = s.split('/');
    let (Some(addr), Some(prefix), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr {
        IpAddr::V4(_) => matches!(version, 0 | 4) && prefix <= 32,
        IpAddr::V6(_) => matches!(version, 0 | 6) && prefix <= 128,
    }
}

pub fn cidrv4(value: &Value) -> bool {
    cidr(value, 4)
}

pub fn cidrv6(value: &Value) -> bool {
    cidr(value, 6)
}

/// Options for [`mac`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacOptions {
    /// Octet delimiter; empty means `:`.
    pub delimiter: String,
}

impl Default for MacOptions {
    fn default() -> Self {
        Self {
            delimiter: ":".to_string(),
        }
    }
}

/// MAC-48 address with the configured delimiter.
pub fn mac(value: &Value, options: &MacOptions) -> bool {
    mac_pattern(&options.delimiter).is_ok_and(|re| matches(value, &re))
}
