//! Pattern catalog.
//!
//! Pre-compiled, anchored regular expressions for every named format the
//! rule vocabulary knows about, plus parameterized factories (see
//! [`factory`]) that memoize their results in a process-wide cache.
//!
//! Every named pattern is compiled lazily on first use and shared by all
//! threads afterwards. Patterns are written without look-around; the few
//! constraints that usually need it (hostname length, degenerate ISO
//! durations) are enforced by the validators in [`crate::validate`].
//!
//! ```rust
//! use gozod::patterns;
//!
//! assert!(patterns::EMAIL.is_match("jane.doe@example.com"));
//! assert!(!patterns::EMAIL.is_match("jane..doe@example.com"));
//! assert!(patterns::by_name("IPv4").is_some());
//! ```

pub mod factory;

pub use factory::{datetime, mac, string_regex, time, uuid_for_version, PatternError};

use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// Shared sources
// ============================================================================

/// One IPv4 octet, `0`..=`255`, without leading zeros.
const IPV4_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])";

/// One IPv6 hextet.
const HEXTET: &str = "[0-9a-fA-F]{1,4}";

/// `YYYY-MM-DD` with correct month lengths and leap days.
pub(crate) const DATE_SOURCE: &str = concat!(
    r"(?:[0-9]{2}(?:[2468][048]|[13579][26]|0[48])-02-29",
    r"|(?:[02468][048]|[13579][26])00-02-29",
    r"|[0-9]{4}-(?:(?:0[13578]|1[02])-(?:0[1-9]|[12][0-9]|3[01])",
    r"|(?:0[469]|11)-(?:0[1-9]|[12][0-9]|30)",
    r"|02-(?:0[1-9]|1[0-9]|2[0-8])))",
);

fn ipv4_source() -> String {
    format!(r"(?:{IPV4_OCTET}\.){{3}}{IPV4_OCTET}")
}

fn ipv6_source() -> String {
    let h = HEXTET;
    let v4 = ipv4_source();
    let alternatives = [
        format!("(?:{h}:){{7}}{h}"),
        format!("(?:{h}:){{1,7}}:"),
        format!("(?:{h}:){{1,6}}:{h}"),
        format!("(?:{h}:){{1,5}}(?::{h}){{1,2}}"),
        format!("(?:{h}:){{1,4}}(?::{h}){{1,3}}"),
        format!("(?:{h}:){{1,3}}(?::{h}){{1,4}}"),
        format!("(?:{h}:){{1,2}}(?::{h}){{1,5}}"),
        format!("{h}:(?::{h}){{1,6}}"),
        format!(":(?:(?::{h}){{1,7}}|:)"),
        format!("(?:{h}:){{6}}{v4}"),
        format!("::(?:[fF]{{4}}(?::0{{1,4}})?:)?{v4}"),
        format!("(?:{h}:){{1,5}}:{v4}"),
    ];
    format!("(?:{})", alternatives.join("|"))
}

fn uuid_source(version: &str) -> String {
    format!("[0-9a-fA-F]{{8}}-[0-9a-fA-F]{{4}}-{version}[0-9a-fA-F]{{3}}-[89abAB][0-9a-fA-F]{{3}}-[0-9a-fA-F]{{12}}")
}

fn duration_component(unit: char) -> String {
    format!(r"(?:[-+]?[0-9]+(?:[.,][0-9]+)?{unit})?")
}

/// Compiles a pattern that is part of the catalog.
///
/// Catalog sources are fixed at build time and covered by tests, so a
/// failure here is a defect in the catalog itself.
fn compile_static(name: &str, source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| panic!("catalog pattern {name} is invalid: {e}"))
}

// ============================================================================
// Named patterns
// ============================================================================

macro_rules! catalog {
    ($(
        $(#[$doc:meta])*
        $ident:ident = $name:literal => $source:expr;
    )*) => {
        $(
            $(#[$doc])*
            pub static $ident: LazyLock<Regex> = LazyLock::new(|| compile_static($name, &$source));
        )*

        /// Names of every pattern in the catalog, in declaration order.
        pub const NAMES: &[&str] = &[$($name),*];

        /// Looks up a catalog pattern by its canonical name (e.g. `"UUID4"`).
        pub fn by_name(name: &str) -> Option<&'static Regex> {
            match name {
                $($name => Some(&*$ident),)*
                _ => None,
            }
        }
    };
}

catalog! {
    // --- email ---------------------------------------------------------------

    /// Practical email: no leading, trailing or doubled dots in the local part,
    /// alphabetic TLD of at least two letters.
    EMAIL = "Email" => concat!(
        r"^[A-Za-z0-9_'+\-]+(?:\.[A-Za-z0-9_'+\-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    );
    /// The WHATWG HTML5 `input[type=email]` grammar.
    HTML5_EMAIL = "HTML5Email" => concat!(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    );
    /// RFC 5322 addr-spec, including quoted local parts and IPv4 literals.
    RFC5322_EMAIL = "RFC5322Email" => concat!(
        r#"^(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|".+")"#,
        r"@(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|(?:[a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,})$",
    );
    /// Permissive email allowing any non-space Unicode on both sides.
    UNICODE_EMAIL = "UnicodeEmail" => r#"^[^\s@"]{1,64}@[^\s@]{1,255}$"#;

    // --- web -----------------------------------------------------------------

    /// Any absolute URL with a scheme and an authority.
    URL = "URL" => r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+(?:[/?#][^\s]*)?$";
    /// `http`/`https` URL with an optional userinfo and port.
    HTTP_URL = "HTTPURL" => concat!(
        r"^https?://(?:[^\s:@/]+(?::[^\s@/]*)?@)?",
        r"(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*|\[[0-9a-fA-F:.]+\])",
        r"(?::[0-9]{1,5})?(?:[/?#][^\s]*)?$",
    );
    /// RFC 1123 hostname; labels of at most 63 characters, optional trailing dot.
    HOSTNAME = "Hostname" => concat!(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.?$",
    );
    /// Registrable domain: at least one label plus an alphabetic TLD.
    DOMAIN = "Domain" => r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$";

    // --- network -------------------------------------------------------------

    IPV4 = "IPv4" => format!("^{}$", ipv4_source());
    IPV6 = "IPv6" => format!("^{}$", ipv6_source());
    CIDRV4 = "CIDRv4" => format!("^{}/(?:3[0-2]|[12]?[0-9])$", ipv4_source());
    CIDRV6 = "CIDRv6" => format!("^{}/(?:12[0-8]|1[01][0-9]|[1-9]?[0-9])$", ipv6_source());
    /// Either address family; composed from the IPv4 and IPv6 sources.
    IP = "IP" => format!("^(?:{}|{})$", ipv4_source(), ipv6_source());

    // --- identifiers ---------------------------------------------------------

    /// RFC 9562 UUID of any version 1 through 8, or the nil UUID.
    UUID = "UUID" => format!(
        "^(?:{}|00000000-0000-0000-0000-000000000000)$",
        uuid_source("[1-8]")
    );
    UUID4 = "UUID4" => format!("^{}$", uuid_source("4"));
    UUID6 = "UUID6" => format!("^{}$", uuid_source("6"));
    UUID7 = "UUID7" => format!("^{}$", uuid_source("7"));
    /// Microsoft GUID: UUID layout without version or variant constraints.
    GUID = "GUID" => r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
    CUID = "CUID" => r"^[cC][^\s-]{8,}$";
    CUID2 = "CUID2" => r"^[0-9a-z]+$";
    /// Crockford base32, 26 characters.
    ULID = "ULID" => r"^[0-9A-HJKMNP-TV-Za-hjkmnp-tv-z]{26}$";
    XID = "XID" => r"^[0-9a-vA-V]{20}$";
    KSUID = "KSUID" => r"^[A-Za-z0-9]{27}$";
    NANOID = "NanoID" => r"^[a-zA-Z0-9_-]{21}$";

    // --- encodings and digests -----------------------------------------------

    /// Standard padded base64; the empty string is valid.
    BASE64 = "Base64" => r"^(?:[0-9a-zA-Z+/]{4})*(?:[0-9a-zA-Z+/]{2}==|[0-9a-zA-Z+/]{3}=)?$";
    /// URL-safe base64 without padding.
    BASE64URL = "Base64URL" => r"^[A-Za-z0-9_-]*$";
    HEX = "Hex" => r"^[0-9a-fA-F]*$";
    MD5_HEX = "MD5Hex" => r"^[0-9a-fA-F]{32}$";
    SHA1_HEX = "SHA1Hex" => r"^[0-9a-fA-F]{40}$";
    SHA256_HEX = "SHA256Hex" => r"^[0-9a-fA-F]{64}$";
    SHA384_HEX = "SHA384Hex" => r"^[0-9a-fA-F]{96}$";
    SHA512_HEX = "SHA512Hex" => r"^[0-9a-fA-F]{128}$";

    // --- misc formats --------------------------------------------------------

    /// ITU-T E.164 phone number: `+` followed by 7 to 15 digits.
    E164 = "E164" => r"^\+[0-9]{6,14}[0-9]$";
    EMOJI = "Emoji" => r"^(?:\p{Extended_Pictographic}|\p{Emoji_Component})+$";

    // --- ISO 8601 ------------------------------------------------------------

    DATE = "Date" => format!("^{DATE_SOURCE}$");
    /// `HH:MM` with optional seconds and any number of fractional digits.
    DEFAULT_TIME = "DefaultTime" => format!("^{}$", factory::time_source(None));
    /// `YYYY-MM-DDTHH:MM[:SS[.f+]]Z`.
    DEFAULT_DATETIME = "DefaultDatetime" => factory::datetime_source(None, false, false);
    /// ISO 8601 duration shape. Degenerate forms (`P`, `PT`, trailing `T`)
    /// match here and are rejected by the duration validator.
    DURATION = "Duration" => concat!(
        r"^P(?:[0-9]+W|(?:[0-9]+Y)?(?:[0-9]+M)?(?:[0-9]+D)?",
        r"(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+(?:[.,][0-9]+)?S)?)?)$",
    );
    /// Duration allowing signs and fractions on every component.
    EXTENDED_DURATION = "ExtendedDuration" => format!(
        "^[-+]?P{}{}{}{}(?:T{}{}{})?$",
        duration_component('Y'),
        duration_component('M'),
        duration_component('W'),
        duration_component('D'),
        duration_component('H'),
        duration_component('M'),
        duration_component('S'),
    );

    // --- primitives ----------------------------------------------------------

    STRING = "String" => r"^[\s\S]*$";
    INTEGER = "Integer" => r"^-?[0-9]+$";
    BIGINT = "Bigint" => r"^-?[0-9]+n?$";
    NUMBER = "Number" => r"^-?[0-9]+(?:\.[0-9]+)?$";
    /// Case-insensitive `true` / `false`.
    BOOLEAN = "Boolean" => r"^(?i:true|false)$";
    NULL = "Null" => r"^(?i:null)$";
    UNDEFINED = "Undefined" => r"^(?i:undefined)$";
    LOWERCASE = "Lowercase" => r"^[^A-Z]*$";
    UPPERCASE = "Uppercase" => r"^[^a-z]*$";
    /// Shape check for a JSON document: an object, array, string, number or
    /// literal, surrounded by optional whitespace.
    JSON_STRING = "JSONString" => concat!(
        r#"^\s*(?:\{[\s\S]*\}|\[[\s\S]*\]|"(?:[^"\\]|\\.)*""#,
        r"|-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?|true|false|null)\s*$",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles_and_is_anchored() {
        for name in NAMES {
            let re = by_name(name).unwrap();
            assert!(re.as_str().starts_with('^'), "{name} is not anchored at start");
            assert!(re.as_str().ends_with('$'), "{name} is not anchored at end");
        }
    }

    #[test]
    fn test_email_variants() {
        assert!(EMAIL.is_match("a.b+tag@sub.example.org"));
        assert!(!EMAIL.is_match(".a@example.org"));
        assert!(!EMAIL.is_match("a.@example.org"));
        assert!(!EMAIL.is_match("a..b@example.org"));
        assert!(!EMAIL.is_match("a@example.c"));
        assert!(HTML5_EMAIL.is_match("user@localhost"));
        assert!(RFC5322_EMAIL.is_match("\"john doe\"@example.com"));
        assert!(RFC5322_EMAIL.is_match("x@[192.168.0.1]"));
        assert!(UNICODE_EMAIL.is_match("jörg@bücher.de"));
    }

    #[test]
    fn test_ipv6_forms() {
        for ok in [
            "::",
            "::1",
            "fe80::",
            "2001:db8::8a2e:370:7334",
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334",
            "::ffff:192.168.1.1",
        ] {
            assert!(IPV6.is_match(ok), "{ok} should match");
        }
        for bad in ["2001:db8:::1", "12345::", "1:2:3:4:5:6:7:8:9", "192.168.1.1"] {
            assert!(!IPV6.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_ipv4_rejects_out_of_range_octets() {
        assert!(IPV4.is_match("255.255.255.255"));
        assert!(!IPV4.is_match("256.1.1.1"));
        assert!(!IPV4.is_match("01.1.1.1"));
        assert!(IP.is_match("10.0.0.1"));
        assert!(IP.is_match("::1"));
    }

    #[test]
    fn test_cidr_prefix_bounds() {
        assert!(CIDRV4.is_match("10.0.0.0/8"));
        assert!(!CIDRV4.is_match("10.0.0.0/33"));
        assert!(CIDRV6.is_match("fe80::/64"));
        assert!(!CIDRV6.is_match("fe80::/129"));
    }

    #[test]
    fn test_uuid_versions() {
        let v4 = "123e4567-e89b-42d3-a456-426614174000";
        let v7 = "01890a5d-ac96-774b-bcce-b302099a8057";
        assert!(UUID.is_match(v4));
        assert!(UUID.is_match(v7));
        assert!(UUID.is_match("00000000-0000-0000-0000-000000000000"));
        assert!(UUID4.is_match(v4));
        assert!(!UUID4.is_match(v7));
        assert!(UUID7.is_match(v7));
        assert!(!UUID.is_match("123e4567-e89b-02d3-a456-426614174000"));
        assert!(GUID.is_match("123e4567-e89b-02d3-0456-426614174000"));
    }

    #[test]
    fn test_date_leap_years() {
        assert!(DATE.is_match("2024-02-29"));
        assert!(DATE.is_match("2000-02-29"));
        assert!(!DATE.is_match("1900-02-29"));
        assert!(!DATE.is_match("2023-02-29"));
        assert!(!DATE.is_match("2023-04-31"));
        assert!(DATE.is_match("2023-12-31"));
    }

    #[test]
    fn test_default_time_and_datetime() {
        assert!(DEFAULT_TIME.is_match("09:30"));
        assert!(DEFAULT_TIME.is_match("23:59:59.123456"));
        assert!(!DEFAULT_TIME.is_match("24:00"));
        assert!(DEFAULT_DATETIME.is_match("2024-01-15T09:30:00Z"));
        assert!(!DEFAULT_DATETIME.is_match("2024-01-15T09:30:00+02:00"));
        assert!(!DEFAULT_DATETIME.is_match("2024-01-15T09:30:00"));
    }

    #[test]
    fn test_duration_shapes() {
        assert!(DURATION.is_match("P1Y2M3DT4H5M6.5S"));
        assert!(DURATION.is_match("P3W"));
        assert!(!DURATION.is_match("P1W2D"));
        assert!(EXTENDED_DURATION.is_match("-P1.5Y"));
        assert!(EXTENDED_DURATION.is_match("P-2DT+3H"));
    }

    #[test]
    fn test_primitives() {
        assert!(BOOLEAN.is_match("TRUE"));
        assert!(!BOOLEAN.is_match("yes"));
        assert!(BIGINT.is_match("-12345678901234567890n"));
        assert!(NUMBER.is_match("-3.25"));
        assert!(!NUMBER.is_match("3."));
        assert!(LOWERCASE.is_match("abc-123"));
        assert!(!UPPERCASE.is_match("ABc"));
        assert!(JSON_STRING.is_match(r#" {"a": 1} "#));
        assert!(JSON_STRING.is_match(r#""quoted \" string""#));
        assert!(!JSON_STRING.is_match("nope"));
    }

    #[test]
    fn test_emoji() {
        assert!(EMOJI.is_match("😀🎉"));
        assert!(!EMOJI.is_match("hello"));
    }
}
