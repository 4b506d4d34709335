//! scalar resolution and values
//!
//! Untagged plain scalars are resolved with the YAML 1.1 rules:
//! - null: `~`, `null`, `Null`, `NULL` or nothing at all
//! - bool: `yes/no`, `true/false`, `on/off` (lower, capitalized or upper case)
//! - int: binary (`0b`), octal (leading `0`), decimal, hex (`0x`) and base 60 (`1:30`), `_` is ignored
//! - float: `1.5`, `.5`, `1e+3` style exponents after a dot, base 60, `.inf`, `.nan`
//! - timestamp: `2001-12-14`, `2001-12-14t21:59:43.10-05:00`, `2001-12-14 21:59:43.10 -5`
//!
//! Everything else is a `!!str`.
//!
//! The value functions turn scalar text into comparable values. They return [None] when the
//! text does not fit the tag (an explicitly tagged `!!int foo`).
use crate::node::Tag;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static BOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:yes|Yes|YES|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF)$")
        .unwrap()
});

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?(?:[0-9][0-9_]*)\.[0-9_]*(?:[eE][-+][0-9]+)?",
        r"|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?",
        r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
        r"|[-+]?\.(?:inf|Inf|INF)",
        r"|\.(?:nan|NaN|NAN))$",
    ))
    .unwrap()
});

static INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?0b[0-1_]+",
        r"|[-+]?0[0-7_]+",
        r"|[-+]?(?:0|[1-9][0-9_]*)",
        r"|[-+]?0x[0-9a-fA-F_]+",
        r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
    ))
    .unwrap()
});

static NULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:~|null|Null|NULL|)$").unwrap());

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<year>[0-9][0-9][0-9][0-9])-(?P<month>[0-9][0-9]?)-(?P<day>[0-9][0-9]?)",
        r"(?:(?:[Tt]|[ \t]+)(?P<hour>[0-9][0-9]?):(?P<minute>[0-9][0-9]):(?P<second>[0-9][0-9])",
        r"(?:\.(?P<fraction>[0-9]*))?",
        r"(?:[ \t]*(?P<tz>Z|(?P<tz_sign>[-+])(?P<tz_hour>[0-9][0-9]?)(?::(?P<tz_minute>[0-9][0-9]))?))?)?$",
    ))
    .unwrap()
});

/// Resolve the tag of an untagged plain scalar
pub fn resolve_plain(text: &str) -> Tag {
    if BOOL.is_match(text) {
        Tag::Bool
    } else if FLOAT.is_match(text) {
        Tag::Float
    } else if INT.is_match(text) {
        Tag::Int
    } else if NULL.is_match(text) {
        Tag::Null
    } else if is_timestamp(text) {
        Tag::Timestamp
    } else {
        Tag::Str
    }
}

fn is_timestamp(text: &str) -> bool {
    // a date alone must use two-digit months and days, a full timestamp may not
    TIMESTAMP.captures(text).is_some_and(|caps| {
        caps.name("hour").is_some()
            || (caps["month"].len() == 2 && caps["day"].len() == 2)
    })
}

pub fn bool_value(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" => Some(true),
        "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

pub fn int_value(text: &str) -> Option<i128> {
    let cleaned = text.replace('_', "");
    let (negative, digits) = split_sign(&cleaned);

    let magnitude = if digits == "0" {
        0
    } else if let Some(binary) = digits.strip_prefix("0b") {
        i128::from_str_radix(binary, 2).ok()?
    } else if let Some(hex) = digits.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()?
    } else if digits.contains(':') {
        let mut value: i128 = 0;
        for part in digits.split(':') {
            value = value.checked_mul(60)?.checked_add(part.parse::<i128>().ok()?)?;
        }
        value
    } else if let Some(octal) = digits.strip_prefix('0') {
        i128::from_str_radix(octal, 8).ok()?
    } else {
        digits.parse::<i128>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

pub fn float_value(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "").to_ascii_lowercase();
    let (negative, digits) = split_sign(&cleaned);

    let magnitude = if digits == ".inf" {
        f64::INFINITY
    } else if digits == ".nan" {
        f64::NAN
    } else if digits.contains(':') {
        let mut value = 0.0;
        for part in digits.split(':') {
            value = value * 60.0 + part.parse::<f64>().ok()?;
        }
        value
    } else {
        digits.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a timestamp into UTC; values without a timezone are taken as UTC
pub fn timestamp_value(text: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP.captures(text.trim())?;
    let number = |name: &str| -> Option<u32> { caps.name(name)?.as_str().parse().ok() };

    let date = NaiveDate::from_ymd_opt(caps["year"].parse().ok()?, number("month")?, number("day")?)?;

    if caps.name("hour").is_none() {
        return date.and_hms_opt(0, 0, 0);
    }

    let nanos = match caps.name("fraction") {
        Some(fraction) if !fraction.as_str().is_empty() => {
            let mut digits = fraction.as_str().chars().take(9).collect::<String>();
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.parse().ok()?
        }
        _ => 0,
    };

    let local = date.and_hms_nano_opt(number("hour")?, number("minute")?, number("second")?, nanos)?;

    let offset_minutes = match caps.name("tz_sign") {
        Some(sign) => {
            let minutes = i64::from(number("tz_hour")?) * 60 + i64::from(number("tz_minute").unwrap_or(0));
            if sign.as_str() == "-" {
                -minutes
            } else {
                minutes
            }
        }
        None => 0,
    };

    local.checked_sub_signed(chrono::Duration::minutes(offset_minutes))
}

/// Base64 payload of a `!!binary` scalar without line breaks and padding whitespace
pub fn binary_value(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}
