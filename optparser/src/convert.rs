//! Conversion of stored option strings into typed values.
//!
//! Conversion is permissive by default, in the manner of `strtol`/`strtod`:
//! the longest numeric prefix is used and a string with no numeric prefix
//! converts to zero. [`FromOptValue::try_from_opt_value`] is the strict
//! alternative and rejects anything that is not entirely a valid value.

use std::path::PathBuf;

use crate::{Error, Result};

/// Trait for typed retrieval of option values.
pub trait FromOptValue: Sized {
    /// Permissive conversion. Never fails.
    fn from_opt_value(s: &str) -> Self;

    /// Strict conversion.
    fn try_from_opt_value(s: &str) -> Result<Self>;
}

fn bad_value<T>(s: &str) -> Error {
    Error::BadValue {
        value: s.to_string(),
        target: std::any::type_name::<T>(),
    }
}

// ============================================================================
// Numeric prefix scanning
// ============================================================================

/// Split `s` into the longest `[+-]?[0-9]+` prefix after leading whitespace.
/// Returns `None` if there are no digits.
fn integer_prefix(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        None
    } else {
        Some(&s[..end])
    }
}

/// Longest decimal floating point prefix after leading whitespace,
/// including `inf`, `infinity` and `nan` (any case).
fn float_prefix(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let rest = s[end..].to_ascii_lowercase();
    for word in ["infinity", "inf", "nan"] {
        if rest.starts_with(word) {
            return Some(&s[..end + word.len()]);
        }
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

fn saturating_i128(prefix: &str) -> i128 {
    prefix.parse::<i128>().unwrap_or_else(|_| {
        if prefix.starts_with('-') {
            i128::MIN
        } else {
            i128::MAX
        }
    })
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl FromOptValue for $t {
            fn from_opt_value(s: &str) -> Self {
                match integer_prefix(s) {
                    Some(prefix) => {
                        let wide = saturating_i128(prefix);
                        wide.clamp(<$t>::MIN as i128, <$t>::MAX as i128) as $t
                    }
                    None => 0,
                }
            }

            fn try_from_opt_value(s: &str) -> Result<Self> {
                s.trim().parse::<$t>().map_err(|_| bad_value::<$t>(s))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl FromOptValue for $t {
            fn from_opt_value(s: &str) -> Self {
                float_prefix(s)
                    .and_then(|prefix| prefix.parse::<$t>().ok())
                    .unwrap_or(0.0)
            }

            fn try_from_opt_value(s: &str) -> Result<Self> {
                s.trim().parse::<$t>().map_err(|_| bad_value::<$t>(s))
            }
        }
    )*};
}

impl_float!(f32, f64);

// ============================================================================
// Non-numeric types
// ============================================================================

impl FromOptValue for String {
    fn from_opt_value(s: &str) -> Self {
        s.to_string()
    }

    fn try_from_opt_value(s: &str) -> Result<Self> {
        Ok(s.to_string())
    }
}

impl FromOptValue for PathBuf {
    fn from_opt_value(s: &str) -> Self {
        PathBuf::from(s)
    }

    fn try_from_opt_value(s: &str) -> Result<Self> {
        Ok(PathBuf::from(s))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl FromOptValue for bool {
    fn from_opt_value(s: &str) -> Self {
        parse_bool(s).unwrap_or(false)
    }

    fn try_from_opt_value(s: &str) -> Result<Self> {
        match parse_bool(s) {
            Some(b) if !s.trim().is_empty() => Ok(b),
            _ => Err(bad_value::<bool>(s)),
        }
    }
}

impl FromOptValue for char {
    fn from_opt_value(s: &str) -> Self {
        s.chars().next().unwrap_or('\0')
    }

    fn try_from_opt_value(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(bad_value::<char>(s)),
        }
    }
}

/// Generic textual fallback for user types.
///
/// Implements [`FromOptValue`] for types that are `FromStr + Default`: the
/// permissive conversion yields `Default::default()` when parsing fails.
///
/// ```
/// use optparser::impl_from_opt_value_via_from_str;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl std::str::FromStr for Level {
///     type Err = ();
///     fn from_str(s: &str) -> Result<Self, ()> {
///         s.strip_prefix('L').and_then(|n| n.parse().ok()).map(Level).ok_or(())
///     }
/// }
///
/// impl_from_opt_value_via_from_str!(Level);
///
/// use optparser::FromOptValue;
/// assert_eq!(Level::from_opt_value("L3"), Level(3));
/// assert_eq!(Level::from_opt_value("x"), Level(0));
/// assert!(Level::try_from_opt_value("x").is_err());
/// ```
#[macro_export]
macro_rules! impl_from_opt_value_via_from_str {
    ($($t:ty),* $(,)?) => {$(
        impl $crate::FromOptValue for $t {
            fn from_opt_value(s: &str) -> Self {
                s.parse::<$t>().unwrap_or_default()
            }

            fn try_from_opt_value(s: &str) -> $crate::Result<Self> {
                s.parse::<$t>().map_err(|_| $crate::Error::BadValue {
                    value: s.to_string(),
                    target: std::any::type_name::<$t>(),
                })
            }
        }
    )*};
}
