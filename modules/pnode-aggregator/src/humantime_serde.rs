//! Serde adapter for `std::time::Duration` in humantime form (`"15s"`, `"1500ms"`).
//!
//! Use with `#[serde(with = "crate::humantime_serde")]`.

use serde::{Deserialize, Deserializer, Serializer, de};
use std::time::Duration;

/// Deserializes a `Duration` from a humantime string.
///
/// # Errors
///
/// Fails when the value is not a string or is not a valid humantime duration.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    humantime::parse_duration(&raw)
        .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a duration"))
}

/// Serializes a `Duration` as a humantime string.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&humantime::format_duration(*d).to_string())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Foo {
        #[serde(with = "super")]
        time: Duration,
    }

    #[test]
    fn parses_and_formats() {
        let foo: Foo = serde_json::from_str(r#"{"time": "1500ms"}"#).unwrap();
        assert_eq!(foo.time, Duration::from_millis(1500));
        assert_eq!(
            serde_json::to_string(&foo).unwrap(),
            r#"{"time":"1s 500ms"}"#
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Foo>(r#"{"time": "soon"}"#).is_err());
    }
}
