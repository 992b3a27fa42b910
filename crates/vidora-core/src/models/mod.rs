//! Domain entities mirroring remote Media API resources.
//!
//! Wire shape rules shared by every entity:
//! - keys are camelCase,
//! - unset (`None`) fields are dropped on serialize, so a field explicitly
//!   cleared is indistinguishable from one never set,
//! - dates travel as epoch milliseconds and the service has been seen
//!   emitting them as either integers or floats.

pub mod cue_point;
pub mod image;
pub mod playlist;
pub mod rendition;
pub mod video;

pub use cue_point::{CuePoint, CuePointType};
pub use image::Image;
pub use playlist::{Playlist, PlaylistBuilder};
pub use rendition::{Rendition, RenditionBuilder};
pub use video::{Asset, AssetOptions, CustomMetadata, Video, VideoBuilder};

/// Serde codec for optional epoch-millisecond timestamps.
///
/// Tolerates integer and float inputs on deserialize; always writes an
/// integer. Combine with `skip_serializing_if = "Option::is_none"` so a
/// `None` is dropped rather than written as `null`.
pub(crate) mod epoch_millis {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_i64(dt.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(
            with = "super::epoch_millis",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        when: Option<chrono::DateTime<Utc>>,
    }

    #[test]
    fn test_millis_round_trip() {
        let when = Utc.timestamp_millis_opt(1_272_312_315_000).single();
        let json = serde_json::to_string(&Stamped { when }).unwrap();
        assert_eq!(json, r#"{"when":1272312315000}"#);
        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back.when, when);
    }

    #[test]
    fn test_float_input_accepted() {
        let back: Stamped = serde_json::from_str(r#"{"when":1272312315000.0}"#).unwrap();
        assert_eq!(
            back.when,
            Utc.timestamp_millis_opt(1_272_312_315_000).single()
        );
    }

    #[test]
    fn test_none_is_dropped_not_null() {
        let json = serde_json::to_string(&Stamped { when: None }).unwrap();
        assert_eq!(json, "{}");
        let back: Stamped = serde_json::from_str("{}").unwrap();
        assert!(back.when.is_none());
    }
}
