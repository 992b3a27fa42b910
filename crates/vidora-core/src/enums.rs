//! Enumerated vocabularies of the Vidora Media API.
//!
//! Every enum here mirrors a fixed set of string constants documented by the
//! remote service. They serialize to their SCREAMING_SNAKE_CASE wire form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Field by which list results are sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    /// Date the title was published.
    PublishDate,
    /// Date the title was created.
    #[default]
    CreationDate,
    /// Date the title was last modified.
    ModifiedDate,
    /// Number of times the title has been viewed.
    PlaysTotal,
    /// Number of views in the past 7 days, excluding today.
    PlaysTrailingWeek,
}

/// Direction of a sorted listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Lifecycle state of a video.
///
/// Only `Active` and `Inactive` may be assigned by clients; `Deleted` is
/// reported by the service and cannot be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemState {
    Active,
    Inactive,
    Deleted,
}

/// Advertising model for a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Economics {
    Free,
    AdSupported,
}

/// Codec of a rendition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoCodec {
    Sorenson,
    On2,
    H264,
}

/// Kind of image attached to a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Thumbnail,
    VideoStill,
}

/// Ordering discipline of a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaylistType {
    /// Videos play in the order given by `video_ids`.
    Explicit,
    OldestToNewest,
    NewestToOldest,
    Alphabetical,
    PlaysTotal,
    PlaysTrailingWeek,
}

/// Kind of file delivered through the FTP batch interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    VideoFull,
    Thumbnail,
    VideoStill,
}

/// Ingest progress of an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Uploading,
    Processing,
    Complete,
    Error,
}

/// Filter values accepted by the modified-videos listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicFilter {
    Playable,
    Unscheduled,
    Inactive,
    Deleted,
}

/// Value type of a custom metadata field in the FTP batch manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomMetaType {
    String,
    Enum,
}

macro_rules! display_as_wire {
    ($($ty:ty),+) => {
        $(impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                // The wire form is the serde rename, reuse it.
                let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                f.write_str(s.trim_matches('"'))
            }
        })+
    };
}

display_as_wire!(
    SortBy,
    SortOrder,
    ItemState,
    Economics,
    VideoCodec,
    ImageType,
    PlaylistType,
    AssetType,
    UploadStatus,
    PublicFilter,
    CustomMetaType
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_screaming_snake() {
        assert_eq!(SortBy::PlaysTrailingWeek.to_string(), "PLAYS_TRAILING_WEEK");
        assert_eq!(SortOrder::Desc.to_string(), "DESC");
        assert_eq!(Economics::AdSupported.to_string(), "AD_SUPPORTED");
        assert_eq!(AssetType::VideoFull.to_string(), "VIDEO_FULL");
        assert_eq!(CustomMetaType::Enum.to_string(), "enum");
    }

    #[test]
    fn test_defaults_match_service_defaults() {
        assert_eq!(SortBy::default(), SortBy::CreationDate);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = serde_json::to_string(&ItemState::Inactive).unwrap();
        assert_eq!(json, "\"INACTIVE\"");
        let back: ItemState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemState::Inactive);
    }
}
