//! A Playlist is an ordered collection of videos, either explicit
//! (hand-ordered ids) or "smart" (ordered by a service-side rule).

use serde::{Deserialize, Serialize};

use crate::enums::PlaylistType;
use crate::error::Result;
use crate::models::Video;
use crate::validation::{
    check_max_len, check_required, MAX_NAME_LEN, MAX_REFERENCE_ID_LEN, MAX_SHORT_DESCRIPTION_LEN,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Playlist {
    /// Assigned by the service when the playlist is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_description: Option<String>,
    #[serde(rename = "thumbnailURL", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Ids of the member videos, in playlist order for EXPLICIT playlists.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video_ids: Vec<i64>,
    /// Full member videos, populated on some read paths.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Video>,
    #[serde(rename = "playlistType", skip_serializing_if = "Option::is_none")]
    kind: Option<PlaylistType>,
}

impl Playlist {
    pub fn builder() -> PlaylistBuilder {
        PlaylistBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn kind(&self) -> Option<PlaylistType> {
        self.kind
    }

    /// At most 60 characters.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let value = name.into();
        check_max_len("Playlist", "name", &value, MAX_NAME_LEN)?;
        self.name = Some(value);
        Ok(())
    }

    /// At most 250 characters.
    pub fn set_short_description(&mut self, description: impl Into<String>) -> Result<()> {
        let value = description.into();
        check_max_len(
            "Playlist",
            "short_description",
            &value,
            MAX_SHORT_DESCRIPTION_LEN,
        )?;
        self.short_description = Some(value);
        Ok(())
    }

    /// At most 150 characters.
    pub fn set_reference_id(&mut self, reference_id: impl Into<String>) -> Result<()> {
        let value = reference_id.into();
        check_max_len("Playlist", "reference_id", &value, MAX_REFERENCE_ID_LEN)?;
        self.reference_id = Some(value);
        Ok(())
    }

    pub fn set_kind(&mut self, kind: PlaylistType) {
        self.kind = Some(kind);
    }

    /// Folds ids of attached [`videos`](Self::videos) into
    /// [`video_ids`](Self::video_ids), preserving order and skipping
    /// duplicates. Called before the playlist is submitted.
    pub fn collect_video_ids(&mut self) {
        for video in &self.videos {
            if let Some(id) = video.id {
                if !self.video_ids.contains(&id) {
                    self.video_ids.push(id);
                }
            }
        }
    }
}

/// Builds a new [`Playlist`]; `name` and the playlist type are required.
#[derive(Debug, Default)]
pub struct PlaylistBuilder {
    name: Option<String>,
    kind: Option<PlaylistType>,
    reference_id: Option<String>,
    short_description: Option<String>,
    video_ids: Vec<i64>,
}

impl PlaylistBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: PlaylistType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    pub fn short_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = Some(description.into());
        self
    }

    pub fn video_id(mut self, id: i64) -> Self {
        self.video_ids.push(id);
        self
    }

    pub fn build(self) -> Result<Playlist> {
        let mut playlist = Playlist::default();
        playlist.set_name(check_required("Playlist", "name", self.name.as_deref())?)?;
        playlist.kind = Some(
            self.kind
                .ok_or_else(|| crate::Error::validation("Playlist.type is required"))?,
        );
        if let Some(reference_id) = self.reference_id {
            playlist.set_reference_id(reference_id)?;
        }
        if let Some(description) = self.short_description {
            playlist.set_short_description(description)?;
        }
        playlist.video_ids = self.video_ids;
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_requires_name_and_type() {
        let err = Playlist::builder().name("Favorites").build().unwrap_err();
        assert_eq!(err.to_string(), "Playlist.type is required");

        let err = Playlist::builder()
            .kind(PlaylistType::Explicit)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Playlist.name is required");
    }

    #[test]
    fn test_name_limit() {
        let err = Playlist::builder()
            .name("N".repeat(61))
            .kind(PlaylistType::Explicit)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Playlist.name must be 60 characters or less"
        );
    }

    #[test]
    fn test_collect_video_ids_preserves_order_and_dedupes() {
        let mut playlist = Playlist::builder()
            .name("Favorites")
            .kind(PlaylistType::Explicit)
            .video_id(10)
            .build()
            .unwrap();
        for id in [20i64, 10, 30] {
            let mut video = Video::builder()
                .name("v")
                .short_description("d")
                .build()
                .unwrap();
            video.id = Some(id);
            playlist.videos.push(video);
        }
        playlist.collect_video_ids();
        assert_eq!(playlist.video_ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_wire_round_trip() {
        let raw = json!({
            "id": 24781161001i64,
            "referenceId": "pl-1",
            "name": "Favorites",
            "shortDescription": "the good ones",
            "thumbnailURL": "http://cdn.example.com/pl.jpg",
            "videoIds": [1, 2, 3],
            "playlistType": "OLDEST_TO_NEWEST"
        });
        let playlist: Playlist = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(playlist.name(), Some("Favorites"));
        assert_eq!(playlist.kind(), Some(PlaylistType::OldestToNewest));
        assert_eq!(playlist.video_ids, vec![1, 2, 3]);

        let back = serde_json::to_value(&playlist).unwrap();
        assert_eq!(back, raw);
    }
}
