//! The Video entity: metadata plus asset information for one title.
//!
//! Server-assigned fields (`id`, `account_id`, the dates, play counts, the
//! still/thumbnail URLs) are populated on deserialize and dropped from the
//! wire when unset. Client-writable fields with documented limits are kept
//! private and validated in [`VideoBuilder::build`] and the `set_*`
//! mutators, so a violation surfaces before any network call.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use super::epoch_millis;
use crate::enums::{AssetType, CustomMetaType, Economics, ItemState};
use crate::error::{Error, Result};
use crate::models::{CuePoint, Rendition};
use crate::validation::{
    check_max_len, check_required, MAX_LONG_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_REFERENCE_ID_LEN,
    MAX_SHORT_DESCRIPTION_LEN,
};

/// A named custom metadata value, `string` or `enum` typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMetadata {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: CustomMetaType,
}

/// A local file staged for FTP batch ingest, with the size and MD5 digest
/// recorded at attach time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Local path of the file to upload.
    pub filename: String,
    /// Reference id used to tie the manifest entry to the uploaded file.
    pub refid: String,
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub description: String,
    pub size: u64,
    /// Hex MD5 digest of the file contents.
    pub hash_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
}

impl Asset {
    /// Base name used for the `STOR` command and the manifest entry.
    pub fn basename(&self) -> &str {
        Path::new(&self.filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.filename)
    }
}

/// Optional per-asset attributes for [`Video::add_asset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetOptions {
    pub encoding_rate: Option<u64>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    /// Assigned by the service when the video is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    /// Requires a privileged read token.
    #[serde(rename = "FLVURL", skip_serializing_if = "Option::is_none")]
    pub flv_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renditions: Vec<Rendition>,
    /// The single rendition representing the full-length video file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_full_length: Option<Rendition>,
    #[serde(with = "epoch_millis", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(with = "epoch_millis", skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(with = "epoch_millis", skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_state: Option<ItemState>,
    /// First date the video may be played.
    #[serde(with = "epoch_millis", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Last date the video may be played.
    #[serde(with = "epoch_millis", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "linkURL", skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "videoStillURL", skip_serializing_if = "Option::is_none")]
    pub video_still_url: Option<String>,
    #[serde(rename = "thumbnailURL", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Length of the video in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economics: Option<Economics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_filtered: Option<bool>,
    /// ISO-3166 two-letter codes, lowercase.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub geo_filtered_countries: Vec<String>,
    /// If true the listed countries are excluded rather than allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_filtered_exclude: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cue_points: Vec<CuePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plays_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plays_trailing_week: Option<u64>,
    #[serde(
        rename = "customFields",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    custom_fields: BTreeMap<String, String>,
    // Carries the metadata kind for the FTP manifest; `custom_fields` is
    // the flattened wire view used by the JSON-RPC API.
    #[serde(skip)]
    custom_metadata: Vec<CustomMetadata>,
    /// Files staged for FTP batch ingest. Never present on the JSON wire
    /// for HTTP-created videos.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
}

impl Video {
    pub fn builder() -> VideoBuilder {
        VideoBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }

    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn item_state(&self) -> Option<ItemState> {
        self.item_state
    }

    /// The title shown in the media library. At most 60 characters.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let value = name.into();
        check_max_len("Video", "name", &value, MAX_NAME_LEN)?;
        self.name = Some(value);
        Ok(())
    }

    /// At most 250 characters.
    pub fn set_short_description(&mut self, description: impl Into<String>) -> Result<()> {
        let value = description.into();
        check_max_len(
            "Video",
            "short_description",
            &value,
            MAX_SHORT_DESCRIPTION_LEN,
        )?;
        self.short_description = Some(value);
        Ok(())
    }

    /// At most 5000 characters.
    pub fn set_long_description(&mut self, description: impl Into<String>) -> Result<()> {
        let value = description.into();
        check_max_len("Video", "long_description", &value, MAX_LONG_DESCRIPTION_LEN)?;
        self.long_description = Some(value);
        Ok(())
    }

    /// A caller-chosen id usable as a foreign key. At most 150 characters.
    pub fn set_reference_id(&mut self, reference_id: impl Into<String>) -> Result<()> {
        let value = reference_id.into();
        check_max_len("Video", "reference_id", &value, MAX_REFERENCE_ID_LEN)?;
        self.reference_id = Some(value);
        Ok(())
    }

    /// Clients may set ACTIVE or INACTIVE; a video cannot be deleted by
    /// assigning DELETED.
    pub fn set_item_state(&mut self, state: ItemState) -> Result<()> {
        if state == ItemState::Deleted {
            return Err(Error::validation(
                "Video.item_state must be either ACTIVE or INACTIVE",
            ));
        }
        self.item_state = Some(state);
        Ok(())
    }

    pub fn custom_fields(&self) -> &BTreeMap<String, String> {
        &self.custom_fields
    }

    pub fn custom_metadata(&self) -> &[CustomMetadata] {
        &self.custom_metadata
    }

    /// Records a custom metadata value, visible both as a `customFields`
    /// entry on the JSON wire and as a typed manifest element on the FTP
    /// path.
    pub fn add_custom_metadata(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        kind: CustomMetaType,
    ) {
        let name = name.into();
        let value = value.into();
        self.custom_fields.insert(name.clone(), value.clone());
        self.custom_metadata.push(CustomMetadata { name, value, kind });
    }

    /// Stages a local file for FTP batch ingest, computing its size and MD5
    /// digest now so a changed file is caught by the service checksum.
    pub fn add_asset(
        &mut self,
        filename: impl Into<String>,
        kind: AssetType,
        description: impl Into<String>,
        options: AssetOptions,
    ) -> Result<()> {
        let filename = filename.into();
        let bytes = std::fs::read(&filename)
            .map_err(|e| Error::validation(format!("cannot read asset '{filename}': {e}")))?;
        let mut hasher = Md5::new();
        hasher.update(&bytes);
        let asset = Asset {
            refid: format!("{}-{}", self.reference_id.as_deref().unwrap_or("asset"), self.assets.len()),
            kind,
            description: description.into(),
            size: bytes.len() as u64,
            hash_code: hex::encode(hasher.finalize()),
            encoding_rate: options.encoding_rate,
            frame_width: options.frame_width,
            frame_height: options.frame_height,
            filename,
        };
        self.assets.push(asset);
        Ok(())
    }
}

/// Builds a new [`Video`] for submission. `name` and `short_description`
/// are required by the service.
#[derive(Debug, Default)]
pub struct VideoBuilder {
    name: Option<String>,
    short_description: Option<String>,
    long_description: Option<String>,
    reference_id: Option<String>,
    economics: Option<Economics>,
    tags: Vec<String>,
    renditions: Vec<Rendition>,
}

impl VideoBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn short_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = Some(description.into());
        self
    }

    pub fn long_description(mut self, description: impl Into<String>) -> Self {
        self.long_description = Some(description.into());
        self
    }

    pub fn reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    pub fn economics(mut self, economics: Economics) -> Self {
        self.economics = Some(economics);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn rendition(mut self, rendition: Rendition) -> Self {
        self.renditions.push(rendition);
        self
    }

    pub fn build(self) -> Result<Video> {
        let mut video = Video::default();
        video.set_name(check_required("Video", "name", self.name.as_deref())?)?;
        video.set_short_description(check_required(
            "Video",
            "short_description",
            self.short_description.as_deref(),
        )?)?;
        if let Some(long) = self.long_description {
            video.set_long_description(long)?;
        }
        if let Some(reference_id) = self.reference_id {
            video.set_reference_id(reference_id)?;
        }
        video.economics = self.economics;
        video.tags = self.tags;
        video.renditions = self.renditions;
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_builder() -> VideoBuilder {
        Video::builder()
            .name("My Movie")
            .short_description("This is my movie.")
    }

    #[test]
    fn test_builder_requires_name_and_description() {
        let err = Video::builder().name("My Movie").build().unwrap_err();
        assert_eq!(err.to_string(), "Video.short_description is required");

        let err = Video::builder()
            .short_description("This is my movie.")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Video.name is required");
    }

    #[test]
    fn test_name_limit_enforced_before_any_network_call() {
        let err = Video::builder()
            .name("N".repeat(61))
            .short_description("ok desc")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Video.name must be 60 characters or less");
    }

    #[test]
    fn test_long_description_limit() {
        let mut video = base_builder().build().unwrap();
        let err = video.set_long_description("x".repeat(5001)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Video.long_description must be 5000 characters or less"
        );
    }

    #[test]
    fn test_reference_id_limit() {
        let mut video = base_builder().build().unwrap();
        assert!(video.set_reference_id("r".repeat(150)).is_ok());
        assert!(video.set_reference_id("r".repeat(151)).is_err());
    }

    #[test]
    fn test_item_state_cannot_be_set_to_deleted() {
        let mut video = base_builder().build().unwrap();
        assert!(video.set_item_state(ItemState::Inactive).is_ok());
        let err = video.set_item_state(ItemState::Deleted).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Video.item_state must be either ACTIVE or INACTIVE"
        );
        // The previous assignment is untouched.
        assert_eq!(video.item_state(), Some(ItemState::Inactive));
    }

    #[test]
    fn test_wire_shape_drops_unset_fields() {
        let video = base_builder().tag("unittest").build().unwrap();
        let value = serde_json::to_value(&video).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["name"], "My Movie");
        assert_eq!(obj["shortDescription"], "This is my movie.");
        assert_eq!(obj["tags"], json!(["unittest"]));
    }

    #[test]
    fn test_deserialize_service_payload() {
        let raw = json!({
            "creationDate": 1272312315000.0,
            "economics": "FREE",
            "id": 11449913001i64,
            "lastModifiedDate": 1272312315000.0,
            "length": 55,
            "linkText": "the link text",
            "linkURL": "the link url",
            "longDescription": "A really long description.",
            "name": "My Video",
            "playsTotal": 100,
            "playsTrailingWeek": 40,
            "publishedDate": 1272312315000.0,
            "referenceId": "SN-47314834",
            "shortDescription": "this is a short description",
            "tags": ["tag1", "tag2", "tag3"],
            "thumbnailURL": "another_something_url",
            "videoStillURL": "something_url"
        });
        let video: Video = serde_json::from_value(raw).unwrap();
        assert_eq!(video.id, Some(11449913001));
        assert_eq!(video.name(), Some("My Video"));
        assert_eq!(video.reference_id(), Some("SN-47314834"));
        assert_eq!(video.tags, vec!["tag1", "tag2", "tag3"]);
        assert_eq!(video.plays_total, Some(100));
        assert_eq!(
            video.creation_date.unwrap().timestamp_millis(),
            1_272_312_315_000
        );
    }

    #[test]
    fn test_round_trip_preserves_set_fields() {
        let mut video = base_builder()
            .reference_id("ref-1")
            .economics(Economics::AdSupported)
            .build()
            .unwrap();
        video.add_custom_metadata("genre", "Sci-Fi", CustomMetaType::String);

        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["customFields"]["genre"], "Sci-Fi");

        let back: Video = serde_json::from_value(value).unwrap();
        assert_eq!(back.name(), video.name());
        assert_eq!(back.reference_id(), video.reference_id());
        assert_eq!(back.economics, Some(Economics::AdSupported));
        assert_eq!(back.custom_fields().get("genre").unwrap(), "Sci-Fi");
    }
}
