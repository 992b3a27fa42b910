//! A single delivery rendition of a video. A video should carry at most
//! ten of these.

use serde::{Deserialize, Serialize};

use crate::enums::VideoCodec;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rendition {
    /// URL of the rendition file; assigned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Encoding rate in bits per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_rate: Option<u64>,
    /// Display height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
    /// Display width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    /// File size in bytes. Required for remote assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Complete path of the file on the remote server, for remote assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Stream name appended to `remote_url` for streamed remote assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_stream_name: Option<String>,
    /// Length of the asset in milliseconds. Required for remote assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<VideoCodec>,
}

impl Rendition {
    pub fn builder() -> RenditionBuilder {
        RenditionBuilder::default()
    }
}

/// Builds a [`Rendition`] describing a remote asset; checks the fields the
/// service requires for one.
#[derive(Debug, Default)]
pub struct RenditionBuilder {
    rendition: Rendition,
}

impl RenditionBuilder {
    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.rendition.remote_url = Some(url.into());
        self
    }

    pub fn remote_stream_name(mut self, name: impl Into<String>) -> Self {
        self.rendition.remote_stream_name = Some(name.into());
        self
    }

    pub fn size(mut self, bytes: u64) -> Self {
        self.rendition.size = Some(bytes);
        self
    }

    pub fn video_duration(mut self, millis: u64) -> Self {
        self.rendition.video_duration = Some(millis);
        self
    }

    pub fn video_codec(mut self, codec: VideoCodec) -> Self {
        self.rendition.video_codec = Some(codec);
        self
    }

    pub fn encoding_rate(mut self, bits_per_second: u64) -> Self {
        self.rendition.encoding_rate = Some(bits_per_second);
        self
    }

    pub fn frame_size(mut self, width: u32, height: u32) -> Self {
        self.rendition.frame_width = Some(width);
        self.rendition.frame_height = Some(height);
        self
    }

    pub fn build(self) -> Result<Rendition> {
        let r = self.rendition;
        if r.remote_url.is_none() {
            return Err(Error::validation(
                "Rendition.remote_url is required for remote assets",
            ));
        }
        if r.video_duration.is_none() {
            return Err(Error::validation(
                "Rendition.video_duration must be the duration in milliseconds",
            ));
        }
        if r.video_codec.is_none() {
            return Err(Error::validation(
                "Rendition.video_codec must be SORENSON, ON2, or H264",
            ));
        }
        Ok(r)
    }
}
