//! A marker at a precise time point in a video, used to trigger mid-roll
//! ads or to separate chapters.

use serde::{Deserialize, Serialize};

/// Cue point kind. Travels as an integer code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CuePointType {
    /// Triggers a mid-roll ad request.
    Ad,
    /// Fires an event the player can listen for; may carry `metadata`.
    Code,
    /// Marks a chapter or scene break.
    Chapter,
}

impl From<CuePointType> for u8 {
    fn from(value: CuePointType) -> u8 {
        match value {
            CuePointType::Ad => 0,
            CuePointType::Code => 1,
            CuePointType::Chapter => 2,
        }
    }
}

impl TryFrom<u8> for CuePointType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CuePointType::Ad),
            1 => Ok(CuePointType::Code),
            2 => Ok(CuePointType::Chapter),
            other => Err(format!("unknown cue point type code {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuePoint {
    pub name: String,
    /// Ids of the videos this cue point applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Offset from the start of the video, in milliseconds.
    pub time: u64,
    /// Stop playback at the cue point. Only meaningful for AD cue points.
    #[serde(
        rename = "forceStop",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub force_stop: Option<bool>,
    #[serde(rename = "type")]
    pub kind: CuePointType,
    /// Free-form string passed along with a CODE cue point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl CuePoint {
    pub fn new(name: impl Into<String>, time: u64, kind: CuePointType) -> Self {
        CuePoint {
            name: name.into(),
            video_id: None,
            time,
            force_stop: None,
            kind,
            metadata: None,
        }
    }
}
