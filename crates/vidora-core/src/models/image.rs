//! Metadata about an image asset: a thumbnail or a video still attached to
//! a video. When creating an image the `kind` is required, and `remote_url`
//! is required unless a file is uploaded alongside.

use serde::{Deserialize, Serialize};

use crate::enums::ImageType;
use crate::error::{Error, Result};
use crate::validation::{check_max_len, MAX_REFERENCE_ID_LEN};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    /// Assigned by the service when the image is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ImageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Name shown in the media library UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Image {
    /// A new image of the given kind. The kind cannot be changed once the
    /// asset exists remotely.
    pub fn new(kind: ImageType) -> Self {
        Image {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn set_reference_id(&mut self, reference_id: impl Into<String>) -> Result<()> {
        let value = reference_id.into();
        check_max_len("Image", "reference_id", &value, MAX_REFERENCE_ID_LEN)?;
        self.reference_id = Some(value);
        Ok(())
    }

    /// Validates the invariants required to submit this image.
    pub fn check_submittable(&self, has_file: bool) -> Result<()> {
        if self.kind.is_none() {
            return Err(Error::validation("Image.type is required"));
        }
        if !has_file && self.remote_url.is_none() {
            return Err(Error::validation(
                "Image.remote_url is required when no file is uploaded",
            ));
        }
        Ok(())
    }
}
