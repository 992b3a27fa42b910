//! FTP batch ingest.
//!
//! Bulk video creation bypasses the HTTP API: asset files are uploaded over
//! FTP, then an XML `publisher-upload-manifest` describing them is uploaded
//! last. The service picks the batch up once the manifest lands, which is
//! why it must be the final upload.

use std::fs::File;
use std::io::Cursor;

use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::{Map, Value};
use suppaftp::types::FileType;
use suppaftp::{FtpStream, Mode};
use tracing::info;

use vidora_core::config::ConnectionConfig;
use vidora_core::enums::ItemState;
use vidora_core::error::{Error, Result};
use vidora_core::models::Video;

#[derive(Debug)]
pub struct FtpTransport {
    host: String,
    user: String,
    password: String,
    publisher_id: String,
    preparer: String,
    notify_email: Option<String>,
    report_success: bool,
}

impl FtpTransport {
    /// Builds the transport from the `[Connection]` section; `host`,
    /// `user`, `password`, `publisher_id`, and `preparer` are all required
    /// for batch ingest.
    pub fn new(conn: &ConnectionConfig) -> Result<Self> {
        let require = |key: &str, value: &Option<String>| {
            value
                .clone()
                .ok_or_else(|| Error::Config(format!("missing '{key}' in [Connection]")))
        };
        Ok(FtpTransport {
            host: require("host", &conn.host)?,
            user: require("user", &conn.user)?,
            password: require("password", &conn.password)?,
            publisher_id: require("publisher_id", &conn.publisher_id)?,
            preparer: require("preparer", &conn.preparer)?,
            notify_email: None,
            report_success: conn.report_success,
        })
    }

    /// Address to email a per-title ingest report to.
    pub fn notify(mut self, email: impl Into<String>) -> Self {
        self.notify_email = Some(email.into());
        self
    }

    /// The JSON-RPC surface of this transport. Only video creation exists
    /// on the batch path.
    pub(crate) fn post(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        if method != "create_video" {
            return Err(Error::UnsupportedTransport {
                command: method.to_string(),
            });
        }
        let video: Video = params
            .get("video")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| Error::deserialization(format!("undecodable video: {e}")))?
            .ok_or_else(|| Error::validation("create_video requires a video"))?;
        self.submit_batch(&video)?;
        Ok(Value::Null)
    }

    /// Uploads every staged asset of `video`, then the manifest.
    pub fn submit_batch(&self, video: &Video) -> Result<()> {
        let manifest = self.manifest_xml(video)?;
        let mut ftp = self.connect()?;
        for asset in &video.assets {
            info!(file = %asset.filename, "uploading asset");
            let mut file = File::open(&asset.filename)
                .map_err(|e| Error::ftp(format!("cannot open '{}': {e}", asset.filename)))?;
            ftp.put_file(asset.basename(), &mut file)
                .map_err(Error::ftp)?;
        }
        // Named by content digest so retried batches do not collide.
        let digest = hex::encode(Md5::digest(manifest.as_bytes()));
        let manifest_name = format!("manifest-{}.xml", &digest[..10]);
        info!(file = %manifest_name, "uploading manifest");
        ftp.put_file(&manifest_name, &mut Cursor::new(manifest.into_bytes()))
            .map_err(Error::ftp)?;
        ftp.quit().map_err(Error::ftp)?;
        Ok(())
    }

    fn connect(&self) -> Result<FtpStream> {
        let address = if self.host.contains(':') {
            self.host.clone()
        } else {
            format!("{}:21", self.host)
        };
        let mut ftp = FtpStream::connect(&address).map_err(Error::ftp)?;
        ftp.login(&self.user, &self.password).map_err(Error::ftp)?;
        ftp.set_mode(Mode::Passive);
        ftp.transfer_type(FileType::Binary).map_err(Error::ftp)?;
        Ok(ftp)
    }

    /// Renders the `publisher-upload-manifest` document for one video.
    pub fn manifest_xml(&self, video: &Video) -> Result<String> {
        let name = video
            .name()
            .ok_or_else(|| Error::validation("Video.name is required"))?;
        let active = video.item_state() != Some(ItemState::Inactive);
        let manifest = Manifest {
            publisher_id: &self.publisher_id,
            preparer: &self.preparer,
            report_success: flag(self.report_success),
            notify: self
                .notify_email
                .as_deref()
                .map(|email| Notify { email }),
            titles: vec![Title {
                name,
                refid: video.reference_id(),
                active: flag(active),
                short_description: video.short_description(),
                long_description: video.long_description(),
                tags: video.tags.iter().map(String::as_str).collect(),
                custom_metadata: video
                    .custom_metadata()
                    .iter()
                    .map(|m| MetaValue {
                        name: &m.name,
                        kind: m.kind.to_string(),
                        value: &m.value,
                    })
                    .collect(),
                assets: video
                    .assets
                    .iter()
                    .map(|a| AssetEntry {
                        filename: a.basename(),
                        refid: &a.refid,
                        kind: a.kind.to_string(),
                        size: a.size,
                        hash_code: &a.hash_code,
                        encoding_rate: a.encoding_rate,
                        frame_width: a.frame_width,
                        frame_height: a.frame_height,
                    })
                    .collect(),
            }],
        };
        quick_xml::se::to_string(&manifest)
            .map_err(|e| Error::ftp(format!("cannot render manifest: {e}")))
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

#[derive(Serialize)]
#[serde(rename = "publisher-upload-manifest")]
struct Manifest<'a> {
    #[serde(rename = "@publisher-id")]
    publisher_id: &'a str,
    #[serde(rename = "@preparer")]
    preparer: &'a str,
    #[serde(rename = "@report-success")]
    report_success: &'static str,
    #[serde(rename = "notify", skip_serializing_if = "Option::is_none")]
    notify: Option<Notify<'a>>,
    #[serde(rename = "title")]
    titles: Vec<Title<'a>>,
}

#[derive(Serialize)]
struct Notify<'a> {
    #[serde(rename = "@email")]
    email: &'a str,
}

#[derive(Serialize)]
struct Title<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(rename = "@refid", skip_serializing_if = "Option::is_none")]
    refid: Option<&'a str>,
    #[serde(rename = "@active")]
    active: &'static str,
    #[serde(rename = "short-description", skip_serializing_if = "Option::is_none")]
    short_description: Option<&'a str>,
    #[serde(rename = "long-description", skip_serializing_if = "Option::is_none")]
    long_description: Option<&'a str>,
    #[serde(rename = "tag")]
    tags: Vec<&'a str>,
    #[serde(rename = "custom-metadata")]
    custom_metadata: Vec<MetaValue<'a>>,
    #[serde(rename = "asset")]
    assets: Vec<AssetEntry<'a>>,
}

#[derive(Serialize)]
struct MetaValue<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "$text")]
    value: &'a str,
}

#[derive(Serialize)]
struct AssetEntry<'a> {
    #[serde(rename = "@filename")]
    filename: &'a str,
    #[serde(rename = "@refid")]
    refid: &'a str,
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "@size")]
    size: u64,
    #[serde(rename = "@hash-code")]
    hash_code: &'a str,
    #[serde(rename = "@encoding-rate", skip_serializing_if = "Option::is_none")]
    encoding_rate: Option<u64>,
    #[serde(rename = "@frame-width", skip_serializing_if = "Option::is_none")]
    frame_width: Option<u32>,
    #[serde(rename = "@frame-height", skip_serializing_if = "Option::is_none")]
    frame_height: Option<u32>,
}
