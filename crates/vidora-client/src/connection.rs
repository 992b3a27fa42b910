//! Transports that carry Media API calls.
//!
//! [`Connection`] is the seam the finder layer talks through: list fetches,
//! single-item fetches, and JSON-RPC writes. [`HttpTransport`] implements
//! all three over blocking HTTP. The FTP batch transport accepts only video
//! creation; every other command answers
//! [`Error::UnsupportedTransport`].

use std::path::Path;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use vidora_core::config::{Config, ConnectionConfig};
use vidora_core::error::{Error, RemoteError, Result};

use crate::ftp::FtpTransport;
use crate::pager::ItemQuery;

const USER_AGENT: &str = concat!("vidora-rs/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The operations a transport must carry for the finder layer.
pub trait Connection {
    /// Fetches one page of a list command.
    fn get_list(&self, query: &ItemQuery, page_number: u64) -> Result<Value>;

    /// Fetches a single item; the decoded body, `null` included, is
    /// returned as-is.
    fn get_item(&self, command: &str, params: &[(String, String)]) -> Result<Value>;

    /// Submits a JSON-RPC write, optionally with an attached file, and
    /// returns the `result` member.
    fn post(&self, method: &str, params: Map<String, Value>, file: Option<&Path>) -> Result<Value>;
}

/// The configured transport: HTTP JSON-RPC, or FTP batch ingest.
pub enum Transport {
    Http(HttpTransport),
    Ftp(FtpTransport),
}

impl Transport {
    /// Picks the transport from the `[Connection]` section: an FTP `host`
    /// selects batch ingest, otherwise the HTTP API.
    pub fn from_config(config: &Config) -> Result<Transport> {
        let conn = config.connection();
        if conn.host.is_some() {
            Ok(Transport::Ftp(FtpTransport::new(&conn)?))
        } else {
            Ok(Transport::Http(HttpTransport::new(&conn)?))
        }
    }
}

impl Connection for Transport {
    fn get_list(&self, query: &ItemQuery, page_number: u64) -> Result<Value> {
        match self {
            Transport::Http(http) => http.get_list(query, page_number),
            Transport::Ftp(_) => Err(Error::UnsupportedTransport {
                command: query.command().to_string(),
            }),
        }
    }

    fn get_item(&self, command: &str, params: &[(String, String)]) -> Result<Value> {
        match self {
            Transport::Http(http) => http.get_item(command, params),
            Transport::Ftp(_) => Err(Error::UnsupportedTransport {
                command: command.to_string(),
            }),
        }
    }

    fn post(&self, method: &str, params: Map<String, Value>, file: Option<&Path>) -> Result<Value> {
        match self {
            Transport::Http(http) => http.post(method, params, file),
            Transport::Ftp(ftp) => ftp.post(method, params),
        }
    }
}

/// Blocking HTTP transport against the read and write endpoints.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    read_url: String,
    write_url: String,
    read_token: Option<String>,
    write_token: Option<String>,
}

impl HttpTransport {
    pub fn new(conn: &ConnectionConfig) -> Result<Self> {
        Self::with_credentials(
            conn.read_url.clone(),
            conn.write_url.clone(),
            conn.read_token.clone(),
            conn.write_token.clone(),
        )
    }

    pub fn with_credentials(
        read_url: String,
        write_url: String,
        read_token: Option<String>,
        write_token: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::transport)?;
        Ok(HttpTransport {
            client,
            read_url,
            write_url,
            read_token,
            write_token,
        })
    }

    /// Read URL for a command: `output`, `command`, and `token` first, then
    /// the given parameters with url-encoded values.
    fn build_read_url(&self, command: &str, params: &[(String, String)]) -> Result<String> {
        let token = self.read_token.as_deref().ok_or_else(|| {
            Error::Config("missing 'read_token' in [Connection]".to_string())
        })?;
        let mut url = format!(
            "{}?output=JSON&command={}&token={}",
            self.read_url, command, token
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        Ok(url)
    }

    fn get(&self, url: &str) -> Result<Value> {
        let body: Value = self
            .client
            .get(url)
            .send()
            .map_err(Error::transport)?
            .json()
            .map_err(Error::transport)?;
        check_for_error(&body)?;
        Ok(body)
    }
}

impl Connection for HttpTransport {
    fn get_list(&self, query: &ItemQuery, page_number: u64) -> Result<Value> {
        let url = self.build_read_url(query.command(), &query.params(page_number))?;
        debug!(command = query.command(), page_number, "GET {url}");
        self.get(&url)
    }

    fn get_item(&self, command: &str, params: &[(String, String)]) -> Result<Value> {
        let url = self.build_read_url(command, params)?;
        debug!(command, "GET {url}");
        self.get(&url)
    }

    fn post(&self, method: &str, mut params: Map<String, Value>, file: Option<&Path>) -> Result<Value> {
        let token = self.write_token.as_deref().ok_or_else(|| {
            Error::Config("missing 'write_token' in [Connection]".to_string())
        })?;
        params.insert("token".to_string(), Value::String(token.to_string()));
        let envelope = json_rpc_envelope(method, params).to_string();
        info!(method, file = ?file, "POST {}", self.write_url);

        let request = self.client.post(&self.write_url);
        let response = match file {
            // Uploads go multipart: the envelope in a `JSONRPC` part, the
            // file stream alongside it.
            Some(path) => {
                let form = reqwest::blocking::multipart::Form::new()
                    .text("JSONRPC", envelope)
                    .file("filePath", path)
                    .map_err(Error::transport)?;
                request.multipart(form).send()
            }
            None => request.form(&[("JSONRPC", envelope)]).send(),
        };
        let body: Value = response
            .map_err(Error::transport)?
            .json()
            .map_err(Error::transport)?;
        check_for_error(&body)?;
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }
}

fn json_rpc_envelope(method: &str, params: Map<String, Value>) -> Value {
    json!({ "method": method, "params": params })
}

/// Translates an error-shaped body into [`Error::Remote`].
///
/// Writes answer `{"error": {"code": N, "message": ".."}, ..}`; some read
/// commands answer `{"error": "message", "code": N}` with the code beside
/// the error rather than inside it.
fn check_for_error(body: &Value) -> Result<()> {
    match body.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(()),
        Some(error) => {
            let mut remote = RemoteError::from_payload(error);
            if error.is_string() {
                if let Some(code) = body.get("code").and_then(Value::as_i64) {
                    remote = RemoteError::new(code, remote.message);
                }
            }
            Err(remote.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vidora_core::error::RemoteErrorKind;

    fn transport() -> HttpTransport {
        HttpTransport::with_credentials(
            "http://localhost:8080/library".to_string(),
            "http://localhost:8080/post".to_string(),
            Some("read-token".to_string()),
            Some("write-token".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_read_url_places_command_and_token_first() {
        let url = transport()
            .build_read_url(
                "find_video_by_id",
                &[("video_id".to_string(), "123".to_string())],
            )
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:8080/library?output=JSON&command=find_video_by_id\
             &token=read-token&video_id=123"
        );
    }

    #[test]
    fn test_read_url_encodes_parameter_values() {
        let url = transport()
            .build_read_url("find_videos_by_text", &[("text".to_string(), "cats & dogs".to_string())])
            .unwrap();
        assert!(url.ends_with("&text=cats%20%26%20dogs"));
    }

    #[test]
    fn test_read_url_without_token_is_a_config_error() {
        let transport = HttpTransport::with_credentials(
            "http://localhost:8080/library".to_string(),
            "http://localhost:8080/post".to_string(),
            None,
            None,
        )
        .unwrap();
        let err = transport.build_read_url("find_all_videos", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: missing 'read_token' in [Connection]"
        );
    }

    #[test]
    fn test_envelope_shape() {
        let mut params = Map::new();
        params.insert("video_id".to_string(), json!(123));
        let envelope = json_rpc_envelope("delete_video", params);
        assert_eq!(
            envelope,
            json!({"method": "delete_video", "params": {"video_id": 123}})
        );
    }

    #[test]
    fn test_error_object_body_becomes_remote_error() {
        let body = json!({"error": {"code": 210, "message": "invalid token"}, "result": null});
        let err = check_for_error(&body).unwrap_err();
        match err {
            Error::Remote(remote) => {
                assert_eq!(remote.code, 210);
                assert_eq!(remote.kind, RemoteErrorKind::InvalidToken);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_legacy_string_error_takes_sibling_code() {
        let body = json!({"error": "video not found", "code": 307});
        let err = check_for_error(&body).unwrap_err();
        match err {
            Error::Remote(remote) => {
                assert_eq!(remote.code, 307);
                assert_eq!(remote.kind, RemoteErrorKind::ObjectNotFound);
                assert_eq!(remote.message, "video not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_error_is_not_an_error() {
        assert!(check_for_error(&json!({"error": null, "result": 42})).is_ok());
        assert!(check_for_error(&json!({"error": false, "result": 42})).is_ok());
        assert!(check_for_error(&json!({"items": []})).is_ok());
    }

    #[test]
    fn test_ftp_transport_rejects_reads() {
        let conn = ConnectionConfig {
            read_token: None,
            write_token: None,
            read_url: String::new(),
            write_url: String::new(),
            host: Some("ftp.example.com".to_string()),
            user: Some("uploader".to_string()),
            password: Some("secret".to_string()),
            publisher_id: Some("111111111".to_string()),
            preparer: Some("Patrick".to_string()),
            report_success: false,
        };
        let transport = Transport::Ftp(FtpTransport::new(&conn).unwrap());

        let err = transport
            .get_list(&ItemQuery::new("find_all_videos"), 0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'find_all_videos' is not supported by this transport"
        );

        let err = transport.get_item("find_video_by_id", &[]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTransport { .. }));
    }
}
