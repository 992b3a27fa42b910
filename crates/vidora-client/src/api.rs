//! The Media API surface: finders and write operations.
//!
//! Read commands go out as GET against the library endpoint; writes go out
//! as JSON-RPC POSTs. List finders return an [`ItemResultSet`] and cost
//! nothing until iterated; single-item finders and writes are one blocking
//! round-trip each.

use std::path::Path;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use vidora_core::config::Config;
use vidora_core::enums::{PublicFilter, SortBy, SortOrder, UploadStatus};
use vidora_core::error::{Error, Result};
use vidora_core::models::{Image, Playlist, Video};

use crate::connection::{Connection, Transport};
use crate::pager::{ItemQuery, ItemResultSet};

/// Paging and sorting for a list finder.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub page_size: u64,
    pub starting_page: u64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            page_size: 100,
            starting_page: 0,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Knobs for [`MediaApi::create_video`].
#[derive(Debug, Clone, Copy)]
pub struct CreateVideoOptions {
    /// Send an MD5 digest of the uploaded file so the service can verify
    /// the transfer.
    pub do_checksum: bool,
    pub create_multiple_renditions: bool,
    pub preserve_source_rendition: bool,
}

impl Default for CreateVideoOptions {
    fn default() -> Self {
        CreateVideoOptions {
            do_checksum: true,
            create_multiple_renditions: true,
            preserve_source_rendition: true,
        }
    }
}

/// Client for the Vidora Media API over a configured transport.
pub struct MediaApi {
    connection: Box<dyn Connection>,
}

impl MediaApi {
    pub fn new(transport: Transport) -> Self {
        Self::with_connection(Box::new(transport))
    }

    /// Builds the API over any transport, mock transports included.
    pub fn with_connection(connection: Box<dyn Connection>) -> Self {
        MediaApi { connection }
    }

    /// Picks HTTP or FTP from the `[Connection]` section of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Transport::from_config(config)?))
    }

    fn query(&self, command: &str, options: ListOptions) -> ItemQuery {
        ItemQuery::new(command)
            .page_size(options.page_size)
            .starting_page(options.starting_page)
            .sort_by(options.sort_by)
            .sort_order(options.sort_order)
    }

    fn list<T: DeserializeOwned>(&self, query: ItemQuery) -> ItemResultSet<'_, T> {
        ItemResultSet::new(&*self.connection, query)
    }

    fn fetch_one<T: DeserializeOwned>(
        &self,
        command: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let raw = self.connection.get_item(command, params)?;
        decode(raw)
    }

    fn post(&self, method: &str, params: Map<String, Value>, file: Option<&Path>) -> Result<Value> {
        self.connection.post(method, params, file)
    }

    // Video finders.

    pub fn find_all_videos(&self, options: ListOptions) -> ItemResultSet<'_, Video> {
        self.list(self.query("find_all_videos", options))
    }

    /// Videos carrying all of `and_tags` and any of `or_tags`. At least
    /// one tag must be given.
    pub fn find_videos_by_tags(
        &self,
        and_tags: &[&str],
        or_tags: &[&str],
        options: ListOptions,
    ) -> Result<ItemResultSet<'_, Video>> {
        if and_tags.is_empty() && or_tags.is_empty() {
            return Err(Error::validation(
                "find_videos_by_tags requires at least one tag",
            ));
        }
        let mut query = self.query("find_videos_by_tags", options);
        if !and_tags.is_empty() {
            query = query.filter_list("and_tags", and_tags);
        }
        if !or_tags.is_empty() {
            query = query.filter_list("or_tags", or_tags);
        }
        Ok(self.list(query))
    }

    /// Full-text search over name and descriptions.
    pub fn find_videos_by_text(
        &self,
        text: &str,
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(self.query("find_videos_by_text", options).filter("text", text))
    }

    pub fn find_videos_by_campaign_id(
        &self,
        campaign_id: i64,
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(
            self.query("find_videos_by_campaign_id", options)
                .filter("campaign_id", campaign_id.to_string()),
        )
    }

    pub fn find_videos_by_user_id(
        &self,
        user_id: &str,
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(
            self.query("find_videos_by_user_id", options)
                .filter("user_id", user_id),
        )
    }

    /// Videos related to the given one, as judged by the service.
    pub fn find_related_videos(
        &self,
        video_id: i64,
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(
            self.query("find_related_videos", options)
                .filter("video_id", video_id.to_string()),
        )
    }

    /// Videos modified since `since`. The service counts in whole minutes
    /// since the epoch. `filters` narrows by lifecycle state.
    pub fn find_modified_videos(
        &self,
        since: DateTime<Utc>,
        filters: &[PublicFilter],
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        let mut query = self
            .query("find_modified_videos", options)
            .filter("from_date", (since.timestamp() / 60).to_string());
        if !filters.is_empty() {
            query = query.filter_list("filter", filters);
        }
        self.list(query)
    }

    pub fn find_videos_by_ids(
        &self,
        video_ids: &[i64],
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(
            self.query("find_videos_by_ids", options)
                .filter_list("video_ids", video_ids),
        )
    }

    pub fn find_videos_by_reference_ids(
        &self,
        reference_ids: &[&str],
        options: ListOptions,
    ) -> ItemResultSet<'_, Video> {
        self.list(
            self.query("find_videos_by_reference_ids", options)
                .filter_list("reference_ids", reference_ids),
        )
    }

    pub fn find_video_by_id(&self, video_id: i64) -> Result<Video> {
        self.fetch_one(
            "find_video_by_id",
            &[("video_id".to_string(), video_id.to_string())],
        )
    }

    pub fn find_video_by_reference_id(&self, reference_id: &str) -> Result<Video> {
        self.fetch_one(
            "find_video_by_reference_id",
            &[("reference_id".to_string(), reference_id.to_string())],
        )
    }

    // Playlist finders.

    pub fn find_all_playlists(&self, options: ListOptions) -> ItemResultSet<'_, Playlist> {
        self.list(self.query("find_all_playlists", options))
    }

    pub fn find_playlists_by_ids(
        &self,
        playlist_ids: &[i64],
        options: ListOptions,
    ) -> ItemResultSet<'_, Playlist> {
        self.list(
            self.query("find_playlists_by_ids", options)
                .filter_list("playlist_ids", playlist_ids),
        )
    }

    pub fn find_playlists_by_reference_ids(
        &self,
        reference_ids: &[&str],
        options: ListOptions,
    ) -> ItemResultSet<'_, Playlist> {
        self.list(
            self.query("find_playlists_by_reference_ids", options)
                .filter_list("reference_ids", reference_ids),
        )
    }

    /// Playlists assigned to a given player.
    pub fn find_playlists_for_player_id(
        &self,
        player_id: &str,
        options: ListOptions,
    ) -> ItemResultSet<'_, Playlist> {
        self.list(
            self.query("find_playlists_for_player_id", options)
                .filter("player_id", player_id),
        )
    }

    pub fn find_playlist_by_id(&self, playlist_id: i64) -> Result<Playlist> {
        self.fetch_one(
            "find_playlist_by_id",
            &[("playlist_id".to_string(), playlist_id.to_string())],
        )
    }

    pub fn find_playlist_by_reference_id(&self, reference_id: &str) -> Result<Playlist> {
        self.fetch_one(
            "find_playlist_by_reference_id",
            &[("reference_id".to_string(), reference_id.to_string())],
        )
    }

    // Write operations.

    /// Creates a video, optionally uploading its media file in the same
    /// call. Returns the new video id, or `None` on the batch transport
    /// where ids are assigned after ingest.
    pub fn create_video(
        &self,
        video: &Video,
        file: Option<&Path>,
        options: CreateVideoOptions,
    ) -> Result<Option<i64>> {
        let mut params = Map::new();
        params.insert("video".to_string(), encode(video)?);
        params.insert(
            "create_multiple_renditions".to_string(),
            Value::Bool(options.create_multiple_renditions),
        );
        params.insert(
            "preserve_source_rendition".to_string(),
            Value::Bool(options.preserve_source_rendition),
        );
        if let (Some(path), true) = (file, options.do_checksum) {
            params.insert("file_checksum".to_string(), Value::String(md5_of(path)?));
        }
        let result = self.post("create_video", params, file)?;
        Ok(result.as_i64())
    }

    /// Updates a video's metadata and returns the stored version.
    pub fn update_video(&self, video: &Video) -> Result<Video> {
        let mut params = Map::new();
        params.insert("video".to_string(), encode(video)?);
        decode(self.post("update_video", params, None)?)
    }

    /// Deletes a video. With `cascade` the video is removed even when it
    /// is referenced by playlists or shares, which are updated to match.
    pub fn delete_video(&self, video_id: i64, cascade: bool) -> Result<()> {
        let mut params = Map::new();
        params.insert("video_id".to_string(), Value::from(video_id));
        params.insert("cascade".to_string(), Value::Bool(cascade));
        self.post("delete_video", params, None)?;
        Ok(())
    }

    /// Ingest progress of a previously submitted video.
    pub fn get_upload_status(&self, video_id: i64) -> Result<UploadStatus> {
        let mut params = Map::new();
        params.insert("video_id".to_string(), Value::from(video_id));
        decode(self.post("get_upload_status", params, None)?)
    }

    /// Shares a video into other accounts; returns the ids the video has
    /// in each sharee account.
    pub fn share_video(
        &self,
        video_id: i64,
        sharee_account_ids: &[i64],
        auto_sync: bool,
    ) -> Result<Vec<i64>> {
        let mut params = Map::new();
        params.insert("video_id".to_string(), Value::from(video_id));
        params.insert(
            "sharee_account_ids".to_string(),
            Value::from(sharee_account_ids.to_vec()),
        );
        params.insert("auto_sync".to_string(), Value::Bool(auto_sync));
        decode(self.post("share_video", params, None)?)
    }

    /// Attaches or replaces a video's thumbnail or still. The image must
    /// carry a remote URL when no file is uploaded with it. With `resize`
    /// the service scales the image to the standard dimensions.
    pub fn add_image(
        &self,
        video_id: i64,
        image: &Image,
        file: Option<&Path>,
        resize: bool,
    ) -> Result<Image> {
        self.submit_image("add_image", video_id, image, file, resize)
    }

    /// Replaces an existing image; the image must carry its id or
    /// reference id so the service knows which one to swap.
    pub fn update_image(
        &self,
        video_id: i64,
        image: &Image,
        file: Option<&Path>,
        resize: bool,
    ) -> Result<Image> {
        self.submit_image("update_image", video_id, image, file, resize)
    }

    fn submit_image(
        &self,
        method: &str,
        video_id: i64,
        image: &Image,
        file: Option<&Path>,
        resize: bool,
    ) -> Result<Image> {
        image.check_submittable(file.is_some())?;
        let mut params = Map::new();
        params.insert("video_id".to_string(), Value::from(video_id));
        params.insert("image".to_string(), encode(image)?);
        params.insert("resize".to_string(), Value::Bool(resize));
        decode(self.post(method, params, file)?)
    }

    /// Creates a playlist and returns its id. Ids of any attached videos
    /// are folded into `video_ids` first.
    pub fn create_playlist(&self, playlist: &mut Playlist) -> Result<i64> {
        playlist.collect_video_ids();
        let mut params = Map::new();
        params.insert("playlist".to_string(), encode(playlist)?);
        let result = self.post("create_playlist", params, None)?;
        result
            .as_i64()
            .ok_or_else(|| Error::deserialization(format!("expected a playlist id, got {result}")))
    }

    /// Updates a playlist and returns the stored version.
    pub fn update_playlist(&self, playlist: &mut Playlist) -> Result<Playlist> {
        playlist.collect_video_ids();
        let mut params = Map::new();
        params.insert("playlist".to_string(), encode(playlist)?);
        decode(self.post("update_playlist", params, None)?)
    }

    pub fn delete_playlist(&self, playlist_id: i64, cascade: bool) -> Result<()> {
        let mut params = Map::new();
        params.insert("playlist_id".to_string(), Value::from(playlist_id));
        params.insert("cascade".to_string(), Value::Bool(cascade));
        self.post("delete_playlist", params, None)?;
        Ok(())
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::deserialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<T> {
    if raw.is_null() {
        return Err(Error::NoData);
    }
    serde_json::from_value(raw).map_err(|e| Error::deserialization(e.to_string()))
}

fn md5_of(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::validation(format!("cannot read '{}': {e}", path.display())))?;
    Ok(hex::encode(Md5::digest(&bytes)))
}
