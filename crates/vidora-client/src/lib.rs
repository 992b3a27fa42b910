//! Client for the Vidora Media API.
//!
//! The entry point is [`MediaApi`], constructed over a [`Transport`]
//! (HTTP JSON-RPC or FTP batch) or from a loaded
//! [`Config`](vidora_core::Config). List operations return an
//! [`ItemResultSet`], a restartable lazy sequence that fetches one page
//! per blocking round-trip and hides pagination from the caller:
//!
//! ```no_run
//! use vidora_core::Config;
//! use vidora_client::MediaApi;
//!
//! # fn main() -> vidora_core::error::Result<()> {
//! let api = MediaApi::from_config(&Config::load())?;
//! let videos = api.find_all_videos(Default::default());
//! for video in &videos {
//!     println!("{:?}", video?.name());
//! }
//! println!("library holds {} titles", videos.total_count().unwrap_or(0));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod connection;
pub mod ftp;
pub mod page;
pub mod pager;

pub use api::{CreateVideoOptions, ListOptions, MediaApi};
pub use connection::{Connection, HttpTransport, Transport};
pub use ftp::FtpTransport;
pub use page::Page;
pub use pager::{ItemIter, ItemQuery, ItemResultSet};
