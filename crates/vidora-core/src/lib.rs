//! Core types for the Vidora Media API.
//!
//! This crate holds everything that is independent of the wire transports:
//! the enumerated vocabularies of the remote service, the domain entities
//! (`Video`, `Playlist`, `Image`, `Rendition`, `CuePoint`) with their
//! builder-side validation, the unified [`Error`] taxonomy including the
//! remote error-code table, and the layered ini configuration loader.
//!
//! Network transports and the paginated finder API live in `vidora-client`.

pub mod config;
pub mod enums;
pub mod error;
pub mod models;
pub mod validation;

pub use config::Config;
pub use error::{Error, RemoteError, RemoteErrorKind, Result};
pub use models::{Asset, CuePoint, CustomMetadata, Image, Playlist, Rendition, Video};
