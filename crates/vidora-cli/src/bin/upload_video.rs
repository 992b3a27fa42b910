use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use vidora_client::{CreateVideoOptions, MediaApi};
use vidora_core::{Config, Video};

#[derive(Parser, Debug)]
#[command(name = "upload_video")]
#[command(about = "Upload a video file to the media library")]
struct Args {
    /// Path of the video file to upload
    file: PathBuf,

    /// Title shown in the media library (max 60 characters)
    #[arg(long)]
    name: String,

    /// Short description (max 250 characters)
    #[arg(long)]
    description: String,

    /// Optional reference id usable as a foreign key
    #[arg(long)]
    reference_id: Option<String>,

    /// Tag to attach; repeat for multiple tags
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the MD5 checksum sent along with the upload
    #[arg(long)]
    no_checksum: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_paths(&[path]),
        None => Config::load(),
    };
    let api = MediaApi::from_config(&config)?;

    let mut builder = Video::builder()
        .name(&args.name)
        .short_description(&args.description);
    if let Some(reference_id) = &args.reference_id {
        builder = builder.reference_id(reference_id);
    }
    for tag in &args.tags {
        builder = builder.tag(tag);
    }
    let video = builder.build()?;

    let options = CreateVideoOptions {
        do_checksum: !args.no_checksum,
        ..Default::default()
    };
    match api.create_video(&video, Some(args.file.as_path()), options)? {
        Some(id) => println!("Created video {id}"),
        None => println!("Batch submitted; the id is assigned after ingest"),
    }

    Ok(())
}
