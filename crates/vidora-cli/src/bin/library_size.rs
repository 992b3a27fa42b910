use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use vidora_client::{ListOptions, MediaApi};
use vidora_core::enums::{SortBy, SortOrder};
use vidora_core::Config;

#[derive(Parser, Debug)]
#[command(name = "library_size")]
#[command(about = "Report the size of the media library and its newest titles")]
struct Args {
    /// How many recent titles to show (default: 10)
    #[arg(long, default_value = "10")]
    limit: u64,

    /// Read configuration from this file instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format: json or table (default: table)
    #[arg(long, default_value = "table")]
    format: String,
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

    let options = ListOptions {
        page_size: args.limit.max(1),
        sort_by: SortBy::CreationDate,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };
    let videos = api.find_all_videos(options);
    let newest: Vec<_> = videos
        .iter()
        .take(args.limit as usize)
        .collect::<vidora_core::error::Result<_>>()?;
    let total = videos.total_count().unwrap_or(newest.len() as i64);

    match args.format.as_str() {
        "json" => {
            let report = serde_json::json!({
                "total_count": total,
                "newest": newest,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("\n=== Media Library ===\n");
            println!("Total: {total} titles");
            if newest.is_empty() {
                println!("\nNo videos found.");
                return Ok(());
            }
            println!("\n{:<14} {:<40} {:>20}", "ID", "Name", "Created");
            println!("{}", "-".repeat(76));
            for video in &newest {
                println!(
                    "{:<14} {:<40} {:>20}",
                    video.id.unwrap_or(0),
                    truncate_string(video.name().unwrap_or(""), 40),
                    video
                        .creation_date
                        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_default()
                );
            }
            println!();
        }
    }

    Ok(())
}

// Counted in characters, since names are validated in characters and may
// hold multibyte text.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
