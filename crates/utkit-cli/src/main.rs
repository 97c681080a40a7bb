//! Command line front end for the utkit core helpers.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use utkit_core::config::DEFAULT_FPS;
use utkit_core::{Conditions, file, format, parse_css_color, turbo_filter};

#[derive(Debug, Parser)]
#[command(name = "utkit", version, about = "String, file and JSON helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Turn text into a lowercase underscore slug.
    Slug { text: String },
    /// Format a byte count as KB/MB/GB/TB.
    Size { bytes: u64 },
    /// Split a millisecond duration into clock fields.
    Playtime {
        /// Duration in milliseconds; may be negative.
        #[arg(allow_hyphen_values = true)]
        ms: f64,
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: u32,
    },
    /// Parse a CSS color into `[r, g, b, a]`.
    Color { css: String },
    /// Classify a file name or URL as img, video or audio.
    Media { path: String },
    /// Filter a JSON array of records by per-field conditions.
    Filter {
        /// File holding the JSON array.
        #[arg(long)]
        data: PathBuf,
        /// Conditions object, e.g. `{"age":{"condition":">=","value":30}}`.
        #[arg(long)]
        conditions: String,
        #[arg(long)]
        ignore_case: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    println!("{}", run(cli.command)?);
    Ok(())
}

fn run(command: Command) -> anyhow::Result<String> {
    let output = match command {
        Command::Slug { text } => format::slugify(&text).unwrap_or_default(),
        Command::Size { bytes } => format::format_file_size(bytes),
        Command::Playtime { ms, fps } => {
            serde_json::to_string_pretty(&format::play_time(ms, fps))?
        }
        Command::Color { css } => {
            let color =
                parse_css_color(&css).with_context(|| format!("not a supported color: {css}"))?;
            serde_json::to_string(&color.to_array())?
        }
        Command::Media { path } => file::get_media_type(&path).to_string(),
        Command::Filter {
            data,
            conditions,
            ignore_case,
        } => {
            let raw = fs::read_to_string(&data)
                .with_context(|| format!("failed to read {}", data.display()))?;
            let records: Vec<Value> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array", data.display()))?;
            let conditions: Conditions =
                serde_json::from_str(&conditions).context("invalid conditions object")?;
            tracing::debug!(records = records.len(), conditions = conditions.len(), "filtering");
            serde_json::to_string_pretty(&turbo_filter(&records, &conditions, ignore_case))?
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playtime_default_fps() {
        let cli = Cli::try_parse_from(["utkit", "playtime", "1500"]).unwrap();
        match cli.command {
            Command::Playtime { ms, fps } => {
                assert_eq!(ms, 1500.0);
                assert_eq!(fps, DEFAULT_FPS);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_playtime() {
        let cli = Cli::try_parse_from(["utkit", "playtime", "-61000", "--fps", "25"]).unwrap();
        match cli.command {
            Command::Playtime { ms, fps } => {
                assert_eq!(ms, -61000.0);
                assert_eq!(fps, 25);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_filter_requires_data() {
        let result = Cli::try_parse_from(["utkit", "filter", "--conditions", "{}"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_slug_and_size() {
        let slug = run(Command::Slug {
            text: "Hello World! Test".to_string(),
        })
        .unwrap();
        assert_eq!(slug, "hello_world_test");

        let size = run(Command::Size { bytes: 1536 }).unwrap();
        assert_eq!(size, "1.5 KB");
    }

    #[test]
    fn test_run_color() {
        let out = run(Command::Color {
            css: "#ff0000".to_string(),
        })
        .unwrap();
        assert_eq!(out, "[255.0,0.0,0.0,1.0]");

        assert!(
            run(Command::Color {
                css: "teal".to_string()
            })
            .is_err()
        );
    }

    #[test]
    fn test_run_media() {
        let out = run(Command::Media {
            path: "clip.MP4".to_string(),
        })
        .unwrap();
        assert_eq!(out, "video");
    }

    #[test]
    fn test_run_filter() {
        let name = format!("utkit-cli-filter-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, r#"[{"age":25},{"age":30},{"age":35}]"#).unwrap();

        let out = run(Command::Filter {
            data: path.clone(),
            conditions: r#"{"age":{"condition":">=","value":30}}"#.to_string(),
            ignore_case: false,
        })
        .unwrap();
        fs::remove_file(&path).unwrap();

        let kept: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(kept, vec![serde_json::json!({"age":30}), serde_json::json!({"age":35})]);
    }
}
