//! Marksplit - A terminal markdown editor with a live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! marksplit
//! marksplit notes.md
//! marksplit --split 60 --theme light README.md
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use marksplit::app::App;
use marksplit::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use marksplit::highlight::{Background, set_background};

/// A terminal markdown editor with a live side-by-side preview
#[derive(Parser, Debug)]
#[command(name = "marksplit", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit; created on first save if it does not exist
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Editor pane width in percent of the screen
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u16).range(10..=90))]
    split: Option<u16>,

    /// Preview palette (auto reads COLORFGBG)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write tracing output to a file (nothing is logged otherwise)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            split: self.split,
            theme: self.theme,
            log_file: self.log_file.clone(),
        }
    }
}

/// Open the log sink, if any.
///
/// The terminal is in raw mode on the alternate screen while the editor
/// runs, so without `--log-file` nothing is logged at all.
fn log_writer(log_file: Option<&Path>) -> Result<Option<Mutex<File>>> {
    log_file
        .map(|path| {
            File::create(path)
                .map(Mutex::new)
                .with_context(|| format!("Failed to create log file {}", path.display()))
        })
        .transpose()
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    if let Some(writer) = log_writer(log_file)? {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "effective configuration");

    set_background(match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => None,
        ThemeMode::Light => Some(Background::Light),
        ThemeMode::Dark => Some(Background::Dark),
    });

    let mut app = App::new(cli.file)
        .with_split_percent(effective.split.unwrap_or(marksplit::app::DEFAULT_SPLIT_PERCENT))
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_log_file_means_no_writer() {
        assert!(log_writer(None).unwrap().is_none());
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("marksplit.log");
        assert!(log_writer(Some(&path)).unwrap().is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("marksplit.log");
        assert!(log_writer(Some(&path)).is_err());
    }

    #[test]
    fn test_cli_flags_carry_config_values() {
        let cli = Cli::parse_from(["marksplit", "--split", "60", "--theme", "dark", "notes.md"]);
        let flags = cli.flags();
        assert_eq!(flags.split, Some(60));
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
    }
}
