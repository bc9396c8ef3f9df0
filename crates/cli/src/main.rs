//! dszip: build the zip archive for a catalog dataset.
//!
//! ```text
//! dszip --dataset-id 42 --zipfile-path /exports/ds-42.zip
//! dszip --write-config dszip.toml
//! ```
//!
//! Exit status:
//! - 0: archive produced (some files may have been skipped)
//! - 1: export failed (dataset missing, catalog unreachable, destination unwritable)
//! - 2: bad configuration

mod commands;
mod format;
mod settings;

use std::path::PathBuf;
use std::process;

use dszip_archive::ArchiveReader;
use dszip_catalog::SqliteCatalog;
use dszip_core::DatasetId;
use dszip_engine::{ExportConfig, ExportError, Exporter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_report, OutputMode};

const EXIT_FAILED: i32 = 1;
const EXIT_CONFIG: i32 = 2;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));
    process::exit(run(&matches));
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &clap::ArgMatches) -> i32 {
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Some(path) = matches.get_one::<PathBuf>("write-config") {
        return match ExportConfig::write_default_if_missing(path) {
            Ok(()) => {
                info!(path = %path.display(), "Config file ready");
                0
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                EXIT_CONFIG
            }
        };
    }

    let config = match settings::load_config(matches, |k| std::env::var(k).ok())
        .and_then(|config| config.validate().map(|()| config))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return EXIT_CONFIG;
        }
    };

    let (Some(dataset_id), Some(zipfile_path)) = (
        matches.get_one::<i64>("dataset-id").copied(),
        matches.get_one::<PathBuf>("zipfile-path"),
    ) else {
        eprintln!("--dataset-id and --zipfile-path are required");
        return EXIT_CONFIG;
    };

    let Some(catalog_path) = config.catalog.as_deref() else {
        let err = ExportError::config("catalog not set (use --catalog, DSZIP_CATALOG or the config file)");
        eprintln!("{}", format_error(&err, mode));
        return EXIT_CONFIG;
    };

    let catalog = match SqliteCatalog::open(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Unable to open database: {}", e);
            eprintln!("{}", format_error(&ExportError::Catalog(e), mode));
            return EXIT_FAILED;
        }
    };

    let mut exporter = Exporter::new(&catalog, &config);
    let report = match exporter.export(DatasetId(dataset_id), zipfile_path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return EXIT_FAILED;
        }
    };

    if matches.get_flag("verify") {
        match ArchiveReader::entry_names(zipfile_path) {
            Ok(names) if names.len() as u64 == report.written => {
                info!(entries = names.len(), "Verified zipfile");
            }
            Ok(names) => {
                eprintln!(
                    "(error) zipfile has {} entries, expected {}",
                    names.len(),
                    report.written
                );
                return EXIT_FAILED;
            }
            Err(e) => {
                eprintln!("(error) unable to verify zipfile: {}", e);
                return EXIT_FAILED;
            }
        }
    }

    println!("{}", format_report(&report, mode).trim_end());
    0
}
