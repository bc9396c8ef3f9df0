//! Config resolution for the command line.
//!
//! Precedence, lowest first: config file, environment, flags.

use clap::ArgMatches;
use dszip_engine::{EngineResult, ExportConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

/// Build the export config from the config file, `lookup`-ed environment
/// variables and command line flags.
pub fn load_config<F>(matches: &ArgMatches, lookup: F) -> EngineResult<ExportConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExportConfig::from_file(path)?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            ExportConfig::from_file(Path::new(CONFIG_FILE_NAME))?
        }
        None => ExportConfig::default(),
    };

    config.apply_env(lookup);

    if let Some(root) = matches.get_one::<PathBuf>("storage-root") {
        config.storage_root = root.clone();
    }
    if let Some(catalog) = matches.get_one::<PathBuf>("catalog") {
        config.catalog = Some(catalog.clone());
    }
    if let Some(batch_size) = matches.get_one::<usize>("batch-size") {
        config.batch_size = *batch_size;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_flags_override_file_and_env() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dszip.toml");
        std::fs::write(
            &config_path,
            "storage_root = \"/from/file\"\ncatalog = \"/file.db\"\nbatch_size = 10\n",
        )
        .unwrap();

        let matches = build_cli()
            .try_get_matches_from([
                "dszip",
                "-d",
                "1",
                "-z",
                "out.zip",
                "--config",
                config_path.to_str().unwrap(),
                "--catalog",
                "/flag.db",
            ])
            .unwrap();

        let config = load_config(&matches, |k| {
            (k == "MCFS_DIR").then(|| "/from/env".to_string())
        })
        .unwrap();

        assert_eq!(config.storage_root, PathBuf::from("/from/env"));
        assert_eq!(config.catalog, Some(PathBuf::from("/flag.db")));
        assert_eq!(config.batch_size, 10);
    }

    #[test]
    fn test_storage_root_flag_wins() {
        let matches = build_cli()
            .try_get_matches_from([
                "dszip",
                "-d",
                "1",
                "-z",
                "out.zip",
                "--storage-root",
                "/flag/root",
                "--batch-size",
                "50",
            ])
            .unwrap();
        let config = load_config(&matches, |_| Some("/env/root".to_string())).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/flag/root"));
        assert_eq!(config.batch_size, 50);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let matches = build_cli()
            .try_get_matches_from([
                "dszip",
                "-d",
                "1",
                "-z",
                "out.zip",
                "--config",
                "/definitely/not/here.toml",
            ])
            .unwrap();
        assert!(load_config(&matches, no_env).is_err());
    }
}
