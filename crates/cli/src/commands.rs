//! Clap command definition.

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Build the CLI command.
pub fn build_cli() -> Command {
    Command::new("dszip")
        .about("Build the zip archive for a dataset from the file catalog")
        .arg(
            Arg::new("dataset-id")
                .short('d')
                .long("dataset-id")
                .help("Dataset ID to build zipfile for")
                .value_parser(value_parser!(i64))
                .required_unless_present("write-config"),
        )
        .arg(
            Arg::new("zipfile-path")
                .short('z')
                .long("zipfile-path")
                .help("Path to write zipfile to")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("write-config"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./dszip.toml when present)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .help("Write a commented default config file (if missing) and exit")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with_all(["dataset-id", "zipfile-path"]),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .help("Catalog database (overrides config and DSZIP_CATALOG)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("storage-root")
                .long("storage-root")
                .help("Content store root (overrides config and MCFS_DIR)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .help("Catalog records per page")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Re-open the finished archive and check its entry count")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the export report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_required_args() {
        assert!(build_cli().try_get_matches_from(["dszip"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["dszip", "-d", "1"])
            .is_err());

        let matches = build_cli()
            .try_get_matches_from(["dszip", "-d", "12", "-z", "/tmp/x.zip", "-vv"])
            .unwrap();
        assert_eq!(matches.get_one::<i64>("dataset-id"), Some(&12));
        assert_eq!(
            matches.get_one::<PathBuf>("zipfile-path"),
            Some(&PathBuf::from("/tmp/x.zip"))
        );
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(!matches.get_flag("verify"));
    }

    #[test]
    fn test_write_config_stands_alone() {
        let matches = build_cli()
            .try_get_matches_from(["dszip", "--write-config", "dszip.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("write-config"),
            Some(&PathBuf::from("dszip.toml"))
        );
        assert!(matches.get_one::<i64>("dataset-id").is_none());

        assert!(build_cli()
            .try_get_matches_from(["dszip", "--write-config", "c.toml", "-d", "1", "-z", "x.zip"])
            .is_err());
    }

    #[test]
    fn test_rejects_non_numeric_dataset() {
        assert!(build_cli()
            .try_get_matches_from(["dszip", "-d", "abc", "-z", "x.zip"])
            .is_err());
    }
}
