//! Integration tests for CLI argument handling
//!
//! Tests flag validation from the command line. Anything that would start
//! the TUI is combined with `--help` or rejected before the terminal is set up.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pokedex"))
        .args(args)
        .env("POKEDEX_LOG", "off")
        .output()
        .expect("Failed to execute pokedex")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pokedex"), "Help should mention pokedex");
    assert!(stdout.contains("--offline"), "Help should mention --offline");
    assert!(stdout.contains("--type"), "Help should mention --type");
}

#[test]
fn test_invalid_page_size_prints_error_and_exits() {
    let output = run_cli(&["--page-size", "0"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid page size"),
        "Should print error message about page size: {}",
        stderr
    );
}

#[test]
fn test_invalid_log_level_prints_error_and_exits() {
    let output = run_cli(&["--log-level", "bogus"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid log level"), "{}", stderr);
}

#[test]
fn test_non_numeric_page_size_rejected_by_parser() {
    let output = run_cli(&["--page-size", "many"]);
    assert!(!output.status.success());
}

#[test]
fn test_filters_with_help_are_accepted() {
    let output = run_cli(&["--search", "char", "--type", "fire", "--offline", "--help"]);
    assert!(output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pokedex::cli::{Cli, CliError, StartupConfig};
    use pokedex::config::Config;

    #[test]
    fn test_cli_no_args_is_online_without_filters() {
        let cli = Cli::parse_from(["pokedex"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert!(!startup.force_offline);
        assert!(startup.initial_query.is_empty());
        assert!(startup.initial_category.is_none());
    }

    #[test]
    fn test_page_size_flows_into_config() {
        let cli = Cli::parse_from(["pokedex", "--page-size", "50"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();

        let mut config = Config::default();
        config.apply_startup(&startup);

        assert_eq!(config.page_limit, 50);
    }

    #[test]
    fn test_page_size_above_limit_is_rejected() {
        let cli = Cli::parse_from(["pokedex", "--page-size", "101"]);
        let result = StartupConfig::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidPageSize(101))));
    }

    #[test]
    fn test_type_is_lowercased() {
        let cli = Cli::parse_from(["pokedex", "--type", "WATER"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(startup.initial_category.as_deref(), Some("water"));
    }
}
