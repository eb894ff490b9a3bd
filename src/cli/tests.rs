use super::*;
use clap::CommandFactory;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_build_config_levels() {
    assert_eq!(parse(&["conan-sync", "versions", "zlib"]).build_config().log_level, "warn");
    assert_eq!(parse(&["conan-sync", "--verbose", "versions", "zlib"]).build_config().log_level, "debug");

    let quiet = parse(&["conan-sync", "versions", "zlib", "--quiet"]).build_config();
    assert_eq!(quiet.log_level, "error");
    assert!(!quiet.show_progress());
}

#[test]
fn test_default_config_logs_warnings() {
    let config = CliConfig::new();
    assert_eq!(config.log_level, "warn");
    assert!(config.show_progress());
}

#[test]
fn test_config_subcommand_arguments() {
    let cli = parse(&[
        "conan-sync",
        "config",
        "add-registry",
        "corp",
        "https://conan.example.com",
        "--token",
        "s3cret",
        "--default",
    ]);
    assert!(matches!(cli.command, Commands::Config(_)));
    assert!(parse(&["conan-sync", "config"]).global.config.is_none());
}

#[tokio::test]
async fn test_config_runs_without_a_registry() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    let path_arg = path.to_str().unwrap();

    let cli = parse(&[
        "conan-sync",
        "-q",
        "--config",
        path_arg,
        "config",
        "add-registry",
        "corp",
        "https://conan.example.com",
    ]);
    let config = cli.build_config();
    cli.execute_with_config(config).await.unwrap();

    let saved = crate::config::SyncConfig::load_from(&path).await.unwrap();
    assert_eq!(saved.registry(None).unwrap().name, "corp");
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["conan-sync", "-v", "-q", "latest", "zlib"]).is_err());
}

#[test]
fn test_update_arguments() {
    let cli = parse(&[
        "conan-sync",
        "--project-dir",
        "/tmp/project",
        "--registry-url",
        "https://center2.conan.io",
        "update",
        "zlib",
        "--version",
        "1.3.1",
        "--dry-run",
        "--format",
        "json",
    ]);

    assert_eq!(cli.global.project_dir.as_deref(), Some(std::path::Path::new("/tmp/project")));
    assert_eq!(cli.global.registry_url.as_deref(), Some("https://center2.conan.io"));
    match cli.command {
        Commands::Update(cmd) => {
            assert_eq!(cmd.packages, ["zlib"]);
            assert_eq!(cmd.pin.as_deref(), Some("1.3.1"));
            assert!(cmd.dry_run);
            assert_eq!(cmd.format, OutputFormat::Json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_update_requires_a_package() {
    assert!(Cli::try_parse_from(["conan-sync", "update"]).is_err());
}

#[test]
fn test_revision_arguments() {
    let cli = parse(&["conan-sync", "revision", "zlib", "1.3.1", "--reference", "zlib/1.3.1@_/_"]);
    match cli.command {
        Commands::Revision(cmd) => {
            assert_eq!(cmd.pkg_version, "1.3.1");
            assert_eq!(cmd.reference.as_deref(), Some("zlib/1.3.1@_/_"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_update_status_json_names() {
    use update::UpdateStatus;

    let names: Vec<String> = [
        UpdateStatus::NotPublished,
        UpdateStatus::NotTracked,
        UpdateStatus::UpToDate,
        UpdateStatus::WouldUpdate,
        UpdateStatus::Updated,
    ]
    .iter()
    .map(|status| serde_json::to_string(status).unwrap())
    .collect();

    assert_eq!(
        names,
        ["\"not-published\"", "\"not-tracked\"", "\"up-to-date\"", "\"would-update\"", "\"updated\""]
    );
}
