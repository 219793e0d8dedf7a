//! Configuration loading and precedence tests

use fig_config::{ConfigError, ConfigLoader, GlobalConfig, Overrides, ProjectConfig};
use rstest::rstest;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

struct Fixture {
    temp_dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn global(&self, content: &str) {
        write_file(&self.root().join("home/.fig/config.toml"), content);
    }

    fn project(&self, dir: &str, content: &str) -> PathBuf {
        write_file(&self.root().join(dir).join("fig.toml"), content)
    }

    fn loader(&self) -> ConfigLoader {
        ConfigLoader::with_global_config_path(self.root().join("home/.fig/config.toml"))
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_when_no_config_exists() {
    let fixture = Fixture::new();
    let config = fixture.loader().load_from_directory(fixture.root()).unwrap();

    assert!(!config.is_project());
    assert_eq!(config.log_filter(), None);
    assert!(!config.json_output());
}

#[test]
#[serial]
fn test_load_from_subdirectory_finds_parent() {
    let fixture = Fixture::new();
    fixture.project("work", "[log]\nlevel = \"debug\"\n");
    let nested = fixture.root().join("work/a/b");
    fs::create_dir_all(&nested).unwrap();

    let config = fixture.loader().load_from_directory(&nested).unwrap();

    assert_eq!(config.project_root(), Some(fixture.root().join("work").as_path()));
    assert_eq!(config.log_filter(), Some("debug"));
}

#[test]
#[serial]
fn test_nearest_project_file_wins() {
    let fixture = Fixture::new();
    fixture.project("outer", "[log]\nlevel = \"warn\"\n");
    fixture.project("outer/inner", "[log]\nlevel = \"trace\"\n");

    let config = fixture
        .loader()
        .load_from_directory(&fixture.root().join("outer/inner"))
        .unwrap();

    assert_eq!(config.log_filter(), Some("trace"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
#[serial]
fn test_project_overrides_global() {
    let fixture = Fixture::new();
    fixture.global("[repository]\npath = \"global-repo\"\n\n[output]\njson = true\n");
    fixture.project("proj", "[repository]\npath = \"local-repo\"\n");

    let config = fixture
        .loader()
        .load_from_directory(&fixture.root().join("proj"))
        .unwrap();

    assert_eq!(
        config.repository_path().unwrap(),
        fixture.root().join("proj/local-repo")
    );
    assert!(config.json_output());
}

#[test]
#[serial]
fn test_global_repository_is_relative_to_global_dir() {
    let fixture = Fixture::new();
    fixture.global("[repository]\npath = \"shared\"\n");

    let config = fixture.loader().load_from_directory(fixture.root()).unwrap();

    assert_eq!(
        config.repository_path().unwrap(),
        fixture.root().join("home/.fig/shared")
    );
}

#[test]
#[serial]
fn test_absolute_paths_are_kept() {
    let fixture = Fixture::new();
    let absolute = fixture.root().join("elsewhere");
    fixture.project(
        "proj",
        &format!("[repository]\npath = {:?}\n", absolute.display().to_string()),
    );

    let config = fixture
        .loader()
        .load_from_directory(&fixture.root().join("proj"))
        .unwrap();

    assert_eq!(config.repository_path().unwrap(), absolute);
}

#[test]
#[serial]
fn test_full_precedence_chain() {
    let fixture = Fixture::new();
    fixture.global("[log]\nlevel = \"error\"\n");
    fixture.project("proj", "[log]\nlevel = \"warn\"\n");

    std::env::set_var("FIG_LOG", "info");
    let mut config = fixture
        .loader()
        .load_from_directory(&fixture.root().join("proj"))
        .unwrap();
    std::env::remove_var("FIG_LOG");
    assert_eq!(config.log_filter(), Some("info"));

    config.apply_overrides(Overrides {
        log: Some("debug".to_string()),
        ..Default::default()
    });
    assert_eq!(config.log_filter(), Some("debug"));
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    let fixture = Fixture::new();
    fixture.project("proj", "[repository]\npath = \"repo\"\n");

    std::env::set_var("FIG_REPOSITORY", "");
    let config = fixture
        .loader()
        .load_from_directory(&fixture.root().join("proj"))
        .unwrap();
    std::env::remove_var("FIG_REPOSITORY");

    assert_eq!(config.repository_path().unwrap(), fixture.root().join("proj/repo"));
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case::unknown_section("[package]\nname = \"x\"\n")]
#[case::unknown_field("[repository]\nurl = \"x\"\n")]
#[case::wrong_type("[output]\njson = \"yes\"\n")]
#[serial]
fn test_malformed_project_config(#[case] content: &str) {
    let fixture = Fixture::new();
    let path = fixture.project("proj", content);

    let err = fixture
        .loader()
        .load_from_directory(&fixture.root().join("proj"))
        .unwrap_err();

    assert!(matches!(err, ConfigError::TomlParseError { ref file, .. } if file == &path));
}

#[test]
#[serial]
fn test_invalid_global_config_is_an_error() {
    let fixture = Fixture::new();
    fixture.global("[log]\nlevel = \"loud\"\n");

    let err = fixture.loader().load_from_directory(fixture.root()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"Invalid value for 'log.level': must be 'trace', 'debug', 'info', 'warn' or 'error', got 'loud'"
    );
}

#[test]
fn test_round_trip_through_toml() {
    let config: ProjectConfig = toml::from_str(
        "[repository]\npath = \"repo\"\n\n[log]\nlevel = \"info\"\n\n[output]\njson = true\n",
    )
    .unwrap();
    let text = toml::to_string(&config).unwrap();
    assert_eq!(toml::from_str::<ProjectConfig>(&text).unwrap(), config);

    let global: GlobalConfig = toml::from_str(&text).unwrap();
    assert_eq!(global.log_level(), Some("info"));
    assert_eq!(global.json_output(), Some(true));
}
