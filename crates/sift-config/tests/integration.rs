//! Integration tests for sift-config.
//!
//! Exercises the loading pipeline end to end: discovery -> parse -> merge -> validate.

#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use sift_config::{
    BoundSide, CONFIG_FILENAME, Config, ConfigError, ConfigWarning, RuleKind, ValueFormat,
    discover_config_files, is_global_config,
};

/// Temporary directory tree for a single test.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a `.sift.toml` into `rel_dir` and returns its path.
    fn create_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let path = self.create_dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn discovery_ignores_global_when_root_found() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n");
    let project = env.create_dir("a/b");

    let files = discover_config_files(&project);
    assert_eq!(files.len(), 1);
    assert!(!files.iter().any(|p| is_global_config(p)));
}

#[test]
fn nested_configs_merge_with_closest_winning() {
    let env = TestEnv::new();
    env.create_config(
        "",
        r#"root = true

[settings]
max_depth = 32
builtin_keys = false

[keys.author]
rule = "term"
field = "author"

[keys.stars]
rule = "range"
field = "stargazers"
bound = "lower"
value = "integer"
"#,
    );
    env.create_config(
        "project",
        r#"
[settings]
max_depth = 8

[keys.author]
rule = "term"
field = "author.login"
"#,
    );
    let cwd = env.create_dir("project/src");

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.files.len(), 2);
    assert_eq!(config.config_root, Some(env.path().join("project")));
    assert_eq!(config.settings.max_depth, 8);
    assert!(!config.settings.builtin_keys);

    let author = &config.keys["author"];
    assert_eq!(author.rule, RuleKind::Term);
    assert_eq!(author.field, "author.login");

    let stars = &config.keys["stars"];
    assert_eq!(stars.rule, RuleKind::Range);
    assert_eq!(stars.bound, Some(BoundSide::Lower));
    assert_eq!(stars.value, ValueFormat::Integer);
    assert!(config.validate().is_empty());
}

#[test]
fn invalid_key_reports_its_file() {
    let env = TestEnv::new();
    let path = env.create_config(
        "",
        "root = true\n[keys.around]\nrule = \"range\"\nfield = \"createdAt\"\n",
    );

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::InvalidKey { path: p, key, .. } => {
            assert_eq!(p, path);
            assert_eq!(key, "around");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn max_depth_must_stay_within_nesting_ceiling() {
    for value in [0, 100_000_000] {
        let env = TestEnv::new();
        let content = format!("root = true\n[settings]\nmax_depth = {value}\n");
        let path = env.create_config("", &content);

        let err = Config::load(env.path()).unwrap_err();
        match &err {
            ConfigError::InvalidSetting { path: p, setting, .. } => {
                assert_eq!(p, &path);
                assert_eq!(*setting, "max_depth");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(&format!("got {value}")));
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n[keys.x\n");
    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
    assert!(err.to_string().contains(CONFIG_FILENAME));
}

#[test]
fn validation_warnings_surface_after_load() {
    let env = TestEnv::new();
    env.create_config(
        "",
        "root = true\n[keys.repo2]\nrule = \"term\"\nfield = \"repo\"\n",
    );
    let config = Config::load(env.path()).unwrap();
    assert_eq!(
        config.validate(),
        vec![ConfigWarning::KeyNotQueryable {
            key: "repo2".into()
        }]
    );
}
