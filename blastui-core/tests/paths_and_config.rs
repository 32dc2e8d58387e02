//! Directory resolution from `BLASTUI_*` variables and config files on disk.
//!
//! Paths are cached for the life of the process, so every test here points
//! the variables at the same directory before the first lookup.

use blastui_core::{
    blastui_databases_dir, blastui_home, blastui_tools_dir, blastui_workspace_dir, config_path,
    load_config, load_config_or_default, save_config, BlastUiError, Config,
};
use serial_test::serial;
use std::path::PathBuf;
use std::sync::OnceLock;

fn fixed_home() -> &'static PathBuf {
    static HOME: OnceLock<PathBuf> = OnceLock::new();
    HOME.get_or_init(|| {
        let home = std::env::temp_dir().join(format!("blastui-paths-{}", std::process::id()));
        std::fs::create_dir_all(&home).unwrap();
        std::env::set_var("BLASTUI_HOME", &home);
        std::env::remove_var("BLASTUI_DATABASES_DIR");
        std::env::remove_var("BLASTUI_TOOLS_DIR");
        std::env::set_var("BLASTUI_WORKSPACE_DIR", home.join("scratch"));
        home
    })
}

#[test]
#[serial]
fn test_directories_follow_home() {
    let home = fixed_home();

    assert_eq!(&blastui_home(), home);
    assert_eq!(blastui_databases_dir(), home.join("databases"));
    assert_eq!(blastui_tools_dir(), home.join("tools"));
    assert_eq!(blastui_workspace_dir(), home.join("scratch"));
    assert_eq!(config_path(), home.join("config.toml"));
}

#[test]
#[serial]
fn test_config_file_under_home() {
    let home = fixed_home();
    let path = config_path();
    let _ = std::fs::remove_file(&path);

    let config = load_config_or_default(&path).unwrap();
    assert_eq!(config.export.default_format, "xlsx");

    let mut config = Config::default();
    config.blast.threads = 4;
    config.database.database_dir = Some(home.join("dbs").display().to_string());
    save_config(&path, &config).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.blast.threads, 4);
    assert_eq!(loaded.blast.timeout_secs, 3600);
    assert_eq!(
        loaded.database.database_dir.as_deref(),
        Some(home.join("dbs").display().to_string().as_str())
    );

    std::fs::write(&path, "[blast]\nthreads = \"many\"\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, BlastUiError::Configuration(_)));

    std::fs::remove_file(&path).unwrap();
}
