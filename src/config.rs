use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PROJECT_TRACKER_DATA_DIR";

const APP_DIR: &str = "project-tracker";
const USERS_FILE: &str = "users.json";
const PROJECTS_FILE: &str = "projects.json";

/// Where the store keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Config { data_dir: data_dir.into() }
    }

    /// Resolves the data directory.
    ///
    /// The path is determined in the following order:
    /// 1. The explicit `--data-dir` value, if any.
    /// 2. `PROJECT_TRACKER_DATA_DIR` environment variable.
    /// 3. `~/.local/share/project-tracker` (on Linux).
    /// 4. `./data` (fallback).
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let platform = dirs::data_local_dir().map(|p| p.join(APP_DIR));
        Config::new(pick_data_dir(explicit, env, platform))
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_FILE)
    }
}

fn pick_data_dir(
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    platform: Option<PathBuf>,
) -> PathBuf {
    explicit
        .or(env.filter(|p| !p.as_os_str().is_empty()))
        .or(platform)
        .unwrap_or_else(|| PathBuf::from("data"))
}
