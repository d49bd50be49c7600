use anyhow::bail;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const USERNAME_VAR: &str = "LEGENDAS_DIVX_USERNAME";
pub const PASSWORD_VAR: &str = "LEGENDAS_DIVX_PASSWORD";

const DEFAULT_JOBS: usize = 4;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    username: Option<String>,
    password: Option<String>,
    jobs: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub jobs: usize,
}

pub fn load() -> Result<Config> {
    let file = read_config_file()?;
    resolve(
        env::var(USERNAME_VAR).ok(),
        env::var(PASSWORD_VAR).ok(),
        file,
    )
}

fn resolve(
    env_username: Option<String>,
    env_password: Option<String>,
    file: ConfigFile,
) -> Result<Config> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let username = non_empty(env_username).or(non_empty(file.username));
    let password = non_empty(env_password).or(non_empty(file.password));

    let (Some(username), Some(password)) = (username, password) else {
        bail!(
            "Username or password not set. Set {USERNAME_VAR} and {PASSWORD_VAR} or create config file at {} with username = \"...\" and password = \"...\"",
            get_config_path().display()
        )
    };

    Ok(Config {
        credentials: Credentials { username, password },
        jobs: file.jobs.filter(|j| *j > 0).unwrap_or(DEFAULT_JOBS),
    })
}

fn read_config_file() -> Result<ConfigFile> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return Ok(ConfigFile::default());
    }
    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    toml::from_str(&config_content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))
}

/// `DEBUG=1` behaves like `--verbose`.
pub fn debug_requested() -> bool {
    env::var("DEBUG").is_ok_and(|v| v == "1")
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("legendas-divx"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
