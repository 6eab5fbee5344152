//! Configuration file handling.
//!
//! The configuration file is stored at `$DONATIONS_HOME/config.json` and the donation records at
//! `$DONATIONS_HOME/donations.sqlite`.

use crate::db::Db;
use crate::editor::EditValidation;
use crate::error::IntoResult;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "donations";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DONATIONS_SQLITE: &str = "donations.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$DONATIONS_HOME` and from there it loads `$DONATIONS_HOME/config.json` and opens
/// the database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the home directory (if needed), an initial `config.json` and a new, empty database.
    ///
    /// # Errors
    /// - Returns an error if a config file or database already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, edit_validation: EditValidation) -> Result<Self> {
        let maybe_relative = dir.into();
        let (root, config_path, config_file) = create_home(&maybe_relative, edit_validation)
            .await
            .config_result()?;

        let sqlite_path = root.join(DONATIONS_SQLITE);
        let db = Db::init(&sqlite_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `donations_home` exists and that the config file exists
    /// - load the config file
    /// - open the database, bringing its schema up to date
    pub async fn load(donations_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = donations_home.into();
        let (root, config_path, config_file) = load_home(&maybe_relative).await.config_result()?;

        let sqlite_path = root.join(DONATIONS_SQLITE);
        let db = Db::load(&sqlite_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn edit_validation(&self) -> EditValidation {
        self.config_file.edit_validation
    }
}

async fn create_home(
    maybe_relative: &Path,
    edit_validation: EditValidation,
) -> anyhow::Result<(PathBuf, PathBuf, ConfigFile)> {
    utils::make_dir(maybe_relative)
        .await
        .context("Unable to create the donations home directory")?;
    let root = utils::canonicalize(maybe_relative).await?;

    let config_path = root.join(CONFIG_JSON);
    if config_path.exists() {
        bail!(
            "A config file already exists at '{}'",
            config_path.display()
        );
    }

    let config_file = ConfigFile {
        edit_validation,
        ..ConfigFile::default()
    };
    config_file.save(&config_path).await?;
    Ok((root, config_path, config_file))
}

async fn load_home(maybe_relative: &Path) -> anyhow::Result<(PathBuf, PathBuf, ConfigFile)> {
    let root = utils::canonicalize(maybe_relative)
        .await
        .context("Donations home is missing. Run `donations init` first")?;

    let config_path = root.join(CONFIG_JSON);
    if !config_path.is_file() {
        bail!("The config file is missing '{}'", config_path.display())
    }
    let config_file = ConfigFile::load(&config_path).await?;
    Ok((root, config_path, config_file))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "donations",
///   "config_version": 1,
///   "edit_validation": "lenient"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "donations"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Whether edits are saved leniently or checked like new donations. Defaults to lenient.
    #[serde(default)]
    edit_validation: EditValidation,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            edit_validation: EditValidation::default(),
        }
    }
}

impl ConfigFile {
    async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than the supported version {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
