use crate::commands::Out;
use crate::editor::EditValidation;
use crate::{Config, Result};
use std::path::Path;

/// Creates the donations home directory with:
/// - an initial `config.json` recording `edit_validation`
/// - an empty `donations.sqlite` with the current schema
///
/// # Arguments
/// - `donations_home` - The directory that will hold the data, e.g. `$HOME/donations`
/// - `edit_validation` - Whether `edit` saves leniently or applies the rules used by `add`.
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(donations_home: &Path, edit_validation: EditValidation) -> Result<Out<()>> {
    let config = Config::create(donations_home, edit_validation).await?;
    config.db().close().await;
    Ok(format!(
        "Successfully created the donations directory at {}",
        config.root().display()
    )
    .into())
}
