//! The edit command.

use crate::args::EditArgs;
use crate::commands::Out;
use crate::editor::DonationEditor;
use crate::model::Donation;
use crate::{Config, Error, Result};
use tracing::debug;

/// Loads the donation, applies the given fields to an edit draft and saves it using the
/// `edit_validation` policy from the config. Fields that were not given keep their values.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Donation>> {
    let id = args.id();
    let donation = config.db().get(id).await?.ok_or(Error::NotFound(id))?;

    let mut editor = DonationEditor::new(donation, config.edit_validation());
    args.fields().apply(editor.edit());
    debug!(
        "Saving edits to donation {id} with {} validation",
        editor.policy()
    );
    let saved = editor.save(config.db()).await?.clone();

    Ok(Out::new(format!("Updated donation {id}"), saved))
}
