//! The view/edit state machine for a single committed donation.

use crate::db::Db;
use crate::model::{Donation, Draft};
use crate::validate::{fields_lenient, validate_for_create};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How strictly the editor checks a draft before saving it.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EditValidation {
    /// Save whatever was typed. An amount that does not parse is saved as `0.00`.
    #[default]
    Lenient,
    /// Apply the same rules as when a donation is first authored.
    Strict,
}

serde_plain::derive_display_from_serialize!(EditValidation);
serde_plain::derive_fromstr_from_deserialize!(EditValidation);

/// Holds one committed donation and, while editing, a draft copied from it.
#[derive(Debug, Clone)]
pub struct DonationEditor {
    donation: Donation,
    /// `Some` while editing.
    draft: Option<Draft>,
    policy: EditValidation,
}

impl DonationEditor {
    /// Starts out viewing `donation`.
    pub fn new(donation: Donation, policy: EditValidation) -> Self {
        Self {
            donation,
            draft: None,
            policy,
        }
    }

    /// The committed record. While editing, this does not reflect the draft.
    pub fn donation(&self) -> &Donation {
        &self.donation
    }

    pub fn policy(&self) -> EditValidation {
        self.policy
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Switches to editing and returns the draft. If already editing, the existing draft is kept.
    pub fn edit(&mut self) -> &mut Draft {
        let donation = &self.donation;
        self.draft.get_or_insert_with(|| Draft::from(donation))
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    /// Throws away the draft and goes back to viewing. Nothing is written.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Writes the draft over the committed record and goes back to viewing.
    ///
    /// When not editing there is nothing to save and the committed record is returned unchanged.
    /// On any error the editor stays in editing mode with the draft untouched.
    pub async fn save(&mut self, db: &Db) -> Result<&Donation> {
        let Some(draft) = &self.draft else {
            return Ok(&self.donation);
        };

        let fields = match self.policy {
            EditValidation::Lenient => fields_lenient(draft),
            EditValidation::Strict => validate_for_create(draft)?,
        };

        let updated = db.update(self.donation.id(), &fields).await?;
        debug!("Saved edits to donation {}", updated.id());
        self.donation = updated;
        self.draft = None;
        Ok(&self.donation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DonationFields, DonationType};
    use crate::Error;
    use std::str::FromStr;

    async fn stored_donation(db: &Db) -> Donation {
        let fields = DonationFields {
            donor_name: "John Doe".to_string(),
            amount: crate::model::Amount::from_str("100.00").unwrap(),
            donation_category: "Food".to_string(),
            donation_type: DonationType::Cash,
            phone: "5555555555".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            country: "USA".to_string(),
            ..Default::default()
        };
        db.create(&fields).await.unwrap()
    }

    #[tokio::test]
    async fn test_edit_copies_committed_values() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);
        assert!(!editor.is_editing());
        assert!(editor.draft().is_none());

        let draft = editor.edit();
        assert_eq!(draft.donor_name, "John Doe");
        assert_eq!(draft.amount, "100.00");
        assert!(editor.is_editing());
    }

    #[tokio::test]
    async fn test_edit_twice_keeps_draft() {
        let db = Db::in_memory().await.unwrap();
        let mut editor = DonationEditor::new(stored_donation(&db).await, EditValidation::Lenient);
        editor.edit().city = "Boston".to_string();
        assert_eq!(editor.edit().city, "Boston");
    }

    #[tokio::test]
    async fn test_save_commits_and_returns_to_viewing() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);

        let draft = editor.edit();
        draft.donor_name = "Jane Roe".to_string();
        draft.donation_type = DonationType::Zelle;
        draft.amount = "250".to_string();

        let saved = editor.save(&db).await.unwrap().clone();
        assert!(!editor.is_editing());
        assert_eq!(saved.id(), donation.id());
        assert_eq!(saved.donor_name(), "Jane Roe");
        assert_eq!(saved.amount().to_string(), "250.00");

        let stored = db.get(donation.id()).await.unwrap().unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored.donation_type(), DonationType::Zelle);
    }

    #[tokio::test]
    async fn test_lenient_save_coerces_bad_amount_to_zero() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);

        editor.edit().amount = "not-a-number".to_string();
        editor.save(&db).await.unwrap();

        let stored = db.get(donation.id()).await.unwrap().unwrap();
        assert!(stored.amount().is_zero());
        assert_eq!(stored.amount().to_string(), "0.00");
    }

    #[tokio::test]
    async fn test_strict_save_rejects_bad_amount_and_keeps_draft() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Strict);

        editor.edit().amount = "not-a-number".to_string();
        let err = editor.save(&db).await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
        assert!(editor.is_editing());
        assert_eq!(editor.draft().unwrap().amount, "not-a-number");

        let stored = db.get(donation.id()).await.unwrap().unwrap();
        assert_eq!(stored, donation);
    }

    #[tokio::test]
    async fn test_cancel_discards_draft() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);

        editor.edit().donor_name = "Someone Else".to_string();
        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(editor.donation(), &donation);
        assert_eq!(editor.edit().donor_name, "John Doe");

        let stored = db.get(donation.id()).await.unwrap().unwrap();
        assert_eq!(stored, donation);
    }

    #[tokio::test]
    async fn test_save_while_viewing_is_a_no_op() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut changes = db.subscribe();
        changes.borrow_and_update();

        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);
        let saved = editor.save(&db).await.unwrap();
        assert_eq!(saved, &donation);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_save_of_deleted_record_is_not_found() {
        let db = Db::in_memory().await.unwrap();
        let donation = stored_donation(&db).await;
        let mut editor = DonationEditor::new(donation.clone(), EditValidation::Lenient);
        db.delete(&[donation.id()]).await.unwrap();

        editor.edit().city = "Boston".to_string();
        let err = editor.save(&db).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == donation.id()));
        assert!(editor.is_editing());
    }

    #[test]
    fn test_edit_validation_labels() {
        assert_eq!(EditValidation::default(), EditValidation::Lenient);
        assert_eq!(EditValidation::Strict.to_string(), "strict");
        assert_eq!(
            EditValidation::from_str("lenient").unwrap(),
            EditValidation::Lenient
        );
    }
}
