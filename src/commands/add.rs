//! Commands that record new donations.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Donation;
use crate::validate::validate_for_create;
use crate::{Config, Result};

/// Validates the given fields and stores them as a new donation.
///
/// Nothing is written unless every field is present, the amount is a non-negative number and the
/// phone number is ten digits. When `--date` is not given the donation is dated now.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Donation>> {
    let draft = args.fields().to_draft();
    let fields = validate_for_create(&draft)?;
    let donation = config.db().create(&fields).await?;
    Ok(Out::new("Donation saved successfully!", donation))
}

/// Stores an empty donation dated now and prints its id so it can be filled in with `edit`.
pub async fn quick_add(config: Config) -> Result<Out<Donation>> {
    let donation = config.db().quick_add().await?;
    Ok(Out::new(
        format!("Added an empty donation with id {}", donation.id()),
        donation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::DraftArgs;
    use crate::model::DonationType;
    use crate::test::{test_date, TestEnv};
    use crate::validate::{Field, Reason};
    use crate::Error;

    fn john_doe() -> DraftArgs {
        DraftArgs {
            donor_name: Some("John Doe".to_string()),
            phone: Some("5555555555".to_string()),
            city: Some("New York".to_string()),
            state: Some("NY".to_string()),
            country: Some("USA".to_string()),
            donation_category: Some("Food".to_string()),
            donation_type: Some(DonationType::Cash),
            amount: Some("100.00".to_string()),
            date: Some(test_date(30)),
        }
    }

    #[tokio::test]
    async fn test_add_success() {
        let env = TestEnv::new().await;
        let out = add(env.config(), AddArgs::new(john_doe())).await.unwrap();
        assert_eq!(out.message(), "Donation saved successfully!");

        let created = out.structure().unwrap();
        assert_eq!(created.donor_name(), "John Doe");
        assert_eq!(created.amount().to_string(), "100.00");
        assert_eq!(created.date(), test_date(30));

        let stored = env.config().db().get(created.id()).await.unwrap().unwrap();
        assert_eq!(&stored, created);
    }

    #[tokio::test]
    async fn test_add_missing_donor_name_writes_nothing() {
        let env = TestEnv::new().await;
        let fields = DraftArgs {
            donor_name: None,
            ..john_doe()
        };
        let err = add(env.config(), AddArgs::new(fields)).await.unwrap_err();
        let Error::ValidationFailed(invalid) = &err else {
            panic!("expected a validation failure, got {err:?}");
        };
        assert!(invalid.contains(Reason::Required(Field::DonorName)));
        assert!(err
            .to_string()
            .starts_with("All fields are required and amount must be valid."));
        assert_eq!(env.config().db().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_bad_amount_and_phone() {
        let env = TestEnv::new().await;
        let fields = DraftArgs {
            amount: Some("abc".to_string()),
            phone: Some("555-1234".to_string()),
            ..john_doe()
        };
        let err = add(env.config(), AddArgs::new(fields)).await.unwrap_err();
        let Error::ValidationFailed(invalid) = err else {
            panic!("expected a validation failure");
        };
        assert!(invalid.contains(Reason::AmountNotANumber));
        assert!(invalid.contains(Reason::PhoneNotTenDigits));
        assert_eq!(env.config().db().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_quick_add() {
        let env = TestEnv::new().await;
        let out = quick_add(env.config()).await.unwrap();
        let created = out.structure().unwrap();
        assert!(out.message().contains(&created.id().to_string()));
        assert_eq!(created.donor_name(), "");
        assert!(created.amount().is_zero());
        assert_eq!(created.donation_type(), DonationType::Cash);
        assert_eq!(env.config().db().count().await.unwrap(), 1);
    }
}
