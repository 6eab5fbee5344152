//! Rules for turning a `Draft` into `DonationFields`.
//!
//! There are two paths. The authoring path (`validate_for_create`) rejects a draft unless every
//! field is filled in, the amount is a non-negative decimal and the phone number is ten digits.
//! The lenient edit path (`fields_lenient`) never rejects anything: an unusable amount becomes
//! zero. Which one the editor uses is decided by `EditValidation` in the config.

use crate::model::{Amount, DonationFields, DonationType, Draft};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The message shown for any failed authoring validation.
pub const INVALID_MESSAGE: &str = "All fields are required and amount must be valid.";

const PHONE_DIGITS: usize = 10;

/// The draft fields that validation can complain about.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DonorName,
    Phone,
    City,
    State,
    Country,
    DonationCategory,
    Amount,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::DonorName => "donor name",
            Field::Phone => "phone",
            Field::City => "city",
            Field::State => "state",
            Field::Country => "country",
            Field::DonationCategory => "donation category",
            Field::Amount => "amount",
        };
        f.write_str(s)
    }
}

/// A single reason a draft was rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "field")]
pub enum Reason {
    Required(Field),
    AmountNotANumber,
    AmountNegative,
    PhoneNotTenDigits,
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Required(field) => write!(f, "{field} is required"),
            Reason::AmountNotANumber => f.write_str("amount must be a decimal number"),
            Reason::AmountNegative => f.write_str("amount must not be negative"),
            Reason::PhoneNotTenDigits => write!(f, "phone must be exactly {PHONE_DIGITS} digits"),
        }
    }
}

/// The outcome of a failed validation. Holds every reason found, in field order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Invalid {
    reasons: Vec<Reason>,
}

impl Invalid {
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    pub fn contains(&self, reason: Reason) -> bool {
        self.reasons.contains(&reason)
    }
}

impl Display for Invalid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(INVALID_MESSAGE)?;
        if !self.reasons.is_empty() {
            let details: Vec<String> = self.reasons.iter().map(|r| r.to_string()).collect();
            write!(f, " ({})", details.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for Invalid {}

/// Checks a draft against the authoring rules. Every check runs, so the returned `Invalid` lists
/// all problems at once.
pub fn validate_for_create(draft: &Draft) -> Result<DonationFields, Invalid> {
    let phone = normalize_phone(&draft.phone);
    let mut reasons = Vec::new();

    let required = [
        (Field::DonorName, draft.donor_name.as_str()),
        (Field::Phone, phone.as_str()),
        (Field::City, draft.city.as_str()),
        (Field::State, draft.state.as_str()),
        (Field::Country, draft.country.as_str()),
        (Field::DonationCategory, draft.donation_category.as_str()),
        (Field::Amount, draft.amount.as_str()),
    ];
    // Presence only: a value of nothing but spaces counts as filled in.
    for (field, value) in required {
        if value.is_empty() {
            reasons.push(Reason::Required(field));
        }
    }

    let amount = if draft.amount.is_empty() {
        None
    } else {
        match Amount::from_str(&draft.amount) {
            Ok(amount) if amount.is_negative() => {
                reasons.push(Reason::AmountNegative);
                None
            }
            Ok(amount) => Some(amount),
            Err(_) => {
                reasons.push(Reason::AmountNotANumber);
                None
            }
        }
    };

    if !phone.is_empty() && !is_valid_phone(&phone) {
        reasons.push(Reason::PhoneNotTenDigits);
    }

    match amount {
        Some(amount) if reasons.is_empty() => Ok(DonationFields {
            donor_name: draft.donor_name.clone(),
            amount,
            donation_category: draft.donation_category.clone(),
            donation_type: draft.donation_type,
            date: draft.date,
            phone,
            city: draft.city.clone(),
            state: draft.state.clone(),
            country: draft.country.clone(),
        }),
        _ => Err(Invalid { reasons }),
    }
}

/// Converts a draft without rejecting it. Text is copied as-is and an amount that is not a valid
/// non-negative decimal becomes `0.00`.
pub fn fields_lenient(draft: &Draft) -> DonationFields {
    DonationFields {
        donor_name: draft.donor_name.clone(),
        amount: parse_amount_lenient(&draft.amount),
        donation_category: draft.donation_category.clone(),
        donation_type: draft.donation_type,
        date: draft.date,
        phone: normalize_phone(&draft.phone),
        city: draft.city.clone(),
        state: draft.state.clone(),
        country: draft.country.clone(),
    }
}

/// Hook for phone number formatting. Currently returns the input unchanged.
pub fn normalize_phone(input: &str) -> String {
    input.to_string()
}

/// Maps a stored or user-supplied label to a `DonationType`. Anything that is not one of the five
/// exact labels decodes as `Cash` so that older or hand-edited data always loads.
pub fn parse_donation_type(raw: &str) -> DonationType {
    DonationType::from_str(raw).unwrap_or_default()
}

/// Parses an amount on the edit path, where bad input is coerced to zero instead of rejected.
pub fn parse_amount_lenient(raw: &str) -> Amount {
    match Amount::from_str(raw) {
        Ok(amount) if !amount.is_negative() => amount,
        _ => Amount::ZERO,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}
