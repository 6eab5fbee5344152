use crate::model::{Amount, DonationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// The unique, immutable identity of a donation record.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationId(Uuid);

impl DonationId {
    /// Generates a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DonationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DonationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for DonationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Everything about a donation that can be changed after it is created.
///
/// `Default` produces the quick-add shell: empty text, a zero amount, `Cash` and the current time.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationFields {
    pub donor_name: String,
    pub amount: Amount,
    pub donation_category: String,
    pub donation_type: DonationType,
    pub date: DateTime<Utc>,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Default for DonationFields {
    fn default() -> Self {
        Self {
            donor_name: String::new(),
            amount: Amount::ZERO,
            donation_category: String::new(),
            donation_type: DonationType::default(),
            date: Utc::now(),
            phone: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
        }
    }
}

/// A committed donation record.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    id: DonationId,
    #[serde(flatten)]
    fields: DonationFields,
}

impl Donation {
    pub(crate) fn new(id: DonationId, fields: DonationFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> DonationId {
        self.id
    }

    pub fn fields(&self) -> &DonationFields {
        &self.fields
    }

    pub fn donor_name(&self) -> &str {
        &self.fields.donor_name
    }

    pub fn amount(&self) -> Amount {
        self.fields.amount
    }

    pub fn donation_category(&self) -> &str {
        &self.fields.donation_category
    }

    pub fn donation_type(&self) -> DonationType {
        self.fields.donation_type
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.fields.date
    }

    pub fn phone(&self) -> &str {
        &self.fields.phone
    }

    pub fn city(&self) -> &str {
        &self.fields.city
    }

    pub fn state(&self) -> &str {
        &self.fields.state
    }

    pub fn country(&self) -> &str {
        &self.fields.country
    }
}
