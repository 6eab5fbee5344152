use crate::model::{Donation, DonationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The uncommitted, in-progress values of a donation while it is being authored or edited.
///
/// Free-text inputs, including the amount, are held exactly as typed. Turning a draft into
/// `DonationFields` is the job of the `validate` module.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Draft {
    pub donor_name: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub donation_category: String,
    pub donation_type: DonationType,
    pub amount: String,
    pub date: DateTime<Utc>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            donor_name: String::new(),
            phone: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            donation_category: String::new(),
            donation_type: DonationType::default(),
            amount: String::new(),
            date: Utc::now(),
        }
    }
}

impl From<&Donation> for Draft {
    fn from(donation: &Donation) -> Self {
        let fields = donation.fields();
        Self {
            donor_name: fields.donor_name.clone(),
            phone: fields.phone.clone(),
            city: fields.city.clone(),
            state: fields.state.clone(),
            country: fields.country.clone(),
            donation_category: fields.donation_category.clone(),
            donation_type: fields.donation_type,
            amount: fields.amount.to_string(),
            date: fields.date,
        }
    }
}
