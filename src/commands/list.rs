//! Commands that read donations.

use crate::args::ShowArgs;
use crate::commands::{plural, Out};
use crate::model::{Donation, DonationId};
use crate::{Config, Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const UNKNOWN_DONOR: &str = "Unknown Donor";

/// One line of the donation list, already formatted for display.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DonationRow {
    pub id: DonationId,
    pub donor: String,
    pub amount: String,
    pub donation_type: String,
    pub date: String,
}

impl From<&Donation> for DonationRow {
    fn from(donation: &Donation) -> Self {
        let donor = if donation.donor_name().is_empty() {
            UNKNOWN_DONOR.to_string()
        } else {
            donation.donor_name().to_string()
        };
        Self {
            id: donation.id(),
            donor,
            amount: donation.amount().to_dollars(),
            donation_type: donation.donation_type().to_string(),
            date: display_date(donation.date()),
        }
    }
}

impl Display for DonationRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n  Amount: {}\n  Type: {}\n  Date: {}\n  Id: {}",
            self.donor, self.amount, self.donation_type, self.date, self.id
        )
    }
}

/// Lists every donation, most recent first.
pub async fn list(config: Config) -> Result<Out<Vec<DonationRow>>> {
    let donations = config.db().list().await?;
    if donations.is_empty() {
        return Ok(Out::new("No donations have been recorded", Vec::new()));
    }

    let rows: Vec<DonationRow> = donations.iter().map(DonationRow::from).collect();
    let mut message = format!("{} donation{}", rows.len(), plural(rows.len()));
    for row in &rows {
        message.push_str("\n\n");
        message.push_str(&row.to_string());
    }
    Ok(Out::new(message, rows))
}

/// Shows every field of the donation with the given id.
pub async fn show(config: Config, args: ShowArgs) -> Result<Out<Donation>> {
    let id = args.id();
    let donation = config.db().get(id).await?.ok_or(Error::NotFound(id))?;
    let message = format!(
        "Donor: {}\nPhone: {}\nCity: {}\nState: {}\nCountry: {}\nCategory: {}\nType: {}\n\
        Amount: {}\nDate: {}\nId: {}",
        donation.donor_name(),
        donation.phone(),
        donation.city(),
        donation.state(),
        donation.country(),
        donation.donation_category(),
        donation.donation_type(),
        donation.amount().to_dollars(),
        display_date(donation.date()),
        donation.id(),
    );
    Ok(Out::new(message, donation))
}

/// Formats a date like `Aug 30, 2024`.
fn display_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
