//! Types that represent the core data model: a `Donation` and the values it is made of.
mod amount;
mod donation;
mod donation_type;
mod draft;

pub use amount::{Amount, AmountError};
pub use donation::{Donation, DonationFields, DonationId};
pub use donation_type::DonationType;
pub use draft::Draft;
