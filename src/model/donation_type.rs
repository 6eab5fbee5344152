use serde::{Deserialize, Serialize};

/// How a donation was given. The serialized labels are what gets stored in the database and what
/// the CLI accepts, e.g. `Credit Card`.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum DonationType {
    #[default]
    Cash,
    Product,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Zelle,
    Check,
}

serde_plain::derive_display_from_serialize!(DonationType);
serde_plain::derive_fromstr_from_deserialize!(DonationType);

impl DonationType {
    /// All donation types in the order they are offered to the user.
    pub const ALL: [DonationType; 5] = [
        DonationType::Cash,
        DonationType::Product,
        DonationType::CreditCard,
        DonationType::Zelle,
        DonationType::Check,
    ];
}
