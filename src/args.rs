//! These structs provide the CLI interface for the donations CLI.

use crate::editor::EditValidation;
use crate::model::{DonationId, DonationType, Draft};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// donations: A command-line tool for recording donors and donations.
///
/// Donation records are kept in a local SQLite database inside the donations home directory.
/// Run `donations init` once to create it, then use `add` to record a donation, `list` to see
/// them newest first, and `edit` or `delete` to change them.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the donations home directory, its config file and an empty database.
    Init(InitArgs),
    /// Record a new donation. Every field is required, the amount must be a number and the phone
    /// number must be exactly 10 digits.
    Add(AddArgs),
    /// Record an empty donation dated now, to be filled in later with `edit`.
    QuickAdd,
    /// List all donations, most recent first.
    List,
    /// Show every field of one donation.
    Show(ShowArgs),
    /// Change the fields of an existing donation. Fields that are not given keep their value.
    Edit(EditArgs),
    /// Delete one or more donations. All of them are deleted together or none are.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where donation data and configuration is held. Defaults to ~/donations
    #[arg(long, env = "DONATIONS_HOME", default_value_t = default_donations_home())]
    donations_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, donations_home: PathBuf) -> Self {
        Self {
            log_level,
            donations_home: donations_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn donations_home(&self) -> &DisplayPath {
        &self.donations_home
    }
}

/// Args for the `donations init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// How `edit` treats bad input. `lenient` saves an unparseable amount as 0.00, `strict`
    /// rejects the edit using the same rules as `add`.
    #[arg(long, value_enum, default_value_t = EditValidation::Lenient)]
    edit_validation: EditValidation,
}

impl InitArgs {
    pub fn new(edit_validation: EditValidation) -> Self {
        Self { edit_validation }
    }

    pub fn edit_validation(&self) -> EditValidation {
        self.edit_validation
    }
}

/// The donation fields that can be given on the command line. All are optional so that `add` can
/// report every missing field at once and `edit` can change only some of them.
#[derive(Debug, Default, Parser, Clone)]
pub struct DraftArgs {
    /// The donor's name.
    #[arg(long)]
    pub donor_name: Option<String>,

    /// The donor's phone number, 10 digits.
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// What the donation is for, e.g. Food.
    #[arg(long = "category")]
    pub donation_category: Option<String>,

    /// One of: Cash, Product, "Credit Card", Zelle, Check
    #[arg(long = "type")]
    pub donation_type: Option<DonationType>,

    /// The amount, e.g. 100.00 or $1,000
    #[arg(long)]
    pub amount: Option<String>,

    /// The date of the donation as YYYY-MM-DD or an RFC 3339 timestamp. Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,
}

impl DraftArgs {
    /// Overwrites the fields of `draft` that were given on the command line.
    pub fn apply(&self, draft: &mut Draft) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        set(&mut draft.donor_name, &self.donor_name);
        set(&mut draft.phone, &self.phone);
        set(&mut draft.city, &self.city);
        set(&mut draft.state, &self.state);
        set(&mut draft.country, &self.country);
        set(&mut draft.donation_category, &self.donation_category);
        set(&mut draft.amount, &self.amount);
        if let Some(donation_type) = self.donation_type {
            draft.donation_type = donation_type;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
    }

    /// Builds a new draft from the given fields, leaving the others blank.
    pub fn to_draft(&self) -> Draft {
        let mut draft = Draft::default();
        self.apply(&mut draft);
        draft
    }
}

/// Args for the `donations add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[clap(flatten)]
    fields: DraftArgs,
}

impl AddArgs {
    pub fn new(fields: DraftArgs) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &DraftArgs {
        &self.fields
    }
}

/// Args for the `donations show` command.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// The id of the donation.
    id: DonationId,
}

impl ShowArgs {
    pub fn new(id: DonationId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> DonationId {
        self.id
    }
}

/// Args for the `donations edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the donation to change.
    id: DonationId,

    #[clap(flatten)]
    fields: DraftArgs,
}

impl EditArgs {
    pub fn new(id: DonationId, fields: DraftArgs) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> DonationId {
        self.id
    }

    pub fn fields(&self) -> &DraftArgs {
        &self.fields
    }
}

/// Args for the `donations delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ids of the donations to delete.
    #[arg(required = true, num_args = 1..)]
    ids: Vec<DonationId>,
}

impl DeleteArgs {
    pub fn new(ids: impl IntoIterator<Item = DonationId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn ids(&self) -> &[DonationId] {
        &self.ids
    }
}

/// Parses `YYYY-MM-DD` as midnight UTC on that day, or a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| format!("'{s}' is not a date, expected YYYY-MM-DD"))
}

fn default_donations_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("donations"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --donations-home or DONATIONS_HOME instead of relying on the \
                default directory.",
            );
            PathBuf::from("donations")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
