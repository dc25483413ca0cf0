//! Recipient records and the source port.

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, DeliveryError};

/// One addressable target of a campaign step.
///
/// Rows come from an unschemed table; these three columns are the only
/// ones required. The serde names match the source table headers.
/// Recipients have no identity beyond their email address and are not
/// deduplicated across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "NOME")]
    pub name: String,

    #[serde(rename = "EMPRESA")]
    pub company: String,

    #[serde(rename = "EMAIL")]
    pub email: String,
}

/// Produces the ordered recipient list for one run.
///
/// The outer error means the source itself could not be read (fatal to
/// the run). Inner errors are rows missing a required column; they are
/// scoped to that single row and the dispatch loop keeps going.
pub trait RecipientSource: Send + Sync {
    fn load(&self) -> Result<Vec<Result<Recipient, DeliveryError>>, CadenceError>;
}
