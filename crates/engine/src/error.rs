//! The module contains the errors the split engine can return.
//!
//! Every variant is a local validation failure: the engine never returns a
//! partially computed split. Variants carry the offending values so callers
//! can render a precise message, and [`EngineError::code`] gives a stable
//! identifier for API clients.
//!
//! The most common ones are:
//!
//! - [`AmountMismatch`] when exact amounts do not add up to the total.
//! - [`PercentageSum`] when percentages do not add up to 100.
//! - [`DuplicateParticipant`] when an id appears twice in one request.
//!
//!  [`AmountMismatch`]: EngineError::AmountMismatch
//!  [`PercentageSum`]: EngineError::PercentageSum
//!  [`DuplicateParticipant`]: EngineError::DuplicateParticipant
use thiserror::Error;

use crate::{Money, Percentage, SplitType, Weight};

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("At least one participant is required")]
    EmptyParticipants,
    #[error("Participant \"{participant_id}\" appears more than once")]
    DuplicateParticipant { participant_id: String },
    #[error("Amount must be a whole number of minor units, got {value}")]
    FractionalAmount { value: String },
    #[error("Expense total must not be negative, got {total}")]
    NegativeTotal { total: Money },
    #[error("Share for participant \"{participant_id}\" must not be negative, got {share}")]
    NegativeShare { participant_id: String, share: Money },
    #[error("Participant shares ({sum}) do not sum to expense total ({total})")]
    AmountMismatch { sum: Money, total: Money },
    #[error("Participant percentages ({sum}%) do not sum to 100%")]
    PercentageSum { sum: Percentage },
    #[error(
        "Percentage for participant \"{participant_id}\" must be between 0 and 100, got {percentage}%"
    )]
    PercentageOutOfRange {
        participant_id: String,
        percentage: Percentage,
    },
    #[error("Weight for participant \"{participant_id}\" must be positive, got {weight}")]
    NonPositiveWeight { participant_id: String, weight: Weight },
    #[error("Participant \"{participant_id}\" has no share value for a {split_type} split")]
    MissingShareValue {
        participant_id: String,
        split_type: SplitType,
    },
    #[error("Unknown split type \"{0}\"")]
    UnknownSplitType(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Invalid {field}: {reason}")]
    InvalidNumber { field: String, reason: String },
    #[error("Amount overflow while {0}")]
    Overflow(&'static str),
}

impl EngineError {
    /// Stable, machine-readable identifier of the violated invariant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyParticipants => "empty_participants",
            Self::DuplicateParticipant { .. } => "duplicate_participant",
            Self::FractionalAmount { .. } => "fractional_amount",
            Self::NegativeTotal { .. } => "negative_total",
            Self::NegativeShare { .. } => "negative_share",
            Self::AmountMismatch { .. } => "amount_mismatch",
            Self::PercentageSum { .. } => "percentage_sum",
            Self::PercentageOutOfRange { .. } => "percentage_out_of_range",
            Self::NonPositiveWeight { .. } => "non_positive_weight",
            Self::MissingShareValue { .. } => "missing_share_value",
            Self::UnknownSplitType(_) => "unknown_split_type",
            Self::UnsupportedCurrency(_) => "unsupported_currency",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::Overflow(_) => "overflow",
        }
    }
}
