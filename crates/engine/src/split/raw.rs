//! Loosely typed split input as it arrives from forms and JSON bodies.
//!
//! Totals and share values are plain numbers and the split type is a string;
//! converting into a [`SplitRequest`] is where fractional totals, unknown
//! split types and missing share values are caught.

use serde::{Deserialize, Serialize};

use super::{Participant, ParticipantId, Split, SplitRequest, SplitResult, SplitType};
use crate::{EngineError, Money, Percentage, ResultEngine, Weight, calculate_shares};

/// One participant row: `share_value` is read according to the split type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawParticipant {
    pub participant_id: String,
    #[serde(default)]
    pub share_value: Option<f64>,
}

impl RawParticipant {
    #[must_use]
    pub fn new(participant_id: impl Into<String>, share_value: Option<f64>) -> Self {
        Self {
            participant_id: participant_id.into(),
            share_value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSplitRequest {
    /// Minor units; must be a whole number.
    pub total_amount: f64,
    pub split_type: String,
    pub participants: Vec<RawParticipant>,
}

impl TryFrom<RawSplitRequest> for SplitRequest {
    type Error = EngineError;

    fn try_from(raw: RawSplitRequest) -> Result<Self, Self::Error> {
        let total = Money::try_from_number(raw.total_amount)?;
        let split_type: SplitType = raw.split_type.parse()?;

        let split = match split_type {
            SplitType::Equal => Split::Equal {
                participants: raw
                    .participants
                    .into_iter()
                    .map(|p| ParticipantId::new(p.participant_id))
                    .collect(),
            },
            SplitType::Amount => Split::Amount {
                participants: typed_participants(
                    raw.participants,
                    split_type,
                    Money::try_from_number,
                )?,
            },
            SplitType::Percentage => Split::Percentage {
                participants: typed_participants(
                    raw.participants,
                    split_type,
                    Percentage::try_from_number,
                )?,
            },
            SplitType::Shares => Split::Shares {
                participants: typed_participants(
                    raw.participants,
                    split_type,
                    Weight::try_from_number,
                )?,
            },
        };

        Ok(SplitRequest::new(total, split))
    }
}

fn typed_participants<S>(
    participants: Vec<RawParticipant>,
    split_type: SplitType,
    convert: impl Fn(f64) -> ResultEngine<S>,
) -> ResultEngine<Vec<Participant<S>>> {
    participants
        .into_iter()
        .map(|p| {
            let value = p
                .share_value
                .ok_or_else(|| EngineError::MissingShareValue {
                    participant_id: p.participant_id.clone(),
                    split_type,
                })?;
            Ok(Participant::new(p.participant_id, convert(value)?))
        })
        .collect()
}

/// Convert a [`RawSplitRequest`] and split it.
pub fn calculate_raw_shares(raw: RawSplitRequest) -> ResultEngine<SplitResult> {
    let request = SplitRequest::try_from(raw)?;
    calculate_shares(&request)
}
