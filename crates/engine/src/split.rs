//! Expense split calculator.
//!
//! [`calculate_shares`] turns a [`SplitRequest`] into a [`SplitResult`]: one
//! [`ShareAllocation`] per participant, in input order, whose amounts add up
//! to the request total to the minor unit.
//!
//! Leftover minor units (integer division, per-participant rounding) are
//! always handed out the same way: one unit at a time, starting from the
//! first participant in input order.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, Percentage, ResultEngine, Weight, util};

pub use raw::{RawParticipant, RawSplitRequest, calculate_raw_shares};

mod raw;

/// Opaque participant identifier, unique within one request.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Strategy used to divide an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Equal,
    Amount,
    Percentage,
    Shares,
}

impl SplitType {
    pub const ALL: [SplitType; 4] = [
        SplitType::Equal,
        SplitType::Amount,
        SplitType::Percentage,
        SplitType::Shares,
    ];

    /// Returns the canonical split type string used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Amount => "amount",
            Self::Percentage => "percentage",
            Self::Shares => "shares",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SplitType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| EngineError::UnknownSplitType(s.to_string()))
    }
}

/// A participant together with the share specification of its split mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant<S> {
    pub id: ParticipantId,
    pub share: S,
}

impl<S> Participant<S> {
    #[must_use]
    pub fn new(id: impl Into<ParticipantId>, share: S) -> Self {
        Self {
            id: id.into(),
            share,
        }
    }
}

/// Split strategy with the share values it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Everybody pays the same, remainder to the first participants.
    Equal { participants: Vec<ParticipantId> },
    /// Exact amounts in minor units; they must add up to the total.
    Amount {
        participants: Vec<Participant<Money>>,
    },
    /// Percentages in `[0, 100]` adding up to 100 (±0.01).
    Percentage {
        participants: Vec<Participant<Percentage>>,
    },
    /// Positive relative weights.
    Shares {
        participants: Vec<Participant<Weight>>,
    },
}

impl Split {
    #[must_use]
    pub const fn split_type(&self) -> SplitType {
        match self {
            Self::Equal { .. } => SplitType::Equal,
            Self::Amount { .. } => SplitType::Amount,
            Self::Percentage { .. } => SplitType::Percentage,
            Self::Shares { .. } => SplitType::Shares,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Equal { participants } => participants.len(),
            Self::Amount { participants } => participants.len(),
            Self::Percentage { participants } => participants.len(),
            Self::Shares { participants } => participants.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Participant ids in input order.
    #[must_use]
    pub fn participant_ids(&self) -> Vec<&ParticipantId> {
        match self {
            Self::Equal { participants } => participants.iter().collect(),
            Self::Amount { participants } => participants.iter().map(|p| &p.id).collect(),
            Self::Percentage { participants } => participants.iter().map(|p| &p.id).collect(),
            Self::Shares { participants } => participants.iter().map(|p| &p.id).collect(),
        }
    }
}

/// Input of [`calculate_shares`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitRequest {
    pub total: Money,
    pub split: Split,
}

impl SplitRequest {
    #[must_use]
    pub fn new(total: Money, split: Split) -> Self {
        Self { total, split }
    }

    #[must_use]
    pub fn equal<I, P>(total: Money, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self::new(
            total,
            Split::Equal {
                participants: participants.into_iter().map(Into::into).collect(),
            },
        )
    }

    #[must_use]
    pub fn amount<I, P>(total: Money, participants: I) -> Self
    where
        I: IntoIterator<Item = (P, Money)>,
        P: Into<ParticipantId>,
    {
        Self::new(
            total,
            Split::Amount {
                participants: collect_participants(participants),
            },
        )
    }

    #[must_use]
    pub fn percentage<I, P>(total: Money, participants: I) -> Self
    where
        I: IntoIterator<Item = (P, Percentage)>,
        P: Into<ParticipantId>,
    {
        Self::new(
            total,
            Split::Percentage {
                participants: collect_participants(participants),
            },
        )
    }

    #[must_use]
    pub fn shares<I, P>(total: Money, participants: I) -> Self
    where
        I: IntoIterator<Item = (P, Weight)>,
        P: Into<ParticipantId>,
    {
        Self::new(
            total,
            Split::Shares {
                participants: collect_participants(participants),
            },
        )
    }

    #[must_use]
    pub const fn split_type(&self) -> SplitType {
        self.split.split_type()
    }
}

fn collect_participants<I, P, S>(participants: I) -> Vec<Participant<S>>
where
    I: IntoIterator<Item = (P, S)>,
    P: Into<ParticipantId>,
{
    participants
        .into_iter()
        .map(|(id, share)| Participant::new(id, share))
        .collect()
}

/// Amount owed by one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAllocation {
    pub participant_id: ParticipantId,
    pub share: Money,
    pub split_type: SplitType,
}

/// Output of [`calculate_shares`].
///
/// Allocations follow the input order and always add up to [`total`].
///
/// [`total`]: SplitResult::total
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    total: Money,
    split_type: SplitType,
    allocations: Vec<ShareAllocation>,
}

impl SplitResult {
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub const fn split_type(&self) -> SplitType {
        self.split_type
    }

    #[must_use]
    pub fn allocations(&self) -> &[ShareAllocation] {
        &self.allocations
    }

    /// Share amounts in input order.
    #[must_use]
    pub fn amounts(&self) -> Vec<Money> {
        self.allocations.iter().map(|a| a.share).collect()
    }

    /// Share of a single participant, if present.
    #[must_use]
    pub fn share_of(&self, participant_id: &str) -> Option<Money> {
        self.allocations
            .iter()
            .find(|a| a.participant_id.as_str() == participant_id)
            .map(|a| a.share)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShareAllocation> {
        self.allocations.iter()
    }

    #[must_use]
    pub fn into_allocations(self) -> Vec<ShareAllocation> {
        self.allocations
    }
}

impl IntoIterator for SplitResult {
    type Item = ShareAllocation;
    type IntoIter = std::vec::IntoIter<ShareAllocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.allocations.into_iter()
    }
}

impl<'a> IntoIterator for &'a SplitResult {
    type Item = &'a ShareAllocation;
    type IntoIter = std::slice::Iter<'a, ShareAllocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.allocations.iter()
    }
}

/// Split `request.total` among its participants.
///
/// Fails with the first violated invariant; never returns a partial result.
///
/// ```rust
/// use engine::{Money, SplitRequest, calculate_shares};
///
/// let request = SplitRequest::equal(Money::new(301), ["ada", "bob"]);
/// let result = calculate_shares(&request).unwrap();
/// assert_eq!(result.amounts(), vec![Money::new(151), Money::new(150)]);
/// ```
pub fn calculate_shares(request: &SplitRequest) -> ResultEngine<SplitResult> {
    let total = request.total;
    if total.is_negative() {
        return Err(EngineError::NegativeTotal { total });
    }

    let ids = request.split.participant_ids();
    util::ensure_participants(ids.iter().copied())?;

    let shares = match &request.split {
        Split::Equal { participants } => equal_shares(total, participants.len())?,
        Split::Amount { participants } => amount_shares(total, participants)?,
        Split::Percentage { participants } => percentage_shares(total, participants)?,
        Split::Shares { participants } => weighted_shares(total, participants)?,
    };
    debug_assert_eq!(shares.iter().sum::<i64>(), total.minor());

    let split_type = request.split_type();
    let allocations = ids
        .into_iter()
        .zip(shares)
        .map(|(id, share)| ShareAllocation {
            participant_id: id.clone(),
            share: Money::new(share),
            split_type,
        })
        .collect();

    Ok(SplitResult {
        total,
        split_type,
        allocations,
    })
}

fn participant_count(count: usize) -> ResultEngine<i64> {
    i64::try_from(count).map_err(|_| EngineError::Overflow("counting participants"))
}

fn equal_shares(total: Money, count: usize) -> ResultEngine<Vec<i64>> {
    let count_i64 = participant_count(count)?;
    let base = total.minor() / count_i64;
    let remainder = total.minor() % count_i64;

    let mut shares = vec![base; count];
    util::distribute_remainder(&mut shares, remainder);
    Ok(shares)
}

fn amount_shares(total: Money, participants: &[Participant<Money>]) -> ResultEngine<Vec<i64>> {
    let mut sum = Money::ZERO;
    for participant in participants {
        if participant.share.is_negative() {
            return Err(EngineError::NegativeShare {
                participant_id: participant.id.to_string(),
                share: participant.share,
            });
        }
        sum = sum
            .checked_add(participant.share)
            .ok_or(EngineError::Overflow("summing participant shares"))?;
    }

    if sum != total {
        return Err(EngineError::AmountMismatch { sum, total });
    }
    Ok(participants.iter().map(|p| p.share.minor()).collect())
}

fn percentage_shares(
    total: Money,
    participants: &[Participant<Percentage>],
) -> ResultEngine<Vec<i64>> {
    let mut sum: i64 = 0;
    for participant in participants {
        if !participant.share.is_in_range() {
            return Err(EngineError::PercentageOutOfRange {
                participant_id: participant.id.to_string(),
                percentage: participant.share,
            });
        }
        sum = sum
            .checked_add(participant.share.scaled())
            .ok_or(EngineError::Overflow("summing percentages"))?;
    }

    if (sum - Percentage::HUNDRED.scaled()).abs() > Percentage::TOLERANCE.scaled() {
        return Err(EngineError::PercentageSum {
            sum: Percentage::from_scaled(sum),
        });
    }

    let denominator = i128::from(Percentage::HUNDRED.scaled());
    let mut shares = participants
        .iter()
        .map(|p| {
            let exact = i128::from(total.minor()) * i128::from(p.share.scaled());
            i64::try_from(util::div_round_half_up(exact, denominator))
                .map_err(|_| EngineError::Overflow("rounding percentage shares"))
        })
        .collect::<ResultEngine<Vec<i64>>>()?;

    let allocated = shares
        .iter()
        .try_fold(0i64, |acc, share| acc.checked_add(*share))
        .ok_or(EngineError::Overflow("summing percentage shares"))?;
    // A participant who asked for 0% never absorbs rounding corrections.
    let eligible: Vec<bool> = participants.iter().map(|p| p.share.scaled() > 0).collect();
    util::distribute_remainder_among(&mut shares, total.minor() - allocated, &eligible);
    Ok(shares)
}

fn weighted_shares(total: Money, participants: &[Participant<Weight>]) -> ResultEngine<Vec<i64>> {
    let mut total_weight: i128 = 0;
    for participant in participants {
        if !participant.share.is_positive() {
            return Err(EngineError::NonPositiveWeight {
                participant_id: participant.id.to_string(),
                weight: participant.share,
            });
        }
        total_weight += i128::from(participant.share.scaled());
    }

    // Every entitlement is at most `total`, so the floors fit in i64.
    let mut shares = participants
        .iter()
        .map(|p| {
            let exact = i128::from(total.minor()) * i128::from(p.share.scaled());
            i64::try_from(exact / total_weight)
                .map_err(|_| EngineError::Overflow("dividing weighted shares"))
        })
        .collect::<ResultEngine<Vec<i64>>>()?;

    let allocated: i64 = shares.iter().sum();
    util::distribute_remainder(&mut shares, total.minor() - allocated);
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(values: &[i64]) -> Vec<Money> {
        values.iter().copied().map(Money::new).collect()
    }

    #[test]
    fn equal_split_gives_remainder_to_first() {
        let result = calculate_shares(&SplitRequest::equal(Money::new(301), ["a", "b"])).unwrap();
        assert_eq!(result.amounts(), amounts(&[151, 150]));

        let result = calculate_shares(&SplitRequest::equal(Money::new(300), ["a", "b"])).unwrap();
        assert_eq!(result.amounts(), amounts(&[150, 150]));
    }

    #[test]
    fn equal_split_of_zero_is_all_zero() {
        let result =
            calculate_shares(&SplitRequest::equal(Money::ZERO, ["a", "b", "c"])).unwrap();
        assert_eq!(result.amounts(), amounts(&[0, 0, 0]));
    }

    #[test]
    fn allocations_mirror_split_type() {
        let result = calculate_shares(&SplitRequest::shares(
            Money::new(10),
            [("a", Weight::ONE)],
        ))
        .unwrap();
        assert!(result.iter().all(|a| a.split_type == SplitType::Shares));
        assert_eq!(result.split_type(), SplitType::Shares);
        assert_eq!(result.share_of("a"), Some(Money::new(10)));
        assert_eq!(result.share_of("z"), None);
    }

    #[test]
    fn negative_total_is_rejected() {
        let err = calculate_shares(&SplitRequest::equal(Money::new(-1), ["a"])).unwrap_err();
        assert_eq!(
            err,
            EngineError::NegativeTotal {
                total: Money::new(-1)
            }
        );
    }

    #[test]
    fn percentage_excess_is_removed_from_first() {
        // 50.5 rounds up twice, one unit too many.
        let request = SplitRequest::percentage(
            Money::new(101),
            [("a", Percentage::from_points(50)), ("b", Percentage::from_points(50))],
        );
        let result = calculate_shares(&request).unwrap();
        assert_eq!(result.amounts(), amounts(&[50, 51]));
    }

    #[test]
    fn percentage_deficit_skips_zero_percentage() {
        let request = SplitRequest::percentage(
            Money::new(1_000_000),
            [
                ("a", Percentage::from_scaled(999_900)),
                ("b", Percentage::ZERO),
            ],
        );
        let result = calculate_shares(&request).unwrap();
        assert_eq!(result.amounts(), amounts(&[1_000_000, 0]));
    }

    #[test]
    fn negative_amount_share_is_rejected() {
        let request = SplitRequest::amount(
            Money::new(100),
            [("a", Money::new(120)), ("b", Money::new(-20))],
        );
        assert_eq!(
            calculate_shares(&request).unwrap_err(),
            EngineError::NegativeShare {
                participant_id: "b".to_string(),
                share: Money::new(-20),
            }
        );
    }

    #[test]
    fn split_type_parses_wire_names() {
        assert_eq!("Percentage".parse::<SplitType>().unwrap(), SplitType::Percentage);
        assert_eq!(
            "itemized".parse::<SplitType>(),
            Err(EngineError::UnknownSplitType("itemized".to_string()))
        );
    }
}
