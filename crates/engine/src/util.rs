//! Internal helpers for validation, fixed-point conversion and remainder
//! distribution.
//!
//! These utilities are **not** part of the public API. They centralize the
//! numeric rules so every split mode enforces the same invariants.

use std::collections::HashSet;

use crate::{EngineError, ParticipantId, ResultEngine};

/// Parse a signed decimal string into an integer scaled by `10^digits`.
///
/// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
/// Rejects more than `digits` fractional digits.
pub(crate) fn parse_decimal(s: &str, digits: u32, field: &str) -> ResultEngine<i64> {
    let fail = |reason: &str| EngineError::InvalidNumber {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(fail("empty value"));
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace(',', ".");
    if rest.is_empty() {
        return Err(fail("empty value"));
    }

    let mut parts = rest.split('.');
    let whole_str = parts.next().unwrap_or_default();
    let frac_str = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(fail("invalid number"));
    }

    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if whole_str.is_empty() || !all_digits(whole_str) || !all_digits(frac_str) {
        return Err(fail("invalid number"));
    }
    let frac_len = u32::try_from(frac_str.len()).map_err(|_| fail("too many decimals"))?;
    if frac_len > digits {
        return Err(fail("too many decimals"));
    }

    let too_large = || fail("value too large");
    let whole: i64 = whole_str.parse().map_err(|_| too_large())?;
    let frac: i64 = if frac_str.is_empty() {
        0
    } else {
        frac_str.parse().map_err(|_| fail("invalid number"))?
    };
    let frac_scale = 10i64.pow(digits - frac_len);

    let scaled = whole
        .checked_mul(10i64.pow(digits))
        .and_then(|v| frac.checked_mul(frac_scale).and_then(|f| v.checked_add(f)))
        .ok_or_else(too_large)?;

    if negative {
        scaled.checked_neg().ok_or_else(too_large)
    } else {
        Ok(scaled)
    }
}

/// Format an integer scaled by `10^digits` as a decimal string.
///
/// With `trim` set, trailing fractional zeros (and a bare `.`) are dropped.
pub(crate) fn format_decimal(value: i64, digits: u32, trim: bool) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    if digits == 0 {
        return format!("{sign}{abs}");
    }

    let scale = 10u64.pow(digits);
    let whole = abs / scale;
    let frac = abs % scale;
    let width = digits as usize;
    let mut frac_str = format!("{frac:0width$}");
    if trim {
        let kept = frac_str.trim_end_matches('0').len();
        frac_str.truncate(kept);
        if frac_str.is_empty() {
            return format!("{sign}{whole}");
        }
    }
    format!("{sign}{whole}.{frac_str}")
}

/// Ensure the participant list is non-empty and ids are unique.
pub(crate) fn ensure_participants<'a>(
    ids: impl IntoIterator<Item = &'a ParticipantId>,
) -> ResultEngine<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateParticipant {
                participant_id: id.to_string(),
            });
        }
    }
    if seen.is_empty() {
        return Err(EngineError::EmptyParticipants);
    }
    Ok(())
}

/// `round(numerator / denominator)` with halves rounded away from zero.
///
/// `denominator` must be positive.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Spread `remainder` minor units over `shares`, one unit at a time, starting
/// from the first share and wrapping around in input order.
///
/// A positive remainder adds units. A negative remainder removes them and
/// skips shares that already reached zero, so no share turns negative.
pub(crate) fn distribute_remainder(shares: &mut [i64], remainder: i64) {
    let eligible = vec![true; shares.len()];
    distribute_remainder_among(shares, remainder, &eligible);
}

/// Like [`distribute_remainder`], restricted to the shares whose `eligible`
/// flag is set. Shares outside the mask are never touched in either direction.
///
/// When no share is eligible the remainder is left unassigned.
pub(crate) fn distribute_remainder_among(
    shares: &mut [i64],
    remainder: i64,
    eligible: &[bool],
) {
    debug_assert_eq!(shares.len(), eligible.len());
    if remainder == 0 {
        return;
    }

    let mut left = remainder.unsigned_abs();

    if remainder > 0 {
        let targets = eligible.iter().filter(|flag| **flag).count() as u64;
        if targets == 0 {
            return;
        }
        // Whole passes first, then a single partial pass.
        let per_share = left / targets;
        let extra = left % targets;
        let receivers = shares
            .iter_mut()
            .zip(eligible)
            .filter_map(|(share, flag)| flag.then_some(share));
        for (rank, share) in receivers.enumerate() {
            let bump = per_share + u64::from((rank as u64) < extra);
            *share += bump as i64;
        }
        return;
    }

    let can_give = |share: i64, flag: bool| flag && share > 0;

    while left > 0 {
        let givers = shares
            .iter()
            .zip(eligible)
            .filter(|(share, flag)| can_give(**share, **flag))
            .map(|(share, _)| *share);
        let count = givers.clone().count() as u64;
        let Some(smallest) = givers.min() else {
            break;
        };

        // Whole passes where nobody hits zero mid-pass.
        let passes = (left / count).min(smallest.unsigned_abs());
        for (share, flag) in shares.iter_mut().zip(eligible) {
            if left == 0 {
                break;
            }
            if !can_give(*share, *flag) {
                continue;
            }
            if passes > 0 {
                *share -= passes as i64;
                left -= passes;
            } else {
                *share -= 1;
                left -= 1;
            }
        }
    }
}
