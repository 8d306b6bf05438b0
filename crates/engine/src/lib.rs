//! Expense splitting engine.
//!
//! The engine divides an expense total among trip participants using one of
//! four strategies (equal, exact amounts, percentages, weighted shares) and
//! guarantees that the resulting shares add up to the total exactly, in
//! integer minor currency units.
//!
//! Everything here is pure: no storage, no clock, no I/O. Identical input
//! always yields identical output.
//!
//! ```rust
//! use engine::{Money, Weight, SplitRequest, calculate_shares};
//!
//! let request = SplitRequest::shares(
//!     Money::new(100),
//!     [("ada", Weight::from_units(1)), ("bob", Weight::from_units(2))],
//! );
//! let result = calculate_shares(&request).unwrap();
//! assert_eq!(result.amounts(), vec![Money::new(34), Money::new(66)]);
//! ```

pub use currency::Currency;
pub use error::EngineError;
pub use money::{Money, MoneyDisplay};
pub use scaled::{Percentage, SCALE, SCALE_DIGITS, Weight};
pub use split::{
    Participant, ParticipantId, RawParticipant, RawSplitRequest, ShareAllocation, Split,
    SplitRequest, SplitResult, SplitType, calculate_raw_shares, calculate_shares,
};

mod currency;
mod error;
mod money;
mod scaled;
mod split;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
