use serde::{Deserialize, Serialize};

/// ISO 4217 currency code as exchanged with clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Chf,
    Cad,
    Aud,
    Jpy,
    Kwd,
}

pub mod split {
    use super::*;

    /// Request body for previewing an expense split.
    ///
    /// `total_minor` and `share_value` are plain JSON numbers and
    /// `split_type` a plain string: the server hands them to the engine,
    /// which rejects fractional totals and unknown split types with a
    /// precise message.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        /// Defaults to the server's configured currency.
        pub currency: Option<Currency>,
        /// Expense total in minor units (e.g. cents).
        pub total_minor: f64,
        /// One of `equal`, `amount`, `percentage`, `shares`.
        pub split_type: String,
        pub participants: Vec<ParticipantShareNew>,
    }

    /// A participant and its share value.
    ///
    /// The value is ignored for `equal`, an amount in minor units for
    /// `amount`, a percentage in `[0, 100]` for `percentage` and a positive
    /// weight for `shares`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantShareNew {
        pub participant_id: String,
        #[serde(default)]
        pub share_value: Option<f64>,
    }

    /// Response body: one share per participant, in request order.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub currency: Currency,
        pub split_type: String,
        pub total_minor: i64,
        pub total_display: String,
        pub shares: Vec<ShareView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareView {
        pub participant_id: String,
        pub share_minor: i64,
        /// Major units without currency code, e.g. `"10.50"`.
        pub share_display: String,
        pub split_type: String,
    }
}

pub mod error {
    use super::*;

    /// Body returned for every rejected request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        /// Machine-readable reason, e.g. `amount_mismatch`.
        pub code: String,
    }
}
