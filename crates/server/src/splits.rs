//! Split preview endpoint

use api_types::split::{ShareView, SplitNew, SplitView};
use axum::{Json, extract::State};
use engine::{Currency, RawParticipant, RawSplitRequest, SplitResult};

use crate::{ServerError, server::ServerState};

fn map_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
        Currency::Gbp => api_types::Currency::Gbp,
        Currency::Chf => api_types::Currency::Chf,
        Currency::Cad => api_types::Currency::Cad,
        Currency::Aud => api_types::Currency::Aud,
        Currency::Jpy => api_types::Currency::Jpy,
        Currency::Kwd => api_types::Currency::Kwd,
    }
}

fn engine_currency(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Gbp => Currency::Gbp,
        api_types::Currency::Chf => Currency::Chf,
        api_types::Currency::Cad => Currency::Cad,
        api_types::Currency::Aud => Currency::Aud,
        api_types::Currency::Jpy => Currency::Jpy,
        api_types::Currency::Kwd => Currency::Kwd,
    }
}

fn split_view(result: SplitResult, currency: Currency) -> SplitView {
    let total = result.total();
    let split_type = result.split_type().to_string();
    let shares = result
        .into_iter()
        .map(|allocation| ShareView {
            participant_id: allocation.participant_id.to_string(),
            share_minor: allocation.share.minor(),
            share_display: allocation.share.to_major_string(currency),
            split_type: allocation.split_type.to_string(),
        })
        .collect();

    SplitView {
        currency: map_currency(currency),
        split_type,
        total_minor: total.minor(),
        total_display: total.display(currency).to_string(),
        shares,
    }
}

/// Compute the per-participant shares of an expense without storing it.
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<SplitNew>,
) -> Result<Json<SplitView>, ServerError> {
    if payload.participants.len() > state.max_participants {
        return Err(ServerError::Generic(format!(
            "too many participants: {} (max {})",
            payload.participants.len(),
            state.max_participants
        )));
    }

    let currency = payload
        .currency
        .map(engine_currency)
        .unwrap_or(state.default_currency);

    let raw = RawSplitRequest {
        total_amount: payload.total_minor,
        split_type: payload.split_type,
        participants: payload
            .participants
            .into_iter()
            .map(|p| RawParticipant::new(p.participant_id, p.share_value))
            .collect(),
    };

    let result = engine::calculate_raw_shares(raw).inspect_err(|err| {
        tracing::debug!("rejected split: {err}");
    })?;
    tracing::debug!(
        "split {} of {} among {} participants",
        result.split_type(),
        result.total().display(currency),
        result.len()
    );

    Ok(Json(split_view(result, currency)))
}
