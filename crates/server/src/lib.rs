use api_types::error::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod server;
mod splits;

pub mod types {
    pub mod split {
        pub use api_types::split::{ParticipantShareNew, ShareView, SplitNew, SplitView};
    }

    pub mod error {
        pub use api_types::error::ErrorBody;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::EmptyParticipants
        | EngineError::DuplicateParticipant { .. }
        | EngineError::FractionalAmount { .. }
        | EngineError::NegativeTotal { .. }
        | EngineError::NegativeShare { .. }
        | EngineError::AmountMismatch { .. }
        | EngineError::PercentageSum { .. }
        | EngineError::PercentageOutOfRange { .. }
        | EngineError::NonPositiveWeight { .. }
        | EngineError::MissingShareValue { .. }
        | EngineError::UnknownSplitType(_)
        | EngineError::UnsupportedCurrency(_)
        | EngineError::InvalidNumber { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        // Values too large to split; the request is still well-formed.
        EngineError::Overflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                ErrorBody {
                    error: err.to_string(),
                    code: err.code().to_string(),
                },
            ),
            ServerError::Generic(err) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: err,
                    code: "bad_request".to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
