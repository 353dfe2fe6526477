use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::directory::{BusinessDirectory, BusinessId, PatronId};
use super::service::{LoyaltyService, LoyaltyServiceError, VisitCountRequest};

/// Router builder exposing the loyalty overview and payout quote endpoints.
pub fn loyalty_router<D>(service: Arc<LoyaltyService<D>>) -> Router
where
    D: BusinessDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/businesses/:business_id/loyalty",
            get(overview_handler::<D>),
        )
        .route(
            "/api/v1/businesses/:business_id/payouts/quote",
            post(quote_handler::<D>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OverviewParams {
    pub(crate) patron: Option<String>,
    pub(crate) visits: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    #[serde(default)]
    pub(crate) patron: Option<String>,
    #[serde(default)]
    pub(crate) visits: Option<u32>,
    /// Decimal amount string, e.g. "24.50". Takes precedence when present.
    #[serde(default)]
    pub(crate) receipt_amount: Option<String>,
    #[serde(default)]
    pub(crate) receipt_cents: Option<u64>,
}

pub(crate) async fn overview_handler<D>(
    State(service): State<Arc<LoyaltyService<D>>>,
    Path(business_id): Path<String>,
    Query(params): Query<OverviewParams>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    let business = BusinessId(business_id);
    let request = VisitCountRequest {
        patron: params.patron.map(PatronId),
        visits: params.visits,
    };

    match service.overview(&business, &request, Utc::now()) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_handler<D>(
    State(service): State<Arc<LoyaltyService<D>>>,
    Path(business_id): Path<String>,
    axum::Json(body): axum::Json<QuoteRequest>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    let business = BusinessId(business_id);
    let request = VisitCountRequest {
        patron: body.patron.map(PatronId),
        visits: body.visits,
    };

    let result = match (body.receipt_amount, body.receipt_cents) {
        (Some(amount), _) => service.quote_amount(&business, &request, &amount, Utc::now()),
        (None, Some(cents)) => service.quote(&business, &request, cents, Utc::now()),
        (None, None) => {
            let payload = json!({ "error": "receipt_amount or receipt_cents is required" });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LoyaltyServiceError) -> Response {
    let status = match &error {
        LoyaltyServiceError::UnknownBusiness(_) => StatusCode::NOT_FOUND,
        LoyaltyServiceError::Amount(_) | LoyaltyServiceError::NegativeReceipt(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LoyaltyServiceError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loyalty::directory::{BusinessProgram, DirectoryError};
    use crate::loyalty::domain::{Tier, TierLadder};
    use chrono::{DateTime, Utc};

    struct SingleProgram(BusinessProgram);

    impl BusinessDirectory for SingleProgram {
        fn program_for(
            &self,
            business: &BusinessId,
        ) -> Result<Option<BusinessProgram>, DirectoryError> {
            if business == &self.0.business_id {
                Ok(Some(self.0.clone()))
            } else {
                Ok(None)
            }
        }

        fn qualifying_visits(
            &self,
            _business: &BusinessId,
            _patron: &PatronId,
            _as_of: DateTime<Utc>,
        ) -> Result<u32, DirectoryError> {
            Ok(0)
        }
    }

    fn service() -> Arc<LoyaltyService<SingleProgram>> {
        let program = BusinessProgram {
            business_id: BusinessId("biz-corner".to_string()),
            name: "Corner Counter".to_string(),
            locality: None,
            ladder: TierLadder::from_records(vec![Tier {
                index: 0,
                min_visits: 1,
                max_visits: None,
                percent_bps: 500,
                label: None,
            }]),
            per_visit_cap_cents: None,
            window_days: 30,
        };
        Arc::new(LoyaltyService::new(Arc::new(SingleProgram(program))))
    }

    #[tokio::test]
    async fn overview_handler_returns_ok_for_known_business() {
        let response = overview_handler(
            State(service()),
            Path("biz-corner".to_string()),
            Query(OverviewParams {
                patron: None,
                visits: Some(3),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn overview_handler_404s_unknown_business() {
        let response = overview_handler(
            State(service()),
            Path("biz-nowhere".to_string()),
            Query(OverviewParams::default()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn quote_handler_maps_bad_amounts_to_422() {
        let body = QuoteRequest {
            patron: None,
            visits: Some(1),
            receipt_amount: Some("not-money".to_string()),
            receipt_cents: None,
        };
        let response =
            quote_handler(State(service()), Path("biz-corner".to_string()), axum::Json(body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn quote_handler_accepts_raw_cents() {
        let body = QuoteRequest {
            patron: None,
            visits: Some(2),
            receipt_amount: None,
            receipt_cents: Some(199),
        };
        let response =
            quote_handler(State(service()), Path("biz-corner".to_string()), axum::Json(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
