use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::report::CheckResult;
use crate::runner::RequestContext;

pub const POST_UPDATES_CHECK: &str = "POST /price-updates status 200";
pub const GET_ALERTS_CHECK: &str = "GET /active-alerts status 200";

/// One entry in the bulk price-update body. Field names follow the target
/// service's JSON contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub node_id: String,
    pub price_mwh: f64,
}

impl PriceUpdate {
    pub fn new(node_id: &str, price_mwh: f64) -> Self {
        Self {
            node_id: node_id.to_owned(),
            price_mwh,
        }
    }
}

/// Fixed POST body. NODE-001 appears twice at different prices so every
/// request exercises the target's overwrite path; this generator only checks
/// transport success, not the resulting prices.
pub fn price_updates_payload() -> Vec<PriceUpdate> {
    vec![
        PriceUpdate::new("NODE-001", 100.0),
        PriceUpdate::new("NODE-002", 100.0),
        PriceUpdate::new("NODE-001", 250.0),
        PriceUpdate::new("NODE-002", 90.0),
    ]
}

/// Entry point for the `post_updates` scenario: one bulk POST per invocation.
pub fn post_updates(context: &RequestContext) -> BoxFuture<'_, reqwest::Result<CheckResult>> {
    Box::pin(async move {
        let response = context
            .client
            .post(context.config.price_updates_url.clone())
            .json(&price_updates_payload())
            .send()
            .await?;
        Ok(CheckResult::new(
            POST_UPDATES_CHECK,
            response.status() == StatusCode::OK,
        ))
    })
}

/// Entry point for the `get_alerts` scenario: one alert query per invocation.
/// The response body is not inspected.
pub fn get_alerts(context: &RequestContext) -> BoxFuture<'_, reqwest::Result<CheckResult>> {
    Box::pin(async move {
        let response = context
            .client
            .get(context.config.active_alerts_url.clone())
            .send()
            .await?;
        Ok(CheckResult::new(
            GET_ALERTS_CHECK,
            response.status() == StatusCode::OK,
        ))
    })
}
