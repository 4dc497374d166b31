//! AWS Lambda handler for claiming-age projections
//!
//! Accepts `ProjectionParameters` as JSON and returns the bank balance
//! matrix, per-column summary, and the NPV and balance optimal claiming ages
//! for the requested horizon. Invalid parameters are rejected with a 400 and
//! the full list of validation messages.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use clagess::{
    optimizer::{best_by_balance, best_by_npv, BestClaimingAge},
    projection::{AnnualRate, BalanceColumn, BalanceRow, BankBalanceSimulator, ColumnSummary},
    BenefitTableCache, ProjectionParameters,
};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::Serialize;

/// Optimal claiming ages for one investment rate
#[derive(Debug, Serialize)]
pub struct BestAges {
    pub interest_rate: f64,
    pub by_npv: BestClaimingAge,
    pub by_balance: BestClaimingAge,
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub full_retirement_age: f64,
    pub columns: Vec<BalanceColumn>,
    pub summary: Vec<ColumnSummary>,
    pub best_ages: Vec<BestAges>,
    pub rows: Vec<BalanceRow>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<String>,
}

fn error_response(status: u16, message: &str, messages: &[String]) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(&ErrorBody {
        error: message,
        messages: messages.to_vec(),
    })?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let params: ProjectionParameters = match serde_json::from_str(&body_str) {
        Ok(p) => p,
        Err(e) => {
            warn!("Rejected request body: {}", e);
            return error_response(400, &format!("Invalid JSON: {}", e), &[]);
        }
    };

    if let Err(errors) = params.validate() {
        warn!("Rejected parameters: {}", errors);
        return error_response(400, "Invalid parameters", errors.messages());
    }

    // Each invocation is independent, so the cache lives for one request
    let mut cache = BenefitTableCache::new();
    let table = cache.table_for(params.birth_year);

    let projection = BankBalanceSimulator::new(table, &params).run();
    let best_ages = params
        .interest_rates
        .iter()
        .map(|&rate| BestAges {
            interest_rate: rate,
            by_npv: best_by_npv(table, params.max_age, AnnualRate::new(rate), params.pia),
            by_balance: best_by_balance(
                table,
                params.max_age,
                AnnualRate::new(rate),
                params.cola,
                params.birth_month,
                params.pia,
            ),
        })
        .collect();

    let response = ProjectionResponse {
        full_retirement_age: clagess::full_retirement_age(params.birth_year),
        summary: projection.summary(),
        columns: projection.columns,
        best_ages,
        rows: projection.rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Projected {} column(s) x {} month(s) in {} ms",
        response.columns.len(),
        response.rows.len(),
        response.execution_time_ms
    );

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
