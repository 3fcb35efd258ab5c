use napi::Result as NapiResult;
use napi_derive::napi;

use rent_vs_own_core::params::SimulationParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_params(input_json: &str) -> NapiResult<SimulationParameters> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::mortgage::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_own_core::mortgage::amortize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ownership scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_live_in(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output =
        rent_vs_own_core::ownership::live_in::simulate_live_in(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_rental(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output =
        rent_vs_own_core::ownership::rental::simulate_rental(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_investment(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::investment::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rent_vs_own_core::investment::simulate_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

#[napi]
pub fn buy_and_live(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output =
        rent_vs_own_core::comparison::compare_buy_and_live(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn buy_and_rent(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output =
        rent_vs_own_core::comparison::compare_buy_and_rent(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn net_worth_buy_and_live(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = rent_vs_own_core::comparison::compare_net_worth_buy_and_live(&params)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn hybrid_rental(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output =
        rent_vs_own_core::comparison::compare_hybrid_rental(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cash-flow models
// ---------------------------------------------------------------------------

#[napi]
pub fn long_term_rental(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::cashflow::long_term::LongTermRentalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_own_core::cashflow::long_term::simulate_long_term_rental(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn short_term_rental(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::cashflow::short_term::ShortTermRentalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_own_core::cashflow::short_term::simulate_short_term_rental(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fix_and_flip(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::cashflow::flip::FlipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_own_core::cashflow::flip::simulate_flip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn sensitivity(input_json: String) -> NapiResult<String> {
    let input: rent_vs_own_core::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rent_vs_own_core::sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
