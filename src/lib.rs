// =============================================================================
// Finance Agent — indicator engine, decision engine and HTTP surface
// =============================================================================
//
// Data flow for a single symbol:
//
//   market_data (Yahoo or synthetic) => indicator_engine => decision_engine
//                                    => analysis_result::AnalysisReport
//
// `app_state` owns the cache and the data client; `api` exposes it over HTTP.
// =============================================================================

pub mod analysis_result;
pub mod api;
pub mod app_state;
pub mod decision_engine;
pub mod indicator_engine;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod types;
