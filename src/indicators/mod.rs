// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free column builders used by the indicator engine. Every
// function takes a slice of closes and returns a column aligned with it, so
// row `i` of any output always describes close `i`. Rows without enough
// history are `None` (RSI instead reports its neutral 50).

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;
