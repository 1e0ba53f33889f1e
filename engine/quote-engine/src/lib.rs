//! # Quote Engine
//!
//! Contractor quote derivation: turns an hourly rate/hours pair or a fixed bid,
//! plus expenses, fees, a tax set-aside and payment-schedule weights, into the
//! full set of dependent monetary figures.
//!
//! The derivation is a pure, total function ([`derive`]). Malformed numbers are
//! coerced to zero once at the input boundary ([`coercion`]) so the engine never
//! has to special-case them. [`QuoteSession`] owns a mutable input record and
//! re-derives after every edit; [`BreakdownFormatter`] renders the plain-text
//! export.

pub mod coercion;
pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod schedule;
pub mod session;
pub mod types;


pub use coercion::{finite_or_zero, parse_amount, parse_toggle};
pub use config::{FormatterConfig, LoggingConfig, QuoteConfig};
pub use engine::{derive, QuoteEngine};
pub use error::{QuoteError, Result};
pub use formatter::{format_breakdown, format_money, format_percent, summary_rows, BreakdownFormatter};
pub use schedule::{clamp_weight, normalize_weights, NormalizedWeights, PaymentSchedule};
pub use session::{QuoteField, QuoteSession};
pub use types::{PricingMode, QuoteInput, QuoteOutput};

/// Current version of the quote engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default breakdown title
pub const DEFAULT_BREAKDOWN_TITLE: &str = "Contractor Quote Breakdown";

/// Default processor fee percentage (card processor, percent part)
pub const DEFAULT_PROCESSOR_FEE_PCT: f64 = 2.9;

/// Default processor flat fee per charge
pub const DEFAULT_PROCESSOR_FLAT_FEE: f64 = 0.3;

/// Default tax set-aside percentage
pub const DEFAULT_TAX_SET_ASIDE_PCT: f64 = 20.0;
