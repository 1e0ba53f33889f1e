//! Input and output records for quote derivation

use crate::coercion::finite_or_zero;
use crate::error::QuoteError;
use crate::schedule::PaymentSchedule;
use crate::{DEFAULT_PROCESSOR_FEE_PCT, DEFAULT_PROCESSOR_FLAT_FEE, DEFAULT_TAX_SET_ASIDE_PCT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the base amount is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// rate × hours
    #[default]
    Hourly,
    /// One total bid for the job
    Fixed,
}

impl PricingMode {
    /// Human-readable label used in the breakdown
    pub fn label(&self) -> &'static str {
        match self {
            PricingMode::Hourly => "Hourly",
            PricingMode::Fixed => "Fixed Bid",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PricingMode {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" | "h" => Ok(PricingMode::Hourly),
            "fixed" | "fixed-bid" | "fixed_bid" | "bid" | "f" => Ok(PricingMode::Fixed),
            other => Err(QuoteError::InvalidMode(other.to_string())),
        }
    }
}

/// Everything the contractor enters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteInput {
    pub mode: PricingMode,

    /// Hourly rate in dollars (Hourly mode)
    pub rate: f64,
    /// Hours worked (Hourly mode, also the fallback divisor in Fixed mode)
    pub hours: f64,
    /// Total bid in dollars (Fixed mode)
    pub fixed_bid: f64,
    /// Hours the contractor plans to spend on a fixed bid job
    pub planned_hours: Option<f64>,

    // Expenses
    pub materials: f64,
    pub subcontractors: f64,
    pub mileage: f64,
    pub other_expenses: f64,

    // Fees
    pub platform_fee_pct: f64,
    pub processor_fee_pct: f64,
    pub processor_flat_fee: f64,

    // Adjustments on base
    pub contingency_pct: f64,
    pub discount_pct: f64,
    pub retainage_pct: f64,

    // Taxes
    pub tax_set_aside_enabled: bool,
    pub tax_set_aside_pct: f64,

    // Payment schedule weights, normalized to 100 before use
    pub deposit_pct: f64,
    pub progress_pct: f64,
    pub final_pct: f64,
}

impl Default for QuoteInput {
    fn default() -> Self {
        Self {
            mode: PricingMode::Hourly,
            rate: 65.0,
            hours: 12.0,
            fixed_bid: 1200.0,
            planned_hours: None,
            materials: 0.0,
            subcontractors: 0.0,
            mileage: 0.0,
            other_expenses: 0.0,
            platform_fee_pct: 0.0,
            processor_fee_pct: DEFAULT_PROCESSOR_FEE_PCT,
            processor_flat_fee: DEFAULT_PROCESSOR_FLAT_FEE,
            contingency_pct: 0.0,
            discount_pct: 0.0,
            retainage_pct: 0.0,
            tax_set_aside_enabled: true,
            tax_set_aside_pct: DEFAULT_TAX_SET_ASIDE_PCT,
            deposit_pct: 30.0,
            progress_pct: 40.0,
            final_pct: 30.0,
        }
    }
}

impl QuoteInput {
    /// An input with every amount and percentage at zero
    pub fn zeroed(mode: PricingMode) -> Self {
        Self {
            mode,
            rate: 0.0,
            hours: 0.0,
            fixed_bid: 0.0,
            planned_hours: None,
            materials: 0.0,
            subcontractors: 0.0,
            mileage: 0.0,
            other_expenses: 0.0,
            platform_fee_pct: 0.0,
            processor_fee_pct: 0.0,
            processor_flat_fee: 0.0,
            contingency_pct: 0.0,
            discount_pct: 0.0,
            retainage_pct: 0.0,
            tax_set_aside_enabled: false,
            tax_set_aside_pct: 0.0,
            deposit_pct: 0.0,
            progress_pct: 0.0,
            final_pct: 0.0,
        }
    }

    /// Copy with every non-finite number replaced by zero
    pub fn sanitized(&self) -> Self {
        Self {
            mode: self.mode,
            rate: finite_or_zero(self.rate),
            hours: finite_or_zero(self.hours),
            fixed_bid: finite_or_zero(self.fixed_bid),
            planned_hours: self.planned_hours.map(finite_or_zero),
            materials: finite_or_zero(self.materials),
            subcontractors: finite_or_zero(self.subcontractors),
            mileage: finite_or_zero(self.mileage),
            other_expenses: finite_or_zero(self.other_expenses),
            platform_fee_pct: finite_or_zero(self.platform_fee_pct),
            processor_fee_pct: finite_or_zero(self.processor_fee_pct),
            processor_flat_fee: finite_or_zero(self.processor_flat_fee),
            contingency_pct: finite_or_zero(self.contingency_pct),
            discount_pct: finite_or_zero(self.discount_pct),
            retainage_pct: finite_or_zero(self.retainage_pct),
            tax_set_aside_enabled: self.tax_set_aside_enabled,
            tax_set_aside_pct: finite_or_zero(self.tax_set_aside_pct),
            deposit_pct: finite_or_zero(self.deposit_pct),
            progress_pct: finite_or_zero(self.progress_pct),
            final_pct: finite_or_zero(self.final_pct),
        }
    }

    /// Sum of the four expense components
    pub fn expenses_total(&self) -> f64 {
        self.materials + self.subcontractors + self.mileage + self.other_expenses
    }
}

/// Every figure derived from a [`QuoteInput`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOutput {
    pub base: f64,
    pub contingency_amount: f64,
    pub discount_amount: f64,
    pub retainage_amount: f64,
    /// Never negative
    pub subtotal: f64,
    /// Invoice total; equal to `subtotal`
    pub gross: f64,

    pub platform_fee_amount: f64,
    pub processor_fee_amount: f64,
    pub total_fees: f64,

    pub expenses_total: f64,
    /// May be negative
    pub net_before_tax: f64,
    pub tax_set_aside_amount: f64,
    /// May be negative
    pub take_home: f64,

    pub effective_hourly_rate: f64,
    /// Hours the effective rate was divided by
    pub hours_divisor: f64,

    pub payment_schedule: PaymentSchedule,
}
