use crate::schedule::PaymentSchedule;
use crate::types::{PricingMode, QuoteInput, QuoteOutput};
use tracing::debug;

/// Adjustments applied to the base amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    pub contingency: f64,
    pub discount: f64,
    pub retainage: f64,
}

/// Platform and processor fees charged on the subtotal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fees {
    pub platform: f64,
    pub processor: f64,
}

impl Fees {
    pub fn total(&self) -> f64 {
        self.platform + self.processor
    }
}

/// Quote derivation engine
///
/// Stateless: every method is a pure function of its arguments. The stages are
/// exposed individually so callers (and tests) can inspect intermediate values;
/// [`QuoteEngine::derive`] runs them in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteEngine;

impl QuoteEngine {
    pub fn new() -> Self {
        Self
    }

    /// Base amount: rate × hours, or the fixed bid
    pub fn base(input: &QuoteInput) -> f64 {
        match input.mode {
            PricingMode::Hourly => input.rate * input.hours,
            PricingMode::Fixed => input.fixed_bid,
        }
    }

    /// Contingency, discount and retainage as percentages of base
    pub fn adjustments(base: f64, input: &QuoteInput) -> Adjustments {
        Adjustments {
            contingency: base * input.contingency_pct / 100.0,
            discount: base * input.discount_pct / 100.0,
            retainage: base * input.retainage_pct / 100.0,
        }
    }

    /// Base plus contingency minus discount and retainage, floored at zero
    pub fn subtotal(base: f64, adj: &Adjustments) -> f64 {
        (base + adj.contingency - adj.discount - adj.retainage).max(0.0)
    }

    /// Platform fee and processor fee (percentage plus flat charge)
    pub fn fees(subtotal: f64, input: &QuoteInput) -> Fees {
        Fees {
            platform: subtotal * input.platform_fee_pct / 100.0,
            processor: subtotal * input.processor_fee_pct / 100.0 + input.processor_flat_fee,
        }
    }

    /// Tax set-aside on net income; zero when disabled
    pub fn tax_set_aside(net_before_tax: f64, input: &QuoteInput) -> f64 {
        if input.tax_set_aside_enabled {
            net_before_tax * input.tax_set_aside_pct / 100.0
        } else {
            0.0
        }
    }

    /// Hours the take-home is divided by for the effective hourly rate
    ///
    /// Hourly mode uses `hours` as entered, zero included. Fixed mode prefers
    /// a positive `planned_hours`, then a positive `hours`, then 1.
    pub fn hours_divisor(input: &QuoteInput) -> f64 {
        match input.mode {
            PricingMode::Hourly => input.hours,
            PricingMode::Fixed => match input.planned_hours {
                Some(planned) if planned > 0.0 => planned,
                _ if input.hours > 0.0 => input.hours,
                _ => 1.0,
            },
        }
    }

    /// Run the full pipeline
    pub fn derive(&self, input: &QuoteInput) -> QuoteOutput {
        let input = input.sanitized();

        let base = Self::base(&input);
        let adj = Self::adjustments(base, &input);
        let subtotal = Self::subtotal(base, &adj);
        let gross = subtotal;

        let fees = Self::fees(subtotal, &input);
        let total_fees = fees.total();

        let expenses_total = input.expenses_total();
        let net_before_tax = gross - expenses_total - total_fees;
        let tax_set_aside_amount = Self::tax_set_aside(net_before_tax, &input);
        let take_home = net_before_tax - tax_set_aside_amount;

        let hours_divisor = Self::hours_divisor(&input);
        let effective_hourly_rate = take_home / hours_divisor;

        let payment_schedule = PaymentSchedule::split(
            gross,
            input.deposit_pct,
            input.progress_pct,
            input.final_pct,
        );

        debug!(
            mode = ?input.mode,
            base,
            subtotal,
            total_fees,
            net_before_tax,
            take_home,
            "Derived quote"
        );

        QuoteOutput {
            base,
            contingency_amount: adj.contingency,
            discount_amount: adj.discount,
            retainage_amount: adj.retainage,
            subtotal,
            gross,
            platform_fee_amount: fees.platform,
            processor_fee_amount: fees.processor,
            total_fees,
            expenses_total,
            net_before_tax,
            tax_set_aside_amount,
            take_home,
            effective_hourly_rate,
            hours_divisor,
            payment_schedule,
        }
    }
}

/// Derive every output figure from `input`
pub fn derive(input: &QuoteInput) -> QuoteOutput {
    QuoteEngine::new().derive(input)
}
