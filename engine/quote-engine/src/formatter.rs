//! Plain-text rendering of a derived quote
//!
//! The breakdown is what the calculator exports for pasting into an email or
//! invoice. Currency is always USD with two fraction digits; amounts are
//! rounded to the cent with `rust_decimal` so display never shows binary
//! floating-point noise.

use crate::types::{PricingMode, QuoteInput, QuoteOutput};
use crate::DEFAULT_BREAKDOWN_TITLE;
use rust_decimal::prelude::*;

/// Format a dollar amount as `$1,234.56` / `-$1,234.56`
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let digits = match Decimal::from_f64(value) {
        Some(d) => {
            let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        // Beyond Decimal's range; fall back to float formatting
        None => format!("{:.2}", value),
    };

    let (negative, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits.as_str()),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    let grouped = group_thousands(whole);

    // "-0.00" reads as a sign error
    if negative && (whole.chars().any(|c| c != '0') || frac.chars().any(|c| c != '0')) {
        format!("-${}.{}", grouped, frac)
    } else {
        format!("${}.{}", grouped, frac)
    }
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Shortest decimal rendering of a percentage or count (`20`, `2.9`)
pub fn format_percent(value: f64) -> String {
    format!("{}", value)
}

/// Renders the multi-line breakdown text
#[derive(Debug, Clone)]
pub struct BreakdownFormatter {
    title: String,
}

impl Default for BreakdownFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKDOWN_TITLE)
    }
}

impl BreakdownFormatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn format(&self, input: &QuoteInput, output: &QuoteOutput) -> String {
        let input = input.sanitized();
        let money = format_money;
        let pct = format_percent;
        let schedule = &output.payment_schedule;
        let weights = &schedule.normalized_weights;

        let base_line = match input.mode {
            PricingMode::Hourly => format!(
                "Rate x Hours: {} × {} = {}",
                money(input.rate),
                pct(input.hours),
                money(output.base)
            ),
            PricingMode::Fixed => format!("Fixed Bid: {}", money(output.base)),
        };

        let tax_line = if input.tax_set_aside_enabled {
            format!(
                "Tax Set-Aside: {}% → -{}",
                pct(input.tax_set_aside_pct),
                money(output.tax_set_aside_amount)
            )
        } else {
            "Tax Set-Aside: OFF".to_string()
        };

        let lines = [
            self.title.clone(),
            format!("Mode: {}", input.mode.label()),
            base_line,
            format!("Contingency: {}% → {}", pct(input.contingency_pct), money(output.contingency_amount)),
            format!("Discount: {}% → -{}", pct(input.discount_pct), money(output.discount_amount)),
            format!("Retainage: {}% → -{}", pct(input.retainage_pct), money(output.retainage_amount)),
            format!("Subtotal (pre-fees/exp): {}", money(output.subtotal)),
            format!("Platform Fee: {}% → -{}", pct(input.platform_fee_pct), money(output.platform_fee_amount)),
            format!(
                "Processor Fee: {}% + ${:.2} → -{}",
                pct(input.processor_fee_pct),
                input.processor_flat_fee,
                money(output.processor_fee_amount)
            ),
            format!(
                "Expenses: -{}  (materials {}, subs {}, mileage {}, other {})",
                money(output.expenses_total),
                money(input.materials),
                money(input.subcontractors),
                money(input.mileage),
                money(input.other_expenses)
            ),
            format!("Net before Tax: {}", money(output.net_before_tax)),
            tax_line,
            format!("Estimated Take-Home: {}", money(output.take_home)),
            String::new(),
            format!("Payment Schedule (of Gross {}):", money(output.gross)),
            format!("• Deposit ({:.0}%): {}", weights.deposit, money(schedule.deposit_amount)),
            format!("• Progress ({:.0}%): {}", weights.progress, money(schedule.progress_amount)),
            format!("• Final ({:.0}%): {}", weights.final_, money(schedule.final_amount)),
            String::new(),
            format!("Effective Hourly: {}/hr", money(output.effective_hourly_rate)),
        ];

        lines.join("\n")
    }
}

/// Breakdown text with the default title
pub fn format_breakdown(input: &QuoteInput, output: &QuoteOutput) -> String {
    BreakdownFormatter::default().format(input, output)
}

/// Label/value pairs for the results panel
pub fn summary_rows(input: &QuoteInput, output: &QuoteOutput) -> Vec<(String, String)> {
    let input = input.sanitized();
    let tax_label = if input.tax_set_aside_enabled {
        format!("Tax set-aside ({}%)", format_percent(input.tax_set_aside_pct))
    } else {
        "Tax set-aside (off)".to_string()
    };

    vec![
        ("Gross (invoice)".to_string(), format_money(output.gross)),
        ("Expenses".to_string(), format_money(output.expenses_total)),
        ("Fees (platform+processor)".to_string(), format_money(output.total_fees)),
        ("Net before tax".to_string(), format_money(output.net_before_tax)),
        (tax_label, format_money(output.tax_set_aside_amount)),
        ("Estimated take-home".to_string(), format_money(output.take_home)),
        ("Effective hourly".to_string(), format!("{}/hr", format_money(output.effective_hourly_rate))),
    ]
}

/// Explains which hours the effective rate was divided by
pub fn effective_rate_note(input: &QuoteInput, output: &QuoteOutput) -> String {
    match input.mode {
        PricingMode::Hourly => format!(
            "Based on estimated take-home divided by {} hours.",
            format_percent(output.hours_divisor)
        ),
        PricingMode::Fixed => format!(
            "Based on estimated take-home divided by {} planned hours.",
            format_percent(output.hours_divisor)
        ),
    }
}
