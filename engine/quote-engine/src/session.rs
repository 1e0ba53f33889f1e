//! Interactive quote session
//!
//! Owns a single [`QuoteInput`] and the [`QuoteOutput`] derived from it. Every
//! setter re-derives before returning, so `output()` always reflects the
//! current input and callers never observe a half-applied edit.

use crate::coercion::{parse_amount, parse_toggle};
use crate::engine::QuoteEngine;
use crate::error::{QuoteError, Result};
use crate::formatter::BreakdownFormatter;
use crate::types::{PricingMode, QuoteInput, QuoteOutput};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Editable fields of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    Mode,
    Rate,
    Hours,
    FixedBid,
    PlannedHours,
    Materials,
    Subcontractors,
    Mileage,
    OtherExpenses,
    PlatformFeePct,
    ProcessorFeePct,
    ProcessorFlatFee,
    ContingencyPct,
    DiscountPct,
    RetainagePct,
    TaxSetAsideEnabled,
    TaxSetAsidePct,
    DepositPct,
    ProgressPct,
    FinalPct,
}

impl QuoteField {
    pub const ALL: [QuoteField; 20] = [
        QuoteField::Mode,
        QuoteField::Rate,
        QuoteField::Hours,
        QuoteField::FixedBid,
        QuoteField::PlannedHours,
        QuoteField::Materials,
        QuoteField::Subcontractors,
        QuoteField::Mileage,
        QuoteField::OtherExpenses,
        QuoteField::PlatformFeePct,
        QuoteField::ProcessorFeePct,
        QuoteField::ProcessorFlatFee,
        QuoteField::ContingencyPct,
        QuoteField::DiscountPct,
        QuoteField::RetainagePct,
        QuoteField::TaxSetAsideEnabled,
        QuoteField::TaxSetAsidePct,
        QuoteField::DepositPct,
        QuoteField::ProgressPct,
        QuoteField::FinalPct,
    ];

    /// Canonical snake_case name (matches the config keys)
    pub fn name(&self) -> &'static str {
        match self {
            QuoteField::Mode => "mode",
            QuoteField::Rate => "rate",
            QuoteField::Hours => "hours",
            QuoteField::FixedBid => "fixed_bid",
            QuoteField::PlannedHours => "planned_hours",
            QuoteField::Materials => "materials",
            QuoteField::Subcontractors => "subcontractors",
            QuoteField::Mileage => "mileage",
            QuoteField::OtherExpenses => "other_expenses",
            QuoteField::PlatformFeePct => "platform_fee_pct",
            QuoteField::ProcessorFeePct => "processor_fee_pct",
            QuoteField::ProcessorFlatFee => "processor_flat_fee",
            QuoteField::ContingencyPct => "contingency_pct",
            QuoteField::DiscountPct => "discount_pct",
            QuoteField::RetainagePct => "retainage_pct",
            QuoteField::TaxSetAsideEnabled => "tax_set_aside_enabled",
            QuoteField::TaxSetAsidePct => "tax_set_aside_pct",
            QuoteField::DepositPct => "deposit_pct",
            QuoteField::ProgressPct => "progress_pct",
            QuoteField::FinalPct => "final_pct",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, QuoteField::Mode | QuoteField::TaxSetAsideEnabled)
    }
}

impl fmt::Display for QuoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuoteField {
    type Err = QuoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        if let Some(field) = QuoteField::ALL.iter().find(|f| f.name() == key) {
            return Ok(*field);
        }

        let field = match key.as_str() {
            "bid" | "fixed" => QuoteField::FixedBid,
            "planned" => QuoteField::PlannedHours,
            "subs" => QuoteField::Subcontractors,
            "other" | "other_exp" => QuoteField::OtherExpenses,
            "platform" | "platform_fee" => QuoteField::PlatformFeePct,
            "processor" | "processor_fee" => QuoteField::ProcessorFeePct,
            "flat" | "processor_flat" => QuoteField::ProcessorFlatFee,
            "contingency" => QuoteField::ContingencyPct,
            "discount" => QuoteField::DiscountPct,
            "retainage" => QuoteField::RetainagePct,
            "tax" | "tax_pct" | "tax_set_aside" => QuoteField::TaxSetAsidePct,
            "tax_enabled" => QuoteField::TaxSetAsideEnabled,
            "deposit" => QuoteField::DepositPct,
            "progress" => QuoteField::ProgressPct,
            "final" => QuoteField::FinalPct,
            _ => return Err(QuoteError::UnknownField(s.trim().to_string())),
        };
        Ok(field)
    }
}

/// A quote being edited field by field
#[derive(Debug, Clone)]
pub struct QuoteSession {
    engine: QuoteEngine,
    formatter: BreakdownFormatter,
    input: QuoteInput,
    output: QuoteOutput,
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new(QuoteInput::default())
    }
}

impl QuoteSession {
    pub fn new(input: QuoteInput) -> Self {
        Self::with_formatter(input, BreakdownFormatter::default())
    }

    pub fn with_formatter(input: QuoteInput, formatter: BreakdownFormatter) -> Self {
        let engine = QuoteEngine::new();
        let output = engine.derive(&input);
        Self { engine, formatter, input, output }
    }

    pub fn input(&self) -> &QuoteInput {
        &self.input
    }

    pub fn output(&self) -> &QuoteOutput {
        &self.output
    }

    fn recompute(&mut self) {
        self.output = self.engine.derive(&self.input);
    }

    /// Replace the whole input record
    pub fn reset(&mut self, input: QuoteInput) {
        self.input = input;
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: PricingMode) {
        self.input.mode = mode;
        self.recompute();
    }

    pub fn set_tax_set_aside(&mut self, enabled: bool) {
        self.input.tax_set_aside_enabled = enabled;
        self.recompute();
    }

    pub fn set_planned_hours(&mut self, planned: Option<f64>) {
        self.input.planned_hours = planned;
        self.recompute();
    }

    /// Set a numeric field
    pub fn set_number(&mut self, field: QuoteField, value: f64) -> Result<()> {
        let slot = match field {
            QuoteField::Mode | QuoteField::TaxSetAsideEnabled => {
                return Err(QuoteError::NotNumeric(field.name().to_string()));
            }
            QuoteField::PlannedHours => {
                self.set_planned_hours(Some(value));
                return Ok(());
            }
            QuoteField::Rate => &mut self.input.rate,
            QuoteField::Hours => &mut self.input.hours,
            QuoteField::FixedBid => &mut self.input.fixed_bid,
            QuoteField::Materials => &mut self.input.materials,
            QuoteField::Subcontractors => &mut self.input.subcontractors,
            QuoteField::Mileage => &mut self.input.mileage,
            QuoteField::OtherExpenses => &mut self.input.other_expenses,
            QuoteField::PlatformFeePct => &mut self.input.platform_fee_pct,
            QuoteField::ProcessorFeePct => &mut self.input.processor_fee_pct,
            QuoteField::ProcessorFlatFee => &mut self.input.processor_flat_fee,
            QuoteField::ContingencyPct => &mut self.input.contingency_pct,
            QuoteField::DiscountPct => &mut self.input.discount_pct,
            QuoteField::RetainagePct => &mut self.input.retainage_pct,
            QuoteField::TaxSetAsidePct => &mut self.input.tax_set_aside_pct,
            QuoteField::DepositPct => &mut self.input.deposit_pct,
            QuoteField::ProgressPct => &mut self.input.progress_pct,
            QuoteField::FinalPct => &mut self.input.final_pct,
        };
        *slot = value;
        self.recompute();
        Ok(())
    }

    /// Set a field from user-entered text
    ///
    /// Numbers go through [`parse_amount`], so malformed text becomes 0 rather
    /// than an error. Only the mode and the tax toggle can reject their text.
    /// An empty entry for planned hours clears it.
    pub fn set_raw(&mut self, field: QuoteField, raw: &str) -> Result<()> {
        debug!(field = field.name(), raw, "Quote field edited");
        match field {
            QuoteField::Mode => {
                self.set_mode(raw.parse()?);
                Ok(())
            }
            QuoteField::TaxSetAsideEnabled => {
                let enabled =
                    parse_toggle(raw).ok_or_else(|| QuoteError::InvalidToggle(raw.trim().to_string()))?;
                self.set_tax_set_aside(enabled);
                Ok(())
            }
            QuoteField::PlannedHours if raw.trim().is_empty() => {
                self.set_planned_hours(None);
                Ok(())
            }
            _ => self.set_number(field, parse_amount(raw)),
        }
    }

    /// Set a field by name, e.g. `("processor", "3.5")`
    pub fn set_named(&mut self, name: &str, raw: &str) -> Result<()> {
        let field: QuoteField = name.parse()?;
        self.set_raw(field, raw)
    }

    /// Current value of a field as display text
    pub fn value_of(&self, field: QuoteField) -> String {
        let i = &self.input;
        let number = match field {
            QuoteField::Mode => return i.mode.label().to_string(),
            QuoteField::TaxSetAsideEnabled => {
                let state = if i.tax_set_aside_enabled { "on" } else { "off" };
                return state.to_string();
            }
            QuoteField::PlannedHours => match i.planned_hours {
                Some(h) => h,
                None => return "unset".to_string(),
            },
            QuoteField::Rate => i.rate,
            QuoteField::Hours => i.hours,
            QuoteField::FixedBid => i.fixed_bid,
            QuoteField::Materials => i.materials,
            QuoteField::Subcontractors => i.subcontractors,
            QuoteField::Mileage => i.mileage,
            QuoteField::OtherExpenses => i.other_expenses,
            QuoteField::PlatformFeePct => i.platform_fee_pct,
            QuoteField::ProcessorFeePct => i.processor_fee_pct,
            QuoteField::ProcessorFlatFee => i.processor_flat_fee,
            QuoteField::ContingencyPct => i.contingency_pct,
            QuoteField::DiscountPct => i.discount_pct,
            QuoteField::RetainagePct => i.retainage_pct,
            QuoteField::TaxSetAsidePct => i.tax_set_aside_pct,
            QuoteField::DepositPct => i.deposit_pct,
            QuoteField::ProgressPct => i.progress_pct,
            QuoteField::FinalPct => i.final_pct,
        };
        format!("{}", number)
    }

    /// Breakdown text for the current state
    pub fn breakdown(&self) -> String {
        self.formatter.format(&self.input, &self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::derive;

    #[test]
    fn test_field_names_round_trip() {
        for field in QuoteField::ALL {
            assert_eq!(field.name().parse::<QuoteField>().unwrap(), field);
        }
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!("subs".parse::<QuoteField>().unwrap(), QuoteField::Subcontractors);
        assert_eq!("fixed-bid".parse::<QuoteField>().unwrap(), QuoteField::FixedBid);
        assert_eq!("Processor".parse::<QuoteField>().unwrap(), QuoteField::ProcessorFeePct);
        assert_eq!("tax".parse::<QuoteField>().unwrap(), QuoteField::TaxSetAsidePct);
        assert!(matches!("colour".parse::<QuoteField>(), Err(QuoteError::UnknownField(_))));
    }

    #[test]
    fn test_every_setter_recomputes() {
        let mut session = QuoteSession::default();
        assert_eq!(session.output().base, 780.0);

        session.set_number(QuoteField::Hours, 10.0).unwrap();
        assert_eq!(session.output().base, 650.0);

        session.set_mode(PricingMode::Fixed);
        assert_eq!(session.output().base, 1200.0);

        session.set_tax_set_aside(false);
        assert_eq!(session.output().tax_set_aside_amount, 0.0);

        assert_eq!(session.output(), &derive(session.input()));
    }

    #[test]
    fn test_set_raw_coerces_malformed_numbers() {
        let mut session = QuoteSession::default();
        session.set_raw(QuoteField::Rate, "abc").unwrap();
        assert_eq!(session.input().rate, 0.0);
        assert_eq!(session.output().base, 0.0);

        session.set_raw(QuoteField::Materials, "$1,250").unwrap();
        assert_eq!(session.output().expenses_total, 1250.0);
    }

    #[test]
    fn test_set_raw_mode_and_toggle() {
        let mut session = QuoteSession::default();
        session.set_raw(QuoteField::Mode, "fixed").unwrap();
        assert_eq!(session.input().mode, PricingMode::Fixed);

        session.set_raw(QuoteField::TaxSetAsideEnabled, "off").unwrap();
        assert!(!session.input().tax_set_aside_enabled);

        assert!(matches!(session.set_raw(QuoteField::Mode, "daily"), Err(QuoteError::InvalidMode(_))));
        assert!(matches!(
            session.set_raw(QuoteField::TaxSetAsideEnabled, "sometimes"),
            Err(QuoteError::InvalidToggle(_))
        ));
        // failed edits leave the state alone
        assert_eq!(session.input().mode, PricingMode::Fixed);
        assert!(!session.input().tax_set_aside_enabled);
    }

    #[test]
    fn test_set_number_rejects_non_numeric_fields() {
        let mut session = QuoteSession::default();
        assert!(matches!(session.set_number(QuoteField::Mode, 1.0), Err(QuoteError::NotNumeric(_))));
    }

    #[test]
    fn test_planned_hours_set_and_clear() {
        let mut session = QuoteSession::default();
        session.set_mode(PricingMode::Fixed);
        session.set_named("planned", "40").unwrap();
        assert_eq!(session.input().planned_hours, Some(40.0));
        assert_eq!(session.output().hours_divisor, 40.0);

        session.set_raw(QuoteField::PlannedHours, "").unwrap();
        assert_eq!(session.input().planned_hours, None);
        assert_eq!(session.output().hours_divisor, 12.0);
    }

    #[test]
    fn test_value_of() {
        let session = QuoteSession::default();
        assert_eq!(session.value_of(QuoteField::Mode), "Hourly");
        assert_eq!(session.value_of(QuoteField::ProcessorFeePct), "2.9");
        assert_eq!(session.value_of(QuoteField::TaxSetAsideEnabled), "on");
        assert_eq!(session.value_of(QuoteField::PlannedHours), "unset");
    }

    #[test]
    fn test_reset_and_breakdown() {
        let mut session = QuoteSession::with_formatter(
            QuoteInput::default(),
            BreakdownFormatter::new("Kitchen remodel"),
        );
        session.set_named("rate", "100").unwrap();
        session.reset(QuoteInput::default());
        assert_eq!(session.output().base, 780.0);
        assert!(session.breakdown().starts_with("Kitchen remodel\n"));
    }
}
