use colored::*;
use quote_engine::formatter::effective_rate_note;
use quote_engine::{format_money, summary_rows, QuoteInput, QuoteOutput};
use serde::Serialize;

/// JSON shape for `--json` output
#[derive(Serialize)]
pub struct QuoteReport<'a> {
    pub ok: bool,
    pub input: &'a QuoteInput,
    pub output: &'a QuoteOutput,
}

impl<'a> QuoteReport<'a> {
    pub fn new(input: &'a QuoteInput, output: &'a QuoteOutput) -> Self {
        Self { ok: true, input, output }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Results panel: headline figures, payment schedule and the hours note
pub fn render_summary(input: &QuoteInput, output: &QuoteOutput) -> String {
    let mut out = String::new();
    let rows = summary_rows(input, output);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    out.push_str(&format!("{}\n", format!("── Quote ({}) ──", input.mode.label()).cyan().bold()));
    for (label, value) in &rows {
        let line = format!("  {:<width$}  {:>14}", label, value, width = width);
        if label == "Estimated take-home" {
            out.push_str(&format!("{}\n", line.green().bold()));
        } else if value.starts_with('-') {
            out.push_str(&format!("{}\n", line.red()));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }

    let schedule = &output.payment_schedule;
    let weights = &schedule.normalized_weights;
    out.push_str(&format!(
        "{}\n",
        format!("── Payment schedule (split of gross {}) ──", format_money(output.gross)).cyan().bold()
    ));
    for (name, weight, amount) in [
        ("Deposit", weights.deposit, schedule.deposit_amount),
        ("Progress", weights.progress, schedule.progress_amount),
        ("Final", weights.final_, schedule.final_amount),
    ] {
        out.push_str(&format!("  {:<10} {:>4.0}%  {:>14}\n", name, weight, format_money(amount)));
    }

    out.push_str(&format!("{}\n", effective_rate_note(input, output).dimmed()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_engine::derive;

    #[test]
    fn test_summary_contains_headline_figures() {
        colored::control::set_override(false);
        let input = QuoteInput::default();
        let output = derive(&input);
        let text = render_summary(&input, &output);

        assert!(text.contains("Quote (Hourly)"));
        assert!(text.contains("Gross (invoice)"));
        assert!(text.contains("$780.00"));
        assert!(text.contains("$605.66"));
        assert!(text.contains("Deposit"));
        assert!(text.contains("$234.00"));
        assert!(text.contains("divided by 12 hours"));
    }

    #[test]
    fn test_report_json() {
        let input = QuoteInput::default();
        let output = derive(&input);
        let json: serde_json::Value =
            serde_json::from_str(&QuoteReport::new(&input, &output).to_json().unwrap()).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["input"]["mode"], "hourly");
        assert_eq!(json["output"]["base"], 780.0);
        assert_eq!(json["output"]["payment_schedule"]["normalized_weights"]["final"].as_f64().map(|w| w.round()), Some(30.0));
    }
}
