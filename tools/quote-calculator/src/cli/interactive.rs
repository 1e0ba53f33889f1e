use colored::*;
use quote_engine::{parse_toggle, PricingMode, QuoteField, QuoteInput, QuoteSession};
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::cli::display::{render_summary, QuoteReport};

/// Line-oriented quote editor; every edit re-derives and redisplays
pub struct InteractiveCLI {
    session: QuoteSession,
    defaults: QuoteInput,
}

enum Flow {
    Continue,
    Exit,
}

impl InteractiveCLI {
    pub fn new(session: QuoteSession, defaults: QuoteInput) -> Self {
        Self { session, defaults }
    }

    #[cfg(test)]
    pub fn session(&self) -> &QuoteSession {
        &self.session
    }

    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, out: &mut W) -> io::Result<()> {
        self.show_welcome(out)?;
        write!(out, "{}", render_summary(self.session.input(), self.session.output()))?;

        let mut lines = reader.lines();
        loop {
            write!(out, "{}", "quote> ".cyan().bold())?;
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if let Flow::Exit = self.handle_line(line.trim(), out)? {
                break;
            }
        }

        writeln!(out, "👋 Goodbye!")?;
        Ok(())
    }

    fn show_welcome<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", "╔══════════════════════════════════════════════╗".cyan())?;
        writeln!(out, "{}", "║         CONTRACTOR QUOTE CALCULATOR          ║".cyan())?;
        writeln!(out, "{}", "╚══════════════════════════════════════════════╝".cyan())?;
        writeln!(out, "{}", "Type 'help' for commands, 'fields' for editable fields.".yellow())?;
        writeln!(out)
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let mut parts = line.splitn(3, char::is_whitespace);
        let command = parts.next().unwrap_or("").to_lowercase();
        let arg1 = parts.next().unwrap_or("").trim();
        let rest = parts.next().unwrap_or("").trim();
        debug!(command = command.as_str(), "Interactive command");

        match command.as_str() {
            "" => {}
            "exit" | "quit" | "q" => return Ok(Flow::Exit),
            "help" | "?" => self.show_help(out)?,
            "show" | "summary" => self.show_summary(out)?,
            "breakdown" | "copy" => writeln!(out, "{}", self.session.breakdown())?,
            "json" => {
                let report = QuoteReport::new(self.session.input(), self.session.output());
                match report.to_json() {
                    Ok(json) => writeln!(out, "{}", json)?,
                    Err(e) => writeln!(out, "{} {}", "❌".red(), e)?,
                }
            }
            "fields" => self.show_fields(out)?,
            "reset" => {
                self.session.reset(self.defaults.clone());
                self.show_summary(out)?;
            }
            "mode" => match arg1.parse::<PricingMode>() {
                Ok(mode) => {
                    self.session.set_mode(mode);
                    self.show_summary(out)?;
                }
                Err(e) => writeln!(out, "{} {}", "❌".red(), e)?,
            },
            "tax" => match parse_toggle(arg1) {
                Some(enabled) => {
                    self.session.set_tax_set_aside(enabled);
                    self.show_summary(out)?;
                }
                None => writeln!(out, "{}", "❌ Usage: tax <on|off>".red())?,
            },
            "set" => {
                if arg1.is_empty() {
                    writeln!(out, "{}", "❌ Usage: set <field> <value>".red())?;
                } else {
                    match self.session.set_named(arg1, rest) {
                        Ok(()) => self.show_summary(out)?,
                        Err(e) => writeln!(out, "{} {}", "❌".red(), e)?,
                    }
                }
            }
            _ => writeln!(out, "{}", "❌ Unknown command. Type 'help' for available commands.".red())?,
        }
        Ok(Flow::Continue)
    }

    fn show_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", render_summary(self.session.input(), self.session.output()))
    }

    fn show_fields<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for field in QuoteField::ALL {
            writeln!(out, "  {:<24} {}", field.name().yellow(), self.session.value_of(field))?;
        }
        Ok(())
    }

    fn show_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "Commands:".bold())?;
        writeln!(out, "  set <field> <value>   edit a field (bad numbers count as 0)")?;
        writeln!(out, "  mode <hourly|fixed>   switch pricing mode")?;
        writeln!(out, "  tax <on|off>          toggle the tax set-aside")?;
        writeln!(out, "  show                  results panel")?;
        writeln!(out, "  breakdown             plain-text breakdown for export")?;
        writeln!(out, "  json                  input and output as JSON")?;
        writeln!(out, "  fields                editable fields and current values")?;
        writeln!(out, "  reset                 back to the configured defaults")?;
        writeln!(out, "  exit                  leave")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> (InteractiveCLI, String) {
        colored::control::set_override(false);
        let mut cli = InteractiveCLI::new(QuoteSession::default(), QuoteInput::default());
        let mut out = Vec::new();
        cli.run(script.as_bytes(), &mut out).unwrap();
        (cli, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_set_recomputes_immediately() {
        let (cli, out) = run_script("set hours 10\nexit\n");
        assert_eq!(cli.session().output().base, 650.0);
        assert!(out.contains("$650.00"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_mode_tax_and_breakdown() {
        let (cli, out) = run_script("mode fixed\ntax off\nbreakdown\n");
        assert_eq!(cli.session().input().mode, PricingMode::Fixed);
        assert!(!cli.session().input().tax_set_aside_enabled);
        assert!(out.contains("Fixed Bid: $1,200.00"));
        assert!(out.contains("Tax Set-Aside: OFF"));
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let (cli, out) = run_script("set colour 4\nmode weekly\nbogus\nset rate 70\n");
        assert!(out.contains("Unknown quote field: colour"));
        assert!(out.contains("Invalid pricing mode"));
        assert!(out.contains("Unknown command"));
        assert_eq!(cli.session().input().rate, 70.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (cli, _) = run_script("set rate 10\nset materials 99\nreset\n");
        assert_eq!(cli.session().input(), &QuoteInput::default());
    }

    #[test]
    fn test_fields_and_json() {
        let (_, out) = run_script("fields\njson\n");
        assert!(out.contains("processor_fee_pct"));
        assert!(out.contains("\"take_home\""));
    }
}
