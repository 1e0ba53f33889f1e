use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use quote_engine::{BreakdownFormatter, QuoteConfig, QuoteField, QuoteSession};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, Level};

use crate::cli::display::{render_summary, QuoteReport};
use crate::cli::interactive::InteractiveCLI;

#[derive(Parser, Debug)]
#[command(name = "quote-calculator")]
#[command(about = "Contractor pay calculator - fees, expenses, tax set-aside and payment schedule")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (defaults to QUOTE_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a quote and print the summary
    Derive {
        #[command(flatten)]
        quote: QuoteArgs,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or export the plain-text breakdown
    Breakdown {
        #[command(flatten)]
        quote: QuoteArgs,

        /// Write the breakdown to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Title line for the breakdown
        #[arg(long)]
        title: Option<String>,
    },

    /// Edit a quote field by field
    Interactive {
        #[command(flatten)]
        quote: QuoteArgs,
    },

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Quote fields as entered; every value goes through parse-or-default
#[derive(Args, Debug, Default, Clone)]
pub struct QuoteArgs {
    /// hourly or fixed
    #[arg(long)]
    mode: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    rate: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    hours: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    fixed_bid: Option<String>,
    /// Hours planned for a fixed bid (divisor for the effective rate)
    #[arg(long, allow_negative_numbers = true)]
    planned_hours: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    materials: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    subcontractors: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    mileage: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    other_expenses: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    platform_fee_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    processor_fee_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    processor_flat_fee: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    contingency_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    discount_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    retainage_pct: Option<String>,
    /// on or off
    #[arg(long)]
    tax_set_aside: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    tax_set_aside_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    deposit_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    progress_pct: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    final_pct: Option<String>,
}

impl QuoteArgs {
    /// Fields given on the command line, in declaration order
    pub fn edits(&self) -> Vec<(QuoteField, &str)> {
        let entries = [
            (QuoteField::Mode, &self.mode),
            (QuoteField::Rate, &self.rate),
            (QuoteField::Hours, &self.hours),
            (QuoteField::FixedBid, &self.fixed_bid),
            (QuoteField::PlannedHours, &self.planned_hours),
            (QuoteField::Materials, &self.materials),
            (QuoteField::Subcontractors, &self.subcontractors),
            (QuoteField::Mileage, &self.mileage),
            (QuoteField::OtherExpenses, &self.other_expenses),
            (QuoteField::PlatformFeePct, &self.platform_fee_pct),
            (QuoteField::ProcessorFeePct, &self.processor_fee_pct),
            (QuoteField::ProcessorFlatFee, &self.processor_flat_fee),
            (QuoteField::ContingencyPct, &self.contingency_pct),
            (QuoteField::DiscountPct, &self.discount_pct),
            (QuoteField::RetainagePct, &self.retainage_pct),
            (QuoteField::TaxSetAsideEnabled, &self.tax_set_aside),
            (QuoteField::TaxSetAsidePct, &self.tax_set_aside_pct),
            (QuoteField::DepositPct, &self.deposit_pct),
            (QuoteField::ProgressPct, &self.progress_pct),
            (QuoteField::FinalPct, &self.final_pct),
        ];
        entries
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
            .collect()
    }

    /// Apply the given fields on top of the session's current input
    pub fn apply(&self, session: &mut QuoteSession) -> Result<()> {
        for (field, raw) in self.edits() {
            session
                .set_raw(field, raw)
                .with_context(|| format!("invalid value for --{}", field.name().replace('_', "-")))?;
        }
        Ok(())
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);
    // A second init (tests, embedding) is not an error worth failing on
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn build_session(config: &QuoteConfig, quote: &QuoteArgs, title: Option<String>) -> Result<QuoteSession> {
    let title = title.unwrap_or_else(|| config.formatter.title.clone());
    let mut session =
        QuoteSession::with_formatter(config.defaults.clone(), BreakdownFormatter::new(title));
    quote.apply(&mut session)?;
    Ok(session)
}

pub fn handle_commands(cli: Cli) -> Result<()> {
    let config = QuoteConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load config {}", path.display()),
        None => "failed to load config from environment".to_string(),
    })?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Derive { quote, json } => {
            let session = build_session(&config, &quote, None)?;
            if json {
                writeln!(out, "{}", QuoteReport::new(session.input(), session.output()).to_json()?)?;
            } else {
                write!(out, "{}", render_summary(session.input(), session.output()))?;
            }
        }

        Commands::Breakdown { quote, out: path, title } => {
            let session = build_session(&config, &quote, title)?;
            let text = session.breakdown();
            match path {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", text))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Breakdown written to {}", path.display());
                    writeln!(out, "{} {}", "✅ Breakdown written to".green(), path.display())?;
                }
                None => writeln!(out, "{}", text)?,
            }
        }

        Commands::Interactive { quote } => {
            let session = build_session(&config, &quote, None)?;
            let stdin = io::stdin();
            let mut cli = InteractiveCLI::new(session, config.defaults.clone());
            cli.run(stdin.lock(), &mut out)?;
        }

        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            QuoteConfig::default()
                .to_file(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(out, "{} {}", "✅ Default configuration written to".green(), path.display())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_engine::PricingMode;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["quote-calculator"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_derive_flags_are_applied() {
        let cli = parse(&["derive", "--mode", "fixed", "--fixed-bid", "$2,000", "--tax-set-aside", "off"]);
        let Commands::Derive { quote, json } = cli.command else {
            panic!("expected derive");
        };
        assert!(!json);

        let session = build_session(&QuoteConfig::default(), &quote, None).unwrap();
        assert_eq!(session.input().mode, PricingMode::Fixed);
        assert_eq!(session.output().base, 2000.0);
        assert_eq!(session.output().tax_set_aside_amount, 0.0);
    }

    #[test]
    fn test_malformed_number_becomes_zero() {
        let cli = parse(&["derive", "--rate", "abc"]);
        let Commands::Derive { quote, .. } = cli.command else {
            panic!("expected derive");
        };
        let session = build_session(&QuoteConfig::default(), &quote, None).unwrap();
        assert_eq!(session.output().base, 0.0);
    }

    #[test]
    fn test_bad_mode_is_reported() {
        let cli = parse(&["derive", "--mode", "weekly"]);
        let Commands::Derive { quote, .. } = cli.command else {
            panic!("expected derive");
        };
        let err = build_session(&QuoteConfig::default(), &quote, None).unwrap_err();
        assert!(err.to_string().contains("--mode"));
    }

    #[test]
    fn test_breakdown_title_override() {
        let cli = parse(&["breakdown", "--title", "Porch repair"]);
        let Commands::Breakdown { quote, title, out } = cli.command else {
            panic!("expected breakdown");
        };
        assert!(out.is_none());
        let session = build_session(&QuoteConfig::default(), &quote, title).unwrap();
        assert!(session.breakdown().starts_with("Porch repair\n"));
    }

    #[test]
    fn test_edits_only_include_given_flags() {
        let args = QuoteArgs { hours: Some("8".into()), final_pct: Some("50".into()), ..Default::default() };
        let edits = args.edits();
        assert_eq!(edits, vec![(QuoteField::Hours, "8"), (QuoteField::FinalPct, "50")]);
    }

    #[test]
    fn test_negative_values_after_a_space() {
        let cli = parse(&["derive", "--materials", "-50", "--discount-pct", "-10"]);
        let Commands::Derive { quote, .. } = cli.command else {
            panic!("expected derive");
        };
        let session = build_session(&QuoteConfig::default(), &quote, None).unwrap();
        assert_eq!(session.output().expenses_total, -50.0);
        assert_eq!(session.input().discount_pct, -10.0);
        // 780 base, discount of -10% adds 78
        assert_eq!(session.output().subtotal, 858.0);
    }

    #[test]
    fn test_breakdown_export_writes_file() {
        let path = std::env::temp_dir()
            .join(format!("quote-calculator-breakdown-{}.txt", std::process::id()));
        let path_arg = path.to_string_lossy().into_owned();

        handle_commands(parse(&["breakdown", "--title", "Deck", "--hours", "10", "--out", &path_arg])).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut expected = QuoteSession::with_formatter(
            quote_engine::QuoteInput::default(),
            BreakdownFormatter::new("Deck"),
        );
        expected.set_raw(QuoteField::Hours, "10").unwrap();
        assert_eq!(written, format!("{}\n", expected.breakdown()));
        assert!(written.starts_with("Deck\nMode: Hourly\nRate x Hours: $65.00 × 10 = $650.00\n"));
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let path = std::env::temp_dir()
            .join(format!("quote-calculator-init-{}.toml", std::process::id()));
        let path_arg = path.to_string_lossy().into_owned();
        std::fs::write(&path, "# keep me\n").unwrap();

        let err = handle_commands(parse(&["init-config", &path_arg])).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# keep me\n");

        handle_commands(parse(&["init-config", &path_arg, "--force"])).unwrap();
        let loaded = QuoteConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, QuoteConfig::default());
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["--log-level", "debug", "init-config", "quote.toml", "--force"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::InitConfig { force: true, .. }));
    }
}
