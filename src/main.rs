//! `healthwatch` binary.
//!
//! ```text
//! healthwatch --mode scan
//! healthwatch --mode report --customer acme
//! healthwatch --mode report --customer all
//! ```
//!
//! Missing arguments fall back to interactive stdin prompts; an
//! unrecognized mode or customer exits non-zero. Mode validation happens
//! before configuration loading so argument mistakes surface immediately.

use anyhow::Context;
use clap::Parser;

use healthwatch::configuration::get_configuration;
use healthwatch::mailer::{FileMailer, Mailer, SmtpMailer};
use healthwatch::report::{run_report, CustomerSelection};
use healthwatch::scan::run_scan;
use healthwatch::telemetry::{get_subscriber, init_subscriber};

#[derive(Parser, Debug)]
#[command(
    name = "healthwatch",
    version,
    about = "Poll cloud service health per customer and compile email reports",
    long_about = "Healthwatch: periodic service-health monitoring\n\n\
        scan: poll each configured customer's health API and append the\n\
        current service statuses to the local datastore\n\n\
        report: compile per-customer HTML email reports with status charts\n\
        over the configured reporting window"
)]
struct Cli {
    /// Task to perform: scan (poll APIs) or report (compile emails)
    #[arg(short, long, value_name = "MODE")]
    mode: Option<String>,
    /// Customer name, or "all" (report mode only)
    #[arg(short, long, value_name = "CUSTOMER")]
    customer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Scan,
    Report,
}

/// Read a line from stdin (interactive fallback for missing arguments).
fn read_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Resolve the run mode from the argument or an interactive prompt.
fn resolve_mode(arg: Option<String>) -> anyhow::Result<Mode> {
    let raw = match arg {
        Some(raw) => raw,
        None => {
            eprintln!("select task to perform:");
            eprintln!("  scan   - connect with customer APIs to obtain service health");
            eprintln!("  report - prepare a summary service health report email");
            read_line("Chosen task [scan / report]: ")?
        }
    };
    match raw.to_lowercase().as_str() {
        "scan" => Ok(Mode::Scan),
        "report" => Ok(Mode::Report),
        other => anyhow::bail!("mode [{other}] not recognized"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("healthwatch".into(), "info".into());
    init_subscriber(subscriber);

    let cli = Cli::parse();
    let mode = resolve_mode(cli.mode)?;

    let settings = get_configuration().context("Failed to read configuration.")?;

    let pool = healthwatch::db::connect(&settings.database.path)
        .await
        .context("Failed to open the local datastore.")?;

    match mode {
        Mode::Scan => {
            run_scan(&settings, &pool).await?;
        }
        Mode::Report => {
            let raw = match cli.customer {
                Some(raw) => raw,
                None => {
                    eprintln!("customer argument not provided - options:");
                    eprintln!("  > all");
                    for tenant in &settings.customers {
                        eprintln!("  > {}", tenant.name);
                    }
                    read_line("Chosen customer: ")?
                }
            };
            let selection = CustomerSelection::parse(&raw);
            if let CustomerSelection::Named(name) = &selection {
                if settings.tenant(name).is_none() {
                    anyhow::bail!("customer [{name}] not recognized in configuration");
                }
            }

            let mailer: Box<dyn Mailer> = if settings.smtp.enabled {
                Box::new(SmtpMailer::new(
                    &settings.smtp.server,
                    settings.smtp.port,
                    &settings.smtp.mail_from,
                )?)
            } else {
                tracing::info!("SMTP disabled, reports will be written to disk");
                Box::new(FileMailer::new(&settings.directories.images))
            };

            let reports = run_report(&settings, &pool, mailer.as_ref(), &selection).await?;
            tracing::info!("{} tenant report(s) assembled", reports.len());
        }
    }

    Ok(())
}
