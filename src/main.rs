use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use resuba::io::write_payload;
use resuba::{
    EvaluationRecord, EvaluationReport, RelayClient, RelayConfig, RelayRequest, RelaySession,
    ScoreSheet, ScoringConfig, Verdict, analyze_transcript, evaluate, parse_field_assignment,
    read_payload_file, read_transcript_file,
};

#[derive(Parser)]
#[command(name = "resuba")]
#[command(author, version, about = "Debate scoring calculator (7-axis evaluation)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Manual edits applied on top of the defaults or an imported payload
#[derive(Args, Debug, Clone)]
struct SheetArgs {
    /// Debate topic
    #[arg(long)]
    topic: Option<String>,

    /// Display name of side A
    #[arg(long)]
    side_a: Option<String>,

    /// Display name of side B
    #[arg(long)]
    side_b: Option<String>,

    /// Manual score entry, e.g. A.validity=80 or B.fallacy=30 (repeatable)
    #[arg(long = "set", value_name = "SIDE.AXIS=VALUE")]
    set: Vec<String>,

    /// Manual verdict override (A, B or draw)
    #[arg(long)]
    winner: Option<Verdict>,

    /// Minimum total difference for a non-draw verdict (0-50)
    #[arg(long)]
    draw_threshold: Option<f64>,

    /// Summary reason (repeatable, replaces imported reasons)
    #[arg(long = "reason")]
    reasons: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct ReportArgs {
    /// Write the evaluated report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Write the text report to a file instead of stdout
    #[arg(long)]
    report_text: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a payload (or the default sheet) with optional manual edits
    Score {
        /// Payload file (JSON) to import before applying manual edits
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        report: ReportArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a transcript offline with the heuristic analyzer
    Analyze {
        /// Transcript file, one `name: content` line per turn
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the synthesized payload (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        report: ReportArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Send a transcript to the evaluation relay
    Relay {
        /// Transcript file
        #[arg(short, long)]
        input: PathBuf,

        /// Relay endpoint (defaults to RESUBA_RELAY_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Bearer credential (defaults to RESUBA_RELAY_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Output file for the relay's payload (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        report: ReportArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            sheet,
            report,
            verbose,
        } => {
            setup_logging(verbose);
            score_payload(input, &sheet, &report)
        }
        Commands::Analyze {
            input,
            output,
            sheet,
            report,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(input, output, &sheet, &report)
        }
        Commands::Relay {
            input,
            endpoint,
            api_key,
            timeout_secs,
            output,
            sheet,
            report,
            verbose,
        } => {
            setup_logging(verbose);
            relay(
                input,
                endpoint,
                api_key,
                timeout_secs,
                output,
                &sheet,
                &report,
            )
            .await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn score_payload(input: Option<PathBuf>, args: &SheetArgs, report: &ReportArgs) -> Result<()> {
    let mut sheet = ScoreSheet::default();

    if let Some(path) = input {
        info!("Importing payload from {:?}", path);
        let payload = read_payload_file(&path)?;
        sheet = sheet.apply_payload(&payload);
    }

    let sheet = apply_manual_edits(sheet, args)?;
    render(&sheet, &ScoringConfig::default(), report)
}

fn analyze(
    input: PathBuf,
    output: Option<PathBuf>,
    args: &SheetArgs,
    report: &ReportArgs,
) -> Result<()> {
    info!("Analyzing transcript from {:?}", input);
    let transcript = read_transcript_file(&input)?;

    let base = apply_manual_edits(ScoreSheet::default(), args)?;
    let config = ScoringConfig {
        draw_threshold: base.to_record(&EvaluationRecord::default()).draw_threshold,
        ..Default::default()
    };

    let analysis = analyze_transcript(&transcript, &config);
    info!(
        "Participants: {:?} ({} lines)",
        analysis.participants, analysis.turns
    );
    let payload = analysis.to_payload();

    if let Some(path) = output {
        write_payload(&payload, &path)?;
        info!("Payload written to {:?}", path);
    }

    // Manual edits still beat the synthesized values
    let sheet = apply_manual_edits(ScoreSheet::default().apply_payload(&payload), args)?;
    render(&sheet, &config, report)
}

async fn relay(
    input: PathBuf,
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_secs: u64,
    output: Option<PathBuf>,
    args: &SheetArgs,
    report: &ReportArgs,
) -> Result<()> {
    let transcript = read_transcript_file(&input)?;

    let config = match endpoint {
        Some(endpoint) => RelayConfig::new(
            endpoint,
            api_key.or_else(|| std::env::var("RESUBA_RELAY_API_KEY").ok()),
        )?,
        None => {
            let mut config = RelayConfig::from_env()?;
            if api_key.is_some() {
                config.api_key = api_key;
            }
            config
        }
    }
    .with_timeout(Duration::from_secs(timeout_secs));

    let client = RelayClient::new(config)?;
    info!("Relay endpoint: {}", client.endpoint());

    let request = RelayRequest::new(transcript).with_meta(
        args.topic.as_deref(),
        args.side_a.as_deref(),
        args.side_b.as_deref(),
    );

    let mut session = RelaySession::new(client);
    let pending = session.submit(request);
    let result = tokio::select! {
        result = pending.wait() => result,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            anyhow::bail!("Relay request cancelled");
        }
    };

    let payload = match result {
        Ok(payload) => payload,
        Err(e) => {
            if let Some(raw) = e.raw_text() {
                warn!("Raw relay output:\n{}", raw);
            }
            return Err(e).context("Relay call failed; nothing was applied");
        }
    };

    if let Some(path) = output {
        write_payload(&payload, &path)?;
        info!("Payload written to {:?}", path);
    }

    let sheet = apply_manual_edits(ScoreSheet::default().apply_payload(&payload), args)?;
    render(&sheet, &ScoringConfig::default(), report)
}

fn apply_manual_edits(sheet: ScoreSheet, args: &SheetArgs) -> Result<ScoreSheet> {
    let mut sheet = sheet;

    if let Some(topic) = &args.topic {
        sheet.topic = topic.clone();
    }
    if let Some(name) = &args.side_a {
        sheet.side_a_name = name.clone();
    }
    if let Some(name) = &args.side_b {
        sheet.side_b_name = name.clone();
    }

    for entry in &args.set {
        let assignment = parse_field_assignment(entry)?;
        if assignment.value.is_none() {
            warn!("'{}' is not a number; keeping the previous value", entry);
        }
        sheet = sheet.with_field(assignment.side, assignment.axis, assignment.value);
    }

    if let Some(winner) = args.winner {
        sheet.winner = Some(winner);
    }
    if let Some(threshold) = args.draw_threshold {
        sheet.draw_threshold = Some(threshold);
    }
    if !args.reasons.is_empty() {
        sheet.summary_reasons = args.reasons.join("\n");
    }

    Ok(sheet)
}

fn render(sheet: &ScoreSheet, config: &ScoringConfig, args: &ReportArgs) -> Result<()> {
    let record = sheet.to_record(&EvaluationRecord::default());
    let scorecard = evaluate(&record, &config.weights);
    let report = EvaluationReport::new(record, scorecard);

    match &args.report_text {
        Some(path) => {
            report.write_text(path)?;
            info!("Report written to {:?}", path);
        }
        None => print!("{}", report.format()),
    }

    if let Some(path) = &args.report_json {
        report.write_json(path)?;
        info!("JSON report written to {:?}", path);
    }

    Ok(())
}
