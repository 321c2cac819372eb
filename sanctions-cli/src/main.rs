use anyhow::Result;
use clap::Parser;
use std::path::Path;

use acp_sanctions::report::{format_analytics, format_listing, format_summary, ReviewStatus};
use sanctions_core::config::DEFAULT_CONFIG_PATH;
use sanctions_core::{
    ActionLog, AnalysisConfig, EvaluationOutcome, ExportFormat, ExportLayout, FileActionLog, SanctionError,
    SanctionId, SanctionProcessor, SanctionSession,
};

#[derive(Parser)]
#[command(name = "acp-sanctions")]
#[command(about = "Flag multi-account abuse in ACP login logs and export sanction recommendations")]
struct Args {
    /// ACP export to analyse (default: input_path from the config)
    #[arg(short, long)]
    input: Option<String>,

    /// Path to config file (YAML format). Without it sanctions.yaml is used
    /// and created with defaults on first run
    #[arg(short, long)]
    config: Option<String>,

    /// Keep only sanctions whose account id or social club list contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Drop a sanction by id before saving or exporting (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "ID")]
    exclude: Vec<String>,

    /// Export the remaining sanctions to this path
    #[arg(short, long)]
    export: Option<String>,

    /// Export format: csv or json (default: export.format from the config)
    #[arg(long)]
    format: Option<String>,

    /// Four-column CSV without the Benutzername column
    #[arg(long)]
    legacy_layout: bool,

    /// Save the remaining sanctions to default_export_path from the config
    #[arg(short, long)]
    save: bool,

    /// Only print the summary, not the grouped listing
    #[arg(long)]
    summary: bool,

    /// Print the grouped listing (default unless --summary is given)
    #[arg(short, long)]
    list: bool,

    /// Write input analytics and sanction counts as JSON to this path
    #[arg(long)]
    analytics: Option<String>,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("🛡️  ACP Sanctions");

    let config = load_config(&args);
    let action_log = FileActionLog::new(&config.log_file_path);
    let input = args.input.clone().unwrap_or_else(|| config.input_path.clone());

    record(&action_log, &format!("Analyse gestartet: {input}"));

    if let Err(e) = run(&args, &config, &input, &action_log) {
        eprintln!("❌ {e}");
        record(&action_log, &format!("Fehler: {e}"));
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args, config: &AnalysisConfig, input: &str, action_log: &dyn ActionLog) -> Result<()> {
    // Resolve output settings up front so a bad --format fails before any work
    let format: ExportFormat = args.format.as_deref().unwrap_or(&config.export.format).parse()?;
    let layout = if args.legacy_layout {
        ExportLayout::Legacy
    } else {
        ExportLayout::from_include_username(config.export.include_username)
    };

    let processor = SanctionProcessor::new(config);

    println!("📄 Processing: {input}");
    let mut session = if args.profile {
        let run = processor.process_file_with_profiling(input, true)?;
        SanctionSession::from_run(run, Some(input.into()))
    } else {
        SanctionSession::load(&processor, input)?
    };
    println!("{}", format_analytics(session.analytics()));

    if let Some(path) = &args.analytics {
        save_analytics(&session, input, path)?;
    }

    // decided on the evaluation itself, before any review step narrows it
    let evaluated = session.outcome();
    if evaluated == EvaluationOutcome::ViolationsFound {
        record(
            action_log,
            &format!("Verstöße gefunden: {} Sanktionen", session.summary().total_records()),
        );
    }

    for id in &args.exclude {
        match session.remove(&SanctionId::from(id.as_str())) {
            Ok(removed) => {
                println!("🗑️  Entfernt: [{}] {} ({})", id, removed.account_id, removed.rule_reference);
                record(action_log, &format!("Sanktion entfernt: {} {}", removed.rule_reference, removed.account_id));
            }
            Err(e @ SanctionError::SanctionNotFound { .. }) => println!("⚠️  {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    let view = session.filter(args.filter.as_deref().unwrap_or(""));

    match ReviewStatus::of(evaluated, &view) {
        ReviewStatus::NoViolations => {
            println!("\n✅ Keine Verstöße gefunden");
            record(action_log, "Keine Verstöße gefunden");
            return Ok(());
        }
        ReviewStatus::AllHidden => {
            println!("\n🔍 0 Sanktionen nach Filter");
            record(action_log, "0 Sanktionen nach Filter");
        }
        ReviewStatus::Sanctions(_) => {
            if args.list || !args.summary {
                println!("{}", format_listing(view.evaluation()));
            }
            println!("\n{}", format_summary(&view.summary()));
        }
    }

    let records = view.all_records();

    if args.save {
        view.export(&records, &config.default_export_path, format, layout)?;
        println!("💾 Sanktionen gespeichert: {}", config.default_export_path);
        record(action_log, &format!("Sanktionen gespeichert: {}", config.default_export_path));
    }

    if let Some(path) = &args.export {
        view.export(&records, path, format, layout)?;
        println!("💾 Sanktionen exportiert: {path}");
        record(action_log, &format!("Sanktionen exportiert: {path}"));
    }

    Ok(())
}

/// `--config` falls back to defaults when unreadable; the implicit config is bootstrapped
fn load_config(args: &Args) -> AnalysisConfig {
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {config_path}");
        return AnalysisConfig::load_with_fallback(Some(config_path));
    }

    match AnalysisConfig::load_or_init(DEFAULT_CONFIG_PATH) {
        Ok(config) => {
            println!("📋 Using config: {DEFAULT_CONFIG_PATH}");
            config
        }
        Err(e) => {
            println!("⚠️  Could not use {DEFAULT_CONFIG_PATH} ({e}), using default config");
            AnalysisConfig::default()
        }
    }
}

fn save_analytics(session: &SanctionSession, input: &str, output_path: &str) -> Result<()> {
    let summary = serde_json::json!({
        "input": input,
        "run_id": session.run_id(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "analytics": session.analytics(),
        "sanctions": session.summary(),
    });
    if let Some(parent) = Path::new(output_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, serde_json::to_string_pretty(&summary)?)?;
    println!("💾 Analytics saved to: {output_path}");
    Ok(())
}

/// Action log failures never abort a run
fn record(action_log: &dyn ActionLog, message: &str) {
    if let Err(e) = action_log.record(message) {
        log::warn!("Could not write action log: {e}");
    }
}
