use appraisal_core::adapters::http::HttpOracleClient;
use appraisal_core::audit::log::AuditLog;
use appraisal_core::classify::engine::Classifier;
use appraisal_core::classify::hardware::detect_hardware;
use appraisal_core::config::EngineConfig;
use appraisal_core::determinism::ids::run_id_ulid;
use appraisal_core::error::CoreError;
use appraisal_core::extract::assessment::AssessmentInput;
use appraisal_core::extract::attendance::AttendanceInput;
use appraisal_core::extract::Extractor;
use appraisal_core::portfolio::builder::PortfolioBuilder;
use appraisal_core::portfolio::sources::EvidenceSources;
use appraisal_core::render::portfolio::{render_evidence_index_csv, render_portfolio_markdown};
use appraisal_core::render::report::render_report_markdown;
use appraisal_core::report::generator::ReportGenerator;
use appraisal_core::report::model::{AppraisalInput, GpEvidence};
use appraisal_core::run::recorder::{
    record_classification, record_extraction, record_portfolio_build, record_report,
};
use appraisal_core::storage::portfolio_store::{FilePortfolioStore, LatestFilter, PortfolioStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: portfolio <command>
  detect <file>
  classify <file>
  extract <lesson|journal|attendance|assessment> <file>
  build <evidence.json> [--owner ID]
  latest [--owner ID]
  show <id>
  export <id> <md|csv>
  report <appraisal.json> [--portfolio ID] [--md]
  verify-audit";

enum CliError {
    Usage(String),
    Failed(String),
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        CliError::Failed(e.to_string())
    }
}

type CliResult<T> = Result<T, CliError>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => std::process::exit(0),
        Err(CliError::Usage(msg)) => {
            if !msg.is_empty() {
                eprintln!("{}", msg);
            }
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
        Err(CliError::Failed(msg)) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

fn run(args: &[String]) -> CliResult<()> {
    let (args, owner) = take_owner(args)?;
    let a = args.as_slice();
    match arg(a, 0)? {
        "detect" => cmd_detect(Path::new(arg(a, 1)?)),
        "classify" => cmd_classify(Path::new(arg(a, 1)?)),
        "extract" => cmd_extract(arg(a, 1)?, Path::new(arg(a, 2)?)),
        "build" => cmd_build(Path::new(arg(a, 1)?), owner.as_deref()),
        "latest" => cmd_latest(owner),
        "show" => cmd_show(arg(a, 1)?),
        "export" => cmd_export(arg(a, 1)?, arg(a, 2)?),
        "report" => cmd_report(Path::new(arg(a, 1)?), &a[2..]),
        "verify-audit" => cmd_verify_audit(),
        other => Err(CliError::Usage(format!("unknown command: {}", other))),
    }
}

fn arg(args: &[String], i: usize) -> CliResult<&str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(String::new()))
}

/// Removes `--owner ID` from the argument list.
fn take_owner(args: &[String]) -> CliResult<(Vec<String>, Option<String>)> {
    let mut rest = Vec::new();
    let mut owner = None;
    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        if a == "--owner" {
            let value = iter
                .next()
                .ok_or_else(|| CliError::Usage("--owner needs a value".to_string()))?;
            owner = Some(value.clone());
        } else {
            rest.push(a.clone());
        }
    }
    Ok((rest, owner))
}

fn load_config() -> CliResult<EngineConfig> {
    let path = std::env::var_os("APPRAISAL_CONFIG").map(PathBuf::from);
    Ok(EngineConfig::resolve(path.as_deref())?)
}

fn store_dir() -> PathBuf {
    std::env::var_os("APPRAISAL_STORE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("portfolio_store"))
}

fn audit_path() -> PathBuf {
    std::env::var_os("APPRAISAL_AUDIT_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| store_dir().join("audit_log.ndjson"))
}

fn read_text(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Failed(format!("cannot read {}: {}", path.display(), e)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Failed(format!("invalid JSON in {}: {}", path.display(), e)))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(CoreError::from)?;
    println!("{}", text);
    Ok(())
}

fn cmd_detect(path: &Path) -> CliResult<()> {
    let config = load_config()?;
    let text = read_text(path)?;
    print_json(&detect_hardware(&text, &config.vocabulary))
}

fn cmd_classify(path: &Path) -> CliResult<()> {
    let config = load_config()?;
    let client = HttpOracleClient::from_settings(&config.oracle)?;
    let text = read_text(path)?;
    let outcome = Classifier::new(&client, &config).classify_detailed(&text);

    let mut audit = AuditLog::open_or_create(audit_path())?;
    record_classification(&mut audit, &run_id_ulid(), &outcome)?;
    if let Some(failure) = &outcome.result.failure {
        tracing::warn!("classification fell back to an empty result: {}", failure.reason);
    }
    print_json(&outcome.result)
}

fn cmd_extract(kind: &str, path: &Path) -> CliResult<()> {
    let config = load_config()?;
    let client = HttpOracleClient::from_settings(&config.oracle)?;
    let extractor = Extractor::new(&client, &config);
    let mut audit = AuditLog::open_or_create(audit_path())?;
    let run_id = run_id_ulid();
    match kind {
        "lesson" => {
            let x = extractor.extract_lesson_evidence(&read_text(path)?);
            record_extraction(&mut audit, &run_id, &x)?;
            print_json(&x.evidence)
        }
        "journal" => {
            let x = extractor.extract_journal_evidence(&read_text(path)?);
            record_extraction(&mut audit, &run_id, &x)?;
            print_json(&x.evidence)
        }
        "attendance" => {
            let input: AttendanceInput = read_json(path)?;
            let x = extractor.extract_attendance_evidence(&input);
            record_extraction(&mut audit, &run_id, &x)?;
            print_json(&x.evidence)
        }
        "assessment" => {
            let input: AssessmentInput = read_json(path)?;
            let x = extractor.extract_assessment_evidence(&input);
            record_extraction(&mut audit, &run_id, &x)?;
            print_json(&x.evidence)
        }
        other => Err(CliError::Usage(format!("unknown evidence source: {}", other))),
    }
}

fn cmd_build(path: &Path, owner: Option<&str>) -> CliResult<()> {
    let config = load_config()?;
    let client = HttpOracleClient::from_settings(&config.oracle)?;
    let sources = EvidenceSources::from_json_value(read_json(path)?);
    let store = FilePortfolioStore::open_or_create(store_dir())?;

    let outcome =
        PortfolioBuilder::new(&client, &config).build_portfolio_with_store(&sources, owner, &store);
    let mut audit = AuditLog::open_or_create(audit_path())?;
    record_portfolio_build(&mut audit, &run_id_ulid(), &outcome)?;
    print_json(&outcome.document)
}

fn cmd_latest(owner: Option<String>) -> CliResult<()> {
    let store = FilePortfolioStore::open_or_create(store_dir())?;
    let filter = owner.map(LatestFilter::owner);
    print_json(&store.get_latest(filter.as_ref())?)
}

fn cmd_show(id: &str) -> CliResult<()> {
    let store = FilePortfolioStore::open_or_create(store_dir())?;
    print_json(&store.get(id)?)
}

fn cmd_export(id: &str, format: &str) -> CliResult<()> {
    let store = FilePortfolioStore::open_or_create(store_dir())?;
    let doc = store.get(id)?;
    match format {
        "md" => print!("{}", render_portfolio_markdown(&doc)),
        "csv" => print!("{}", render_evidence_index_csv(&doc)?),
        other => return Err(CliError::Usage(format!("unknown export format: {}", other))),
    }
    Ok(())
}

/// `--portfolio ID` replaces the file's evidence with a stored portfolio's buckets;
/// `--md` prints markdown instead of JSON.
fn cmd_report(path: &Path, flags: &[String]) -> CliResult<()> {
    let config = load_config()?;
    let client = HttpOracleClient::from_settings(&config.oracle)?;
    let mut input = AppraisalInput::from_json_value(read_json(path)?);
    let mut markdown = false;
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--md" => markdown = true,
            "--portfolio" => {
                let id = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--portfolio needs a value".to_string()))?;
                let store = FilePortfolioStore::open_or_create(store_dir())?;
                input.gp_evidence = GpEvidence::from_portfolio(&store.get(id)?);
            }
            other => return Err(CliError::Usage(format!("unknown report flag: {}", other))),
        }
    }

    let outcome = ReportGenerator::new(&client, &config).generate_report_detailed(&input);
    let mut audit = AuditLog::open_or_create(audit_path())?;
    record_report(&mut audit, &run_id_ulid(), &outcome)?;
    if markdown {
        print!("{}", render_report_markdown(&outcome.report));
        Ok(())
    } else {
        print_json(&outcome.report)
    }
}

fn cmd_verify_audit() -> CliResult<()> {
    let report = AuditLog::verify(audit_path())?;
    print_json(&report)?;
    if report.is_intact() {
        Ok(())
    } else {
        Err(CliError::Failed("audit chain is broken".to_string()))
    }
}
