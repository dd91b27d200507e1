//! CLI command implementations
//!
//! Records go to stdout as JSON lines; structured logs go to stderr.

use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::collector::{CycleSummary, SqlQuery};
use crate::config::SqlQueryConfig;
use crate::observability::{log_event_with_fields, Event, LogObserver};
use crate::sink::{JsonLinesSink, MetricSink};
use crate::source::{Connector, DriverRegistry};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Gather { config } => gather(&config),
        Command::Run { config, cycles } => run_loop(&config, cycles),
        Command::Check { config } => check(&config),
        Command::SampleConfig => sample_config(),
    }
}

fn load_config(config_path: &Path) -> CliResult<SqlQueryConfig> {
    let config = SqlQueryConfig::load(config_path)?;
    let path = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", path.as_str()),
            ("queries", config.queries.len().to_string().as_str()),
            ("table", config.table_name.as_str()),
        ],
    );
    Ok(config)
}

/// Run one collection cycle, records to stdout
pub fn gather(config_path: &Path) -> CliResult<()> {
    let stdout = io::stdout();
    gather_to(config_path, stdout.lock())?;
    Ok(())
}

/// Run one collection cycle with the built-in drivers, records to `out`
pub fn gather_to<W: Write>(config_path: &Path, out: W) -> CliResult<CycleSummary> {
    let config = load_config(config_path)?;
    let collector = config.collector();
    let observer = LogObserver::default();
    collector.report_overlaps(&observer);

    let mut sink = JsonLinesSink::new(out);
    let summary = collector.gather(&DriverRegistry::new(), &mut sink, &observer)?;
    Ok(summary)
}

/// Run collection cycles every `interval_ms`, forever or `cycles` times
pub fn run_loop(config_path: &Path, cycles: Option<u64>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let collector = config.collector();
    let observer = LogObserver::default();
    collector.report_overlaps(&observer);

    let stdout = io::stdout();
    let mut sink = JsonLinesSink::new(stdout.lock());

    run_cycles(
        &collector,
        &DriverRegistry::new(),
        &mut sink,
        &observer,
        cycles,
        config.interval(),
    )
}

/// Repeats cycles at a fixed rate.
///
/// A failed cycle is reported through the observer and the loop carries on.
/// When bounded, fails if any cycle failed.
pub(crate) fn run_cycles(
    collector: &SqlQuery,
    connector: &dyn Connector,
    sink: &mut dyn MetricSink,
    observer: &LogObserver,
    cycles: Option<u64>,
    interval: Duration,
) -> CliResult<()> {
    let mut completed = 0u64;
    let mut last_start: Option<Instant> = None;

    while cycles.map_or(true, |n| completed < n) {
        if let Some(started) = last_start {
            thread::sleep(interval.saturating_sub(started.elapsed()));
        }
        last_start = Some(Instant::now());

        // Failures were already reported to the observer
        let _ = collector.gather(connector, sink, observer);
        completed += 1;
    }

    let snapshot = observer.metrics().snapshot();
    log_event_with_fields(
        Event::RunComplete,
        &[
            ("cycles", snapshot.cycles_started.to_string().as_str()),
            ("failed", snapshot.cycles_failed.to_string().as_str()),
            ("rows", snapshot.rows_emitted.to_string().as_str()),
        ],
    );

    if snapshot.cycles_failed > 0 {
        return Err(CliError::gather_failed(format!(
            "{} of {} cycles failed",
            snapshot.cycles_failed, snapshot.cycles_started
        )));
    }

    Ok(())
}

/// Print the effective configuration and any overlapping role lists
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = SqlQueryConfig::load(config_path)?;
    write_json(&check_report(&config, &DriverRegistry::new()))
}

fn check_report(config: &SqlQueryConfig, registry: &DriverRegistry) -> serde_json::Value {
    json!({
        "config": config,
        "driver_supported": registry.supports(&config.driver),
        "overlaps": config.roles().overlaps(),
    })
}

/// Print an example configuration
pub fn sample_config() -> CliResult<()> {
    write_json(&SqlQueryConfig::sample())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::FieldValue;
    use crate::sink::MemorySink;
    use crate::source::{MemoryConnector, MemoryTable};
    use std::fs;
    use tempfile::TempDir;

    fn create_db(dir: &TempDir) -> String {
        let path = dir.path().join("inventory.db");
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE links (location TEXT, used_count INTEGER, bandwidth_recv REAL, is_active INTEGER);
             INSERT INTO links VALUES ('dc1', 3, 12.5, 1);
             INSERT INTO links VALUES (NULL, 4, NULL, 0);",
        )
        .unwrap();
        path.to_string_lossy().into_owned()
    }

    fn create_config(dir: &TempDir, db: &str) -> std::path::PathBuf {
        let mut config = SqlQueryConfig::sample();
        config.server_url = db.to_string();
        config.zeroize_null = true;

        let path = dir.path().join("sqlquery.json");
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_gather_to_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let db = create_db(&dir);
        let config_path = create_config(&dir, &db);

        let mut out = Vec::new();
        let summary = gather_to(&config_path, &mut out).unwrap();
        assert_eq!(summary.rows, 2);

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines[0]["measurement"], "links");
        assert_eq!(lines[0]["tags"]["location"], "dc1");
        assert_eq!(lines[0]["fields"]["used_count"], 3);
        assert_eq!(lines[0]["fields"]["bandwidth_recv"], 12.5);
        assert_eq!(lines[0]["fields"]["is_active"], true);

        assert!(lines[1]["tags"].get("location").is_none());
        assert_eq!(lines[1]["fields"]["bandwidth_recv"], 0.0);
        assert_eq!(lines[1]["fields"]["is_active"], false);
    }

    #[test]
    fn test_gather_to_reports_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = gather_to(&dir.path().join("absent.json"), Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SQLQUERY_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_gather_to_unsupported_driver() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sqlquery.json");
        fs::write(&path, "{}").unwrap();

        let err = gather_to(&path, Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SQLQUERY_CLI_GATHER_FAILED");
        assert!(err.message().contains("SQLQUERY_CONNECTION_FAILED"));
    }

    #[test]
    fn test_run_cycles_bounded() {
        let connector = MemoryConnector::new().with_table(
            "q",
            MemoryTable::new(["n"]).with_text_row([Some("1")]),
        );
        let collector = SqlQuery::new("t")
            .with_queries(["q"])
            .with_roles(crate::collector::ColumnRoleConfig::default().with_ints(["n"]));
        let observer = LogObserver::default();
        let mut sink = MemorySink::new();

        run_cycles(
            &collector,
            &connector,
            &mut sink,
            &observer,
            Some(3),
            Duration::from_millis(1),
        )
        .unwrap();

        assert_eq!(sink.len(), 3);
        assert!(sink.metrics().iter().all(|m| m.fields["n"] == FieldValue::Int(1)));
        assert_eq!(observer.metrics().snapshot().cycles_completed, 3);
    }

    #[test]
    fn test_run_cycles_continues_after_failure() {
        let connector = MemoryConnector::new().failing_ping("down");
        let collector = SqlQuery::new("t").with_queries(["q"]);
        let observer = LogObserver::default();
        let mut sink = MemorySink::new();

        let err = run_cycles(
            &collector,
            &connector,
            &mut sink,
            &observer,
            Some(2),
            Duration::from_millis(1),
        )
        .unwrap_err();

        assert!(err.message().contains("2 of 2"));
        assert_eq!(observer.metrics().snapshot().cycles_started, 2);
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_check_report_lists_overlaps() {
        let config = SqlQueryConfig::from_json(
            r#"{"driver": "sqlite", "tag_cols": ["loc"], "int_fields": ["loc", "used"]}"#,
        )
        .unwrap();

        let report = check_report(&config, &DriverRegistry::new());
        assert_eq!(report["driver_supported"], true);
        assert_eq!(report["config"]["table_name"], "noTableName");
        assert_eq!(report["overlaps"][0]["column"], "loc");
        assert_eq!(report["overlaps"][0]["winner"], "tag");
        assert_eq!(report["overlaps"][0]["shadowed"][0], "int");
    }
}
