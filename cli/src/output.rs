//! Report files written at the end of a scan.
//!
//! * `credentials.csv`: one row per valid credential, header always present.
//! * `summary.json`: the full [`Report`], pretty printed.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::SecondsFormat;
use keyprobe_core::report::Report;
use keyprobe_core::scanner::ledger::ValidCredentialRecord;
use serde::Serialize;

pub const CREDENTIALS_FILE: &str = "credentials.csv";
pub const SUMMARY_FILE: &str = "summary.json";

const CREDENTIALS_HEADER: [&str; 6] = ["address", "port", "service", "username", "password", "timestamp"];

#[derive(Serialize)]
struct CredentialRow<'a> {
    address: String,
    port: u16,
    service: &'static str,
    username: &'a str,
    password: &'a str,
    timestamp: String,
}

impl<'a> From<&'a ValidCredentialRecord> for CredentialRow<'a> {
    fn from(record: &'a ValidCredentialRecord) -> Self {
        Self {
            address: record.target.address().to_string(),
            port: record.target.port(),
            service: record.target.service().as_str(),
            username: &record.credential.username,
            password: &record.credential.password,
            timestamp: record.found_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

pub fn write_credentials<W: Write>(writer: W, records: &[ValidCredentialRecord]) -> anyhow::Result<()> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(CREDENTIALS_HEADER)?;
    for record in records {
        out.serialize(CredentialRow::from(record))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_summary<W: Write>(mut writer: W, report: &Report) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes both report files into `dir`, creating it when missing.
/// Returns the paths written.
pub fn write_report(dir: &Path, report: &Report) -> anyhow::Result<[PathBuf; 2]> {
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))?;

    let credentials_path: PathBuf = dir.join(CREDENTIALS_FILE);
    let file = File::create(&credentials_path)
        .with_context(|| format!("creating {}", credentials_path.display()))?;
    write_credentials(BufWriter::new(file), &report.credentials)
        .with_context(|| format!("writing {}", credentials_path.display()))?;

    let summary_path: PathBuf = dir.join(SUMMARY_FILE);
    let file = File::create(&summary_path).with_context(|| format!("creating {}", summary_path.display()))?;
    write_summary(BufWriter::new(file), report).with_context(|| format!("writing {}", summary_path.display()))?;

    Ok([credentials_path, summary_path])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
