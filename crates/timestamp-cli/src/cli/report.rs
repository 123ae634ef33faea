//! Human-readable run report (stdout).

use std::path::Path;

use serde::Serialize;
use timestamp_client::{DigestCheck, RunReport, TimestampPayload, Verdict};

/// Payload as indented JSON (4 spaces).
pub fn pretty_payload(payload: &TimestampPayload) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match payload.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{payload:?}"),
    }
}

pub fn render(report: &RunReport) -> String {
    let data = report.artifacts.data_path.display();
    let sig = report.artifacts.signature_path.display();

    let mut out = format!("Response status: {}\n", report.status);
    out.push_str(&format!("Data is:\n{}\n", pretty_payload(&report.payload)));
    out.push_str(&format!("Digest for Data is: {}\n", report.digest));
    match report.digest_check {
        DigestCheck::Absent => out.push_str("Producer digest: absent\n"),
        check => out.push_str(&format!(
            "Producer digest: {} ({})\n",
            check.as_str(),
            report.producer_digest
        )),
    }

    match report.verdict {
        Verdict::Verified => out.push_str(&format!(
            "Verification successful. Message stored as {data}, signature as {sig}.\n\
             Please verify again with something like:\n\
             openssl dgst -sha256 -verify {} -signature {sig} {data}\n",
            key_hint(report.public_key_file.as_deref())
        )),
        Verdict::Failed => out.push_str("Verification FAILED!\n"),
        Verdict::Unverified => out.push_str(&format!(
            "Verification skipped: no public key supplied; timestamp is UNVERIFIED.\n\
             Message stored as {data}, signature as {sig}.\n"
        )),
    }
    out
}

fn key_hint(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "key1.pub".to_string())
}
