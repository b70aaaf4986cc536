use std::io::{IsTerminal, Write};

use carp_domain::{Domain, DomainTable};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A command result that can be rendered in every output format.
pub trait Report: Serialize {
    fn headers(&self) -> Vec<&'static str>;
    fn rows(&self) -> Vec<Vec<String>>;
    fn pretty(&self) -> String;

    /// Bytes for `--format raw`. Defaults to the pretty rendering.
    fn raw(&self) -> Vec<u8> {
        let mut text = self.pretty();
        text.push('\n');
        text.into_bytes()
    }
}

pub fn print_report<R: Report>(report: &R, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(report.headers());
            for row in report.rows() {
                table.add_row(row);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", report.pretty()),
        OutputFormat::Raw => print_raw(&report.raw()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Space-separated upper-case hex, e.g. `49 0A 00 00 00`.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

#[derive(Serialize)]
pub struct EmitReport {
    pub domain_id: u32,
    pub message_id: u32,
    pub arg_count: usize,
    pub frames: u64,
    pub frame_len: usize,
    pub bytes_written: u64,
    pub byte_order: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// First frame, hex encoded.
    pub hex: String,
    #[serde(skip)]
    pub stream: Vec<u8>,
}

impl Report for EmitReport {
    fn headers(&self) -> Vec<&'static str> {
        vec!["DOMAIN", "MESSAGE", "ARGS", "FRAMES", "BYTES", "ORDER", "FRAME"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.domain_id.to_string(),
            self.message_id.to_string(),
            self.arg_count.to_string(),
            self.frames.to_string(),
            self.bytes_written.to_string(),
            self.byte_order.to_string(),
            self.hex.clone(),
        ]]
    }

    fn pretty(&self) -> String {
        let target = self.output.as_deref().unwrap_or("memory");
        format!(
            "domain={} message={} args={} frames={} bytes={} order={} target={}\n{}",
            self.domain_id,
            self.message_id,
            self.arg_count,
            self.frames,
            self.bytes_written,
            self.byte_order,
            target,
            self.hex
        )
    }

    fn raw(&self) -> Vec<u8> {
        self.stream.clone()
    }
}

#[derive(Serialize)]
pub struct MessageEntry {
    pub id: usize,
    pub format: String,
}

#[derive(Serialize)]
pub struct DomainSummary {
    pub domain: u32,
    pub name: String,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<MessageEntry>>,
}

impl DomainSummary {
    pub fn from_domain(domain: &Domain, with_messages: bool) -> Self {
        let messages = with_messages.then(|| {
            domain
                .messages
                .iter()
                .enumerate()
                .map(|(id, format)| MessageEntry {
                    id,
                    format: format.clone(),
                })
                .collect()
        });
        Self {
            domain: domain.domain,
            name: domain.name.clone(),
            message_count: domain.messages.len(),
            messages,
        }
    }
}

#[derive(Serialize)]
pub struct DomainListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub domains: Vec<DomainSummary>,
}

impl DomainListing {
    pub fn from_table(table: &DomainTable, with_messages: bool, output: Option<String>) -> Self {
        Self {
            output,
            domains: table
                .iter()
                .map(|domain| DomainSummary::from_domain(domain, with_messages))
                .collect(),
        }
    }

    fn with_messages(&self) -> bool {
        self.domains.iter().any(|d| d.messages.is_some())
    }
}

impl Report for DomainListing {
    fn headers(&self) -> Vec<&'static str> {
        if self.with_messages() {
            vec!["DOMAIN", "NAME", "MESSAGE", "FORMAT"]
        } else {
            vec!["DOMAIN", "NAME", "MESSAGES"]
        }
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for summary in &self.domains {
            match &summary.messages {
                Some(entries) => {
                    for entry in entries {
                        rows.push(vec![
                            summary.domain.to_string(),
                            summary.name.clone(),
                            entry.id.to_string(),
                            entry.format.clone(),
                        ]);
                    }
                }
                None => rows.push(vec![
                    summary.domain.to_string(),
                    summary.name.clone(),
                    summary.message_count.to_string(),
                ]),
            }
        }
        rows
    }

    fn pretty(&self) -> String {
        let mut lines = Vec::new();
        if let Some(output) = &self.output {
            lines.push(format!("wrote {} domains to {output}", self.domains.len()));
        }
        for summary in &self.domains {
            lines.push(format!(
                "domain={} name={} messages={}",
                summary.domain, summary.name, summary.message_count
            ));
            for entry in summary.messages.iter().flatten() {
                lines.push(format!("  {}: {}", entry.id, entry.format));
            }
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
pub struct InternReport {
    pub file: String,
    pub domain: u32,
    pub message_id: u32,
    pub format: String,
    pub created: bool,
}

impl Report for InternReport {
    fn headers(&self) -> Vec<&'static str> {
        vec!["DOMAIN", "MESSAGE", "FORMAT", "FILE"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.domain.to_string(),
            self.message_id.to_string(),
            self.format.clone(),
            self.file.clone(),
        ]]
    }

    fn pretty(&self) -> String {
        format!("{} {}", self.domain, self.message_id)
    }
}
