// src/utils/logbook.rs
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::{fs, io::Write, path::Path};
use uuid::Uuid;

#[derive(Serialize)]
struct LogLine<'a> {
    id: String,
    ts: String,
    event: &'a str,
    content_preview: String,
    data: &'a Value,
}

/// Append one JSONL line to `log_path`, creating parent directories as needed.
/// Returns the generated line id.
pub fn append_log(
    log_path: &Path,
    event: &str,
    content: &str,
    data: &Value,
    preview_len: usize,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let line = LogLine {
        id: id.clone(),
        ts: Utc::now().to_rfc3339(),
        event,
        content_preview: content.chars().take(preview_len).collect(),
        data,
    };
    let json = serde_json::to_string(&line)?;

    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create_dir_all({:?})", dir))?;
    }
    let mut f = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open logbook {:?}", log_path))?;
    writeln!(f, "{}", json)?;
    Ok(id)
}
