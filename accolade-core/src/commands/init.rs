// accolade-core/src/commands/init.rs

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{CoreConfig, CONFIG_FILE_NAME};
use rulebook::assets::write_default_rules;

#[derive(Debug, Clone)]
pub struct InitReport {
    pub root: PathBuf,
    pub created: Vec<String>,
    pub existed: Vec<String>,
    pub config: CoreConfig,
}

/// Lay out a working root (idempotent): config file, rule tables, logbook dir.
/// Existing files are left untouched.
pub fn ensure_initialized(root: &Path) -> Result<InitReport> {
    let mut created = Vec::new();
    let mut existed = Vec::new();

    ensure_dir(root, "", &mut created, &mut existed)?;
    ensure_file(
        root,
        CONFIG_FILE_NAME,
        DEFAULT_CONFIG_TOML,
        &mut created,
        &mut existed,
    )?;

    let config = CoreConfig::load(root)?;

    let rules_dir = config.rules.path.clone();
    let seeded = write_default_rules(&rules_dir)?;
    let shown_dir = rules_dir.strip_prefix(root).unwrap_or(&rules_dir);
    for name in [config.rules.countries.as_str(), config.rules.positions.as_str()] {
        let label = shown_dir.join(name).display().to_string();
        if seeded.iter().any(|s| s == name) {
            created.push(label);
        } else {
            existed.push(label);
        }
    }

    if let Some(log_dir) = config.logbook.path.parent() {
        if log_dir.exists() {
            existed.push("logbook".to_string());
        } else {
            fs::create_dir_all(log_dir).with_context(|| format!("create_dir_all({:?})", log_dir))?;
            created.push("logbook".to_string());
        }
    }

    tracing::info!(
        root = %root.display(),
        created = created.len(),
        existed = existed.len(),
        "initialized accolade root"
    );

    Ok(InitReport {
        root: root.to_path_buf(),
        created,
        existed,
        config,
    })
}

fn ensure_dir(
    base: &Path,
    rel: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = if rel.is_empty() { base.to_path_buf() } else { base.join(rel) };
    let label = if rel.is_empty() { ".".to_string() } else { rel.to_string() };
    if p.exists() {
        existed.push(label);
        return Ok(());
    }
    fs::create_dir_all(&p).with_context(|| format!("create_dir_all({:?})", p))?;
    created.push(label);
    Ok(())
}

fn ensure_file(
    base: &Path,
    rel_file: &str,
    content_if_absent: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = base.join(rel_file);
    if p.exists() {
        existed.push(rel_file.to_string());
        return Ok(());
    }
    write_atomic(&p, content_if_absent.as_bytes())?;
    created.push(rel_file.to_string());
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create_dir_all({:?})", parent))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp)
            .with_context(|| format!("open temp file {:?}", tmp))?;
        f.write_all(bytes)?;
        f.flush()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

// ---------- defaults ----------

const DEFAULT_CONFIG_TOML: &str = r#"[rules]
path = "rules"
countries = "countries.toml"
positions = "positions.toml"
locked = true

[reports]
top_countries = 5
default_position = "Other"

[logbook]
path = "logbook/normalization.jsonl"
preview_len = 160
"#;
