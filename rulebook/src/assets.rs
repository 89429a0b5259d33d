use anyhow::{Context, Result};
use std::{borrow::Cow, fs, path::Path};

/// === Embedded default tables ===
pub const COUNTRIES_TOML_NAME: &str = "countries.toml";
pub const COUNTRIES_TOML: &str = include_str!("../assets/countries.toml");

pub const POSITIONS_TOML_NAME: &str = "positions.toml";
pub const POSITIONS_TOML: &str = include_str!("../assets/positions.toml");

/// Return the embedded text for a known rule file, if any.
pub fn default_rules_text(name: &str) -> Option<&'static str> {
    match name {
        COUNTRIES_TOML_NAME => Some(COUNTRIES_TOML),
        POSITIONS_TOML_NAME => Some(POSITIONS_TOML),
        _ => None,
    }
}

/// blake3 of a rule file's text, hex encoded.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Seed missing default rule files into a destination directory (idempotent).
/// Returns a list of files that were created.
pub fn write_default_rules(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("create_dir_all({:?})", dir))?;

    let mut created = Vec::new();

    for (name, text) in [
        (COUNTRIES_TOML_NAME, COUNTRIES_TOML),
        (POSITIONS_TOML_NAME, POSITIONS_TOML),
    ] {
        let path = dir.join(name);
        if !path.exists() {
            fs::write(&path, text).with_context(|| format!("write {:?}", path))?;
            created.push(name.to_string());
        }
    }

    Ok(created)
}

/// Verified reader with "locked" mode.
///
/// - If `path` exists and we know an embedded copy for `name`:
///   - matching blake3 → file contents.
///   - mismatch and `locked` → overwrite the file with the embedded copy and return it.
///   - mismatch and not locked → file contents (local edits win).
/// - If `path` is missing and we know the embedded copy, write it (best effort) and return it.
/// - Unknown `name`: read the file if present, else empty.
pub fn read_verified_or_embedded(
    path: &Path,
    name: &str,
    locked: bool,
) -> Result<Cow<'static, str>> {
    let embedded_opt = default_rules_text(name);

    if path.exists() {
        let file_bytes = fs::read(path).with_context(|| format!("read {:?}", path))?;
        let file_text = String::from_utf8_lossy(&file_bytes).to_string();
        let Some(embedded) = embedded_opt else {
            return Ok(Cow::Owned(file_text));
        };
        if blake3::hash(&file_bytes) == blake3::hash(embedded.as_bytes()) {
            return Ok(Cow::Owned(file_text));
        }
        if locked {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).ok();
            }
            fs::write(path, embedded).with_context(|| format!("restore embedded {:?}", path))?;
            return Ok(Cow::Borrowed(embedded));
        }
        return Ok(Cow::Owned(file_text));
    }

    match embedded_opt {
        Some(embedded) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).ok();
            }
            // Callers still get the embedded copy if this fails.
            let _ = fs::write(path, embedded);
            Ok(Cow::Borrowed(embedded))
        }
        None => Ok(Cow::Owned(String::new())),
    }
}

