//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - A missing file is not an error; a malformed file or an unknown field is.
//! - Values only override defaults; CLI flags are applied afterwards by the caller.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, SymlinkPolicy};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct XmlConfig {
    source_dir: Option<String>,
    target_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    workers: Option<usize>,
    preserve_metadata: Option<bool>,
    preserve_permissions: Option<bool>,
    symlinks: Option<String>,
    sync_writes: Option<bool>,
}

// Trims surrounding whitespace so `<workers> 4 </workers>` parses.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid workers value '{s}': {e}"))),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

impl XmlConfig {
    /// Overlay the values present in the file onto `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) -> Result<()> {
        if let Some(p) = non_empty_path(self.source_dir.as_deref()) {
            cfg.source_dir = Some(p);
        }
        if let Some(p) = non_empty_path(self.target_dir.as_deref()) {
            cfg.target_dir = Some(p);
        }
        if let Some(p) = non_empty_path(self.log_file.as_deref()) {
            cfg.log_file = Some(p);
        }
        if let Some(s) = self.log_level.as_deref() {
            cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        }
        if let Some(n) = self.workers {
            cfg.workers = n;
        }
        if let Some(b) = self.preserve_metadata {
            cfg.preserve_metadata = b;
        }
        if let Some(b) = self.preserve_permissions {
            cfg.preserve_permissions = b;
        }
        if let Some(s) = self.symlinks.as_deref() {
            cfg.symlinks = s.parse::<SymlinkPolicy>().map_err(anyhow::Error::msg)?;
        }
        if let Some(b) = self.sync_writes {
            cfg.sync_writes = b;
        }
        Ok(())
    }
}

/// Parse a config file at an explicit path.
pub fn load_config_from_xml_path(path: &Path) -> Result<XmlConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))
}

/// Load the config at the default location (`$EXT_SORTER_CONFIG` or the OS config dir).
/// Returns Ok(None) when no file exists there.
pub fn load_config_from_xml() -> Result<Option<XmlConfig>> {
    let Some(path) = default_config_path() else {
        debug!("no config path could be determined; using defaults");
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    let parsed = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(parsed))
}

/// Write the commented template config to `path`. Refuses to overwrite an existing
/// file or to write below a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/ext_sorter.log".into());

    let content = format!(
        "<!--\n  ext_sorter configuration (XML)\n\n    source_dir            -> tree to copy files from\n    target_dir            -> existing folder receiving one subfolder per extension\n    log_level             -> quiet | normal | info | debug\n    log_file              -> optional log file (stdout is still used)\n    workers               -> copy threads; 0 = number of CPUs\n    preserve_metadata     -> copy permissions and timestamps\n    preserve_permissions  -> copy permission bits only\n    symlinks              -> follow | skip\n    sync_writes           -> fsync every copied file\n\n  CLI flags override these values.\n-->\n<config>\n  <source_dir></source_dir>\n  <target_dir></target_dir>\n  <log_level>normal</log_level>\n  <!-- <log_file>{}</log_file> -->\n  <workers>0</workers>\n  <preserve_metadata>false</preserve_metadata>\n  <preserve_permissions>true</preserve_permissions>\n  <symlinks>follow</symlinks>\n  <sync_writes>false</sync_writes>\n</config>\n",
        suggested_log
    );

    let mut opts = fs::OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut f = opts
        .open(path)
        .with_context(|| format!("create config file '{}'", path.display()))?;
    f.write_all(content.as_bytes())?;
    f.sync_all()?;

    info!("Created template config at {}", path.display());
    Ok(())
}
