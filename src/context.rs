//! Script invocation context
//!
//! Redo runs a do-script with three arguments: the target name, the base
//! name used for deriving dependency names, and a temporary output path that
//! redo atomically renames onto the target afterwards. The context captures
//! those once at process start and is read-only from then on.

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::Snippets;

/// Environment variable that disables dependency declaration entirely
/// (read-only and test contexts).
pub const NO_REDO_ENV: &str = "NO_REDO";

/// Immutable invocation context of a do-script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptContext {
    /// The target being built.
    pub target: PathBuf,
    /// Base name redo derives dependency names from.
    pub base: String,
    /// Temporary output slot; redo renames this onto `target` on success.
    pub temp: PathBuf,
    /// Directory containing the target.
    pub parent: PathBuf,
    /// Dot-separated segments of the base name.
    #[serde(skip)]
    pub snippets: Snippets,
    /// Whether dependency declaration is performed at all.
    pub use_redo: bool,
}

impl ScriptContext {
    /// Build the context from the current process arguments and the
    /// `NO_REDO` environment variable.
    ///
    /// Returns `None` when the process was not started in a redo-compatible
    /// argument shape; callers then run without dependency tracking.
    pub fn from_env() -> Option<Self> {
        let args: Vec<String> = env::args().collect();
        Self::from_args(&args, no_redo_from_env())
    }

    /// Derive the context from an explicit argument vector.
    ///
    /// Two invocation shapes are recognized:
    /// - `script target base temp` — the standard redo do-script call.
    /// - `default.<rest>.do base` — a default-pattern script run directly;
    ///   the target is the script name with `default.` replaced by the base
    ///   and `.do` stripped, and the temp slot is the target itself.
    pub fn from_args(args: &[String], no_redo: bool) -> Option<Self> {
        match args {
            [_, target, base, temp] => Some(Self::build(
                PathBuf::from(target),
                base.clone(),
                PathBuf::from(temp),
                no_redo,
            )),
            [script, base] => {
                let target = default_pattern_target(Path::new(script), base)?;
                Some(Self::build(target.clone(), base.clone(), target, no_redo))
            }
            _ => None,
        }
    }

    fn build(target: PathBuf, base: String, temp: PathBuf, no_redo: bool) -> Self {
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(""));
        let snippets = Snippets::new(&base);
        Self {
            target,
            base,
            temp,
            parent,
            snippets,
            use_redo: !no_redo,
        }
    }
}

/// Whether `NO_REDO` is set to any non-empty value. The value itself does
/// not matter; `NO_REDO=0` disables declaration too.
pub fn no_redo_from_env() -> bool {
    env::var_os(NO_REDO_ENV).is_some_and(|v| !v.is_empty())
}

/// Target of a `default.<rest>.do` script run directly with a base name:
/// `default.csv.do report` builds `report.csv`.
fn default_pattern_target(script: &Path, base: &str) -> Option<PathBuf> {
    let name = script.file_name()?.to_string_lossy();
    let rest = name.strip_prefix("default.")?.strip_suffix(".do")?;
    let target_name = if rest.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{rest}")
    };
    Some(match script.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(target_name),
        _ => PathBuf::from(target_name),
    })
}
