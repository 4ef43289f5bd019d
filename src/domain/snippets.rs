//! Do-script target-name snippets
//!
//! Redo targets encode parameters in dot-separated name segments, e.g.
//! `report.2024.csv` carries the snippets `["report", "2024", "csv"]`.
//! Lists of names can additionally be packed into a single target segment
//! using a separator ladder, so one do-script can be parameterized over a
//! whole set of inputs.

use std::path::Path;

use crate::domain::error::{DomainError, DomainResult};

/// Separator ladder used by [`pack`]/[`unpack`]. Packing at level `n` joins
/// with separator `n` and escapes every deeper separator one step down the
/// ladder. Names containing the deepest separator (`!`) cannot be packed
/// losslessly.
pub const SEPARATORS: [char; 3] = ['+', '$', '!'];

/// The dot-separated segments of a do-script base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippets {
    segments: Vec<String>,
}

impl Snippets {
    /// Split the file name of `base` on `.`.
    pub fn new(base: &str) -> Self {
        let name = Path::new(base)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.to_string());
        Self {
            segments: name.split('.').map(String::from).collect(),
        }
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The full base name, segments rejoined with `.`.
    pub fn joined(&self) -> String {
        self.segments.join(".")
    }

    /// The first `n - 1` segments, followed by the remaining segments
    /// rejoined with `.` as one final element. `take(1)` is therefore the
    /// whole name as a single element.
    pub fn take(&self, n: usize) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }
        let head = (n - 1).min(self.segments.len());
        let mut result: Vec<String> = self.segments[..head].to_vec();
        result.push(self.segments[head..].join("."));
        result
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

fn check_level(level: usize) -> DomainResult<()> {
    if level >= SEPARATORS.len() {
        return Err(DomainError::InvalidPackLevel {
            level,
            max: SEPARATORS.len(),
        });
    }
    Ok(())
}

/// Encode a list of names as a single string at the given separator level.
///
/// ```
/// use redoscript::domain::pack;
/// assert_eq!(pack(&["abc".into()], 0).unwrap(), "abc");
/// assert_eq!(pack(&["abc".into(), "def".into()], 0).unwrap(), "abc+def");
/// assert_eq!(pack(&["abc+def".into(), "ghi".into()], 0).unwrap(), "abc$def+ghi");
/// ```
pub fn pack(parts: &[String], level: usize) -> DomainResult<String> {
    check_level(level)?;
    let escaped: Vec<String> = parts
        .iter()
        .map(|part| {
            let mut s = part.clone();
            // Deepest pair first, so already-escaped separators do not get
            // shifted twice.
            for window in (level..SEPARATORS.len() - 1).rev() {
                s = s.replace(SEPARATORS[window], &SEPARATORS[window + 1].to_string());
            }
            s
        })
        .collect();
    Ok(escaped.join(&SEPARATORS[level].to_string()))
}

/// Decode a string produced by [`pack`] at the same level.
///
/// ```
/// use redoscript::domain::unpack;
/// assert_eq!(unpack("abc", 0).unwrap(), vec!["abc"]);
/// assert_eq!(unpack("abc+def", 0).unwrap(), vec!["abc", "def"]);
/// assert_eq!(unpack("abc$def+ghi", 0).unwrap(), vec!["abc+def", "ghi"]);
/// ```
pub fn unpack(name: &str, level: usize) -> DomainResult<Vec<String>> {
    check_level(level)?;
    Ok(name
        .split(SEPARATORS[level])
        .map(|piece| {
            let mut s = piece.to_string();
            for window in level..SEPARATORS.len() - 1 {
                s = s.replace(SEPARATORS[window + 1], &SEPARATORS[window].to_string());
            }
            s
        })
        .collect())
}

/// Decode a packed name and rejoin the parts with `.`, turning a packed
/// segment back into a plain target name.
pub fn unpack_join(name: &str, level: usize) -> DomainResult<String> {
    Ok(unpack(name, level)?.join("."))
}
