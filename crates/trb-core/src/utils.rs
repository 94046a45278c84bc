use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Longest stem kept in a scratch name; the suffix and extension come on top,
/// staying well under the 255-byte file name limit.
const SCRATCH_STEM_MAX: usize = 150;
const SCRATCH_EXT_MAX: usize = 16;

// ============== Scratch Files ==============

/// A request-owned temporary file. The file (if it was ever created) is
/// removed when the guard is dropped, on every exit path.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Reserve a unique path under `dir` derived from `name`. Nothing is created yet.
    pub fn reserve(dir: &Path, name: &str) -> Self {
        let ts = Utc::now().timestamp_millis();
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self {
            path: dir.join(uniquify_filename(name, ts, n)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed scratch file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch file")
            }
        }
    }
}

// ============== File Names ==============

/// Reduce a user-supplied name to a safe local file name.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let out = out.trim_start_matches('.').to_string();
    if out.is_empty() {
        "file".to_string()
    } else {
        out
    }
}

fn uniquify_filename(name: &str, ts: i64, n: usize) -> String {
    let base = sanitize_filename(name);
    if let Some((stem, ext)) = base.rsplit_once('.') {
        if !stem.is_empty() && !ext.is_empty() && ext.len() <= SCRATCH_EXT_MAX {
            let stem = truncate_bytes(stem, SCRATCH_STEM_MAX);
            return format!("{stem}_{ts}_{n}.{ext}");
        }
    }
    let base = truncate_bytes(&base, SCRATCH_STEM_MAX);
    format!("{base}_{ts}_{n}")
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
