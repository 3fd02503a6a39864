use pathdiff::diff_paths;
use std::path::Path;

/// Displays `path` relative to `base` with forward slashes, for reports and logs.
pub(crate) fn normalize_path(path: &Path, base: Option<&Path>) -> String {
    let candidate = match base {
        Some(base) => diff_paths(path, base).unwrap_or_else(|| path.to_path_buf()),
        None => path.to_path_buf(),
    };
    to_forward_slashes(&candidate)
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
