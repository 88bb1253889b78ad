//! Glob rebasing for configs pulled in from another directory

use crate::unit::ConfigUnit;

/// Join two POSIX-style paths, resolving `.` and `..` segments.
///
/// Backslashes in `base` are treated as separators. A trailing `/` on the
/// joined path is preserved.
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.replace('\\', "/");
    let joined = match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => base,
        (false, false) => format!("{}/{}", base, path),
    };
    normalize(&joined)
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.len() > 1 && path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if normalized.is_empty() {
        return ".".to_string();
    }
    if trailing && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Join a glob under `base`, keeping a leading `!` negation in front
pub fn join_glob(base: &str, glob: &str) -> String {
    match glob.strip_prefix('!') {
        Some(negated) => format!("!{}", join_path(base, negated)),
        None => join_path(base, glob),
    }
}

/// Rebase every `files` and `ignores` glob under `relative_path`.
///
/// An empty path returns the units unchanged.
pub fn rebase_globs(units: Vec<ConfigUnit>, relative_path: &str) -> Vec<ConfigUnit> {
    if relative_path.is_empty() {
        return units;
    }

    units
        .into_iter()
        .map(|mut unit| {
            if let Some(files) = unit.files.as_mut() {
                for pattern in files.iter_mut() {
                    *pattern = pattern.map_globs(|glob| join_glob(relative_path, glob));
                }
            }
            if let Some(ignores) = unit.ignores.as_mut() {
                for pattern in ignores.iter_mut() {
                    *pattern = pattern.map_globs(|glob| join_glob(relative_path, glob));
                }
            }
            unit
        })
        .collect()
}
