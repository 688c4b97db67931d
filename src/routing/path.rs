//! Path string helpers shared by the matcher and link resolution.

/// Strips any `?query` or `#fragment` suffix.
pub fn strip_suffix(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(i) => &path[..i],
        None => path,
    }
}

/// Splits a path into its non-empty segments.
///
/// Leading, trailing and repeated separators are ignored, as is any query or
/// fragment suffix.
pub fn split(path: &str) -> Vec<&str> {
    strip_suffix(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Joins segments into an absolute path. No segments yields `/`.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Applies `.` and `..` segments on top of `base`. `..` never climbs above root.
pub fn apply_segments<'a>(base: &mut Vec<&'a str>, segments: &[&'a str]) {
    for segment in segments {
        match *segment {
            "." => {}
            ".." => {
                base.pop();
            }
            other => base.push(other),
        }
    }
}

/// Canonical absolute form: single separators, no trailing slash, dot
/// segments applied.
pub fn normalize(path: &str) -> String {
    let mut out = Vec::new();
    apply_segments(&mut out, &split(path));
    join(&out)
}
