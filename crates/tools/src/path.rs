//! Joining of suite-relative locations.
//!
//! Only what the suite description needs: `xml:base` and `URI` values are
//! relative paths, and the document base is either a filesystem directory or
//! an `http(s)://` URL.

/// Join `rel` onto `base` the way a POSIX path join does.
///
/// `.` segments are dropped, `..` pops the previous segment, duplicate
/// slashes collapse, and a trailing slash on the last non-empty argument is
/// kept. A leading `scheme://authority` on `base` is preserved verbatim.
pub fn join(base: &str, rel: &str) -> String {
    let (prefix, base_path) = split_scheme(base);
    let base_path = if !prefix.is_empty() && base_path.is_empty() {
        "/"
    } else {
        base_path
    };

    let mut joined = String::with_capacity(base_path.len() + rel.len() + 1);
    joined.push_str(base_path);
    if !joined.is_empty() && !rel.is_empty() {
        joined.push('/');
    }
    joined.push_str(rel);

    let mut out = String::with_capacity(prefix.len() + joined.len());
    out.push_str(prefix);
    out.push_str(&normalize(&joined));
    out
}

fn split_scheme(base: &str) -> (&str, &str) {
    let Some(scheme_end) = base.find("://") else {
        return ("", base);
    };
    let after = scheme_end + 3;
    match base[after..].find('/') {
        Some(slash) => base.split_at(after + slash),
        None => (base, ""),
    }
}

fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

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

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}
