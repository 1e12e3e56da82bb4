//! Filename extraction from URL path.

/// Returns the text after the last `/` of the URL's path component.
///
/// Query and fragment are not part of the path and never appear. A path that
/// ends in `/` yields `Some("")`; an unparseable URL yields `None`. The segment
/// is taken from the input text as typed: a literal space or non-ASCII letter
/// stays as it is, and existing percent escapes are not decoded.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    url::Url::parse(url).ok()?;
    let path = raw_path(url.trim());
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    Some(segment.to_string())
}

/// Path component of `url` without re-encoding: scheme and authority cut off
/// the front, query and fragment cut off the back.
fn raw_path(url: &str) -> &str {
    let rest = url.split_once(':').map_or(url, |(_, rest)| rest);
    let rest = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find(['/', '\\', '?', '#']).unwrap_or(after.len());
            &after[end..]
        }
        None => rest,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}
