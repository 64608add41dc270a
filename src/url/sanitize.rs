//! Safe file and folder names derived from URLs and item titles

/// Maximum length in bytes of a derived file name, extension included
pub const MAX_FILE_NAME: usize = 50;

/// Maximum length in bytes of a derived folder name
pub const MAX_FOLDER_NAME: usize = 80;

const DEFAULT_EXTENSION: &str = ".html";
const MAX_EXTENSION_LEN: usize = 10;

/// Derives a file name from a URL
///
/// The scheme and a trailing `/` are stripped, only the final path segment
/// is kept, and forbidden characters become `_`. The extension is whatever
/// follows the last `.` (when it is a short alphanumeric run), `.html`
/// otherwise. The base name is truncated so the whole name fits in
/// [`MAX_FILE_NAME`] bytes; the extension is always kept.
///
/// # Examples
///
/// ```
/// use newsreel::url::derive_file_name;
///
/// assert_eq!(derive_file_name("http://x.test/a/b.txt"), "b.txt");
/// assert_eq!(derive_file_name("https://example.com/posts/hello/"), "hello.html");
/// ```
pub fn derive_file_name(url: &str) -> String {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let trimmed = without_scheme.strip_suffix('/').unwrap_or(without_scheme);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);

    let name: String = segment
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    let extension = extension_of(&name);
    let mut base = strip_suffix_ignore_case(&name, &extension);
    if base.is_empty() {
        base = "index";
    }

    let budget = MAX_FILE_NAME - extension.len();
    format!("{}{}", truncate_to(base, budget), extension)
}

/// Derives a folder name from an item title
///
/// Forbidden characters become `_`, surrounding `_`, `.` and spaces are
/// trimmed, and the result is cut to [`MAX_FOLDER_NAME`] bytes. Empty titles
/// and reserved Windows device names are never returned as-is.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    let trimmed = trim_name(truncate_to(trim_name(&cleaned), MAX_FOLDER_NAME));
    let mut folder = if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    };

    if is_reserved_windows_name(&folder) {
        folder.push('_');
    }
    folder
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn trim_name(name: &str) -> &str {
    name.trim_matches(&['_', ' ', '.'][..])
}

/// Extension including the leading dot, or the default one
fn extension_of(name: &str) -> String {
    let Some(idx) = name.rfind('.') else {
        return DEFAULT_EXTENSION.to_string();
    };

    let candidate = &name[idx + 1..];
    let valid = !candidate.is_empty()
        && candidate.len() <= MAX_EXTENSION_LEN
        && candidate.chars().all(|c| c.is_ascii_alphanumeric());

    if valid {
        format!(".{}", candidate)
    } else {
        DEFAULT_EXTENSION.to_string()
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    let Some(start) = name.len().checked_sub(suffix.len()) else {
        return name;
    };

    match name.get(start..) {
        Some(tail) if tail.eq_ignore_ascii_case(suffix) => &name[..start],
        _ => name,
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a char
fn truncate_to(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
