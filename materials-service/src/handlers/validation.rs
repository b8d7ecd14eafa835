// Upload input helpers

use uuid::Uuid;

/// Text after the last `.` of the file name, or the whole name if there is none
pub fn file_extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}

/// Unique storage object name: `<uuid>.<extension>`
pub fn object_name(filename: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), file_extension(filename))
}

pub fn object_path(prefix: &str, object_name: &str) -> String {
    format!("{}/{}", prefix, object_name)
}

/// Lenient integer parsing for form fields.
///
/// Leading/trailing whitespace is ignored and parsing stops at the first
/// non-digit, so `"3"`, `" 3 "` and `"3rd"` all give `Some(3)`. A value
/// with no leading digits gives `None`. Only decimal is understood:
/// `"0x1A"` gives `Some(0)`, and values that do not fit in an `i64` give
/// `None`.
pub fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    format!("{}{}", sign, &rest[..digits_end]).parse().ok()
}
