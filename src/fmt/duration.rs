//! Human-readable elapsed-time text for end-of-track summaries.

/// Appends a time difference in milliseconds as
/// `[days, ][hours, ][MM:]SS.mmm minutes|seconds`, omitting higher units
/// that are zero.
pub fn format_time_difference(diff_millis: i64, out: &mut String) {
    use std::fmt::Write;

    let millis = diff_millis % 1000;
    let mut rest = diff_millis / 1000;
    let sec = rest % 60;
    rest /= 60;
    let min = rest % 60;
    rest /= 60;
    let hr = rest % 24;
    rest /= 24;
    let day = rest;

    if day > 0 {
        let _ = write!(out, "{day}{}", if day > 1 { " days, " } else { " day, " });
    }
    if hr > 0 {
        let _ = write!(out, "{hr}{}", if hr > 1 { " hours, " } else { " hour, " });
    }
    if min > 0 {
        let _ = write!(out, "{min:02}:");
    }
    if min > 0 && sec < 10 {
        out.push('0');
    }
    let _ = write!(out, "{sec}.{millis}");
    out.push_str(if min > 0 { " minutes" } else { " seconds" });
}

/// Convenience wrapper returning a fresh string.
#[must_use]
pub fn time_difference(diff_millis: i64) -> String {
    let mut out = String::new();
    format_time_difference(diff_millis, &mut out);
    out
}
