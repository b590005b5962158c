//! Line-oriented CSV scanner for published spreadsheet exports.
//!
//! Rows are split on `\n`, fields on `,`. A double quote toggles a quoted
//! span in which commas are literal; the quote characters themselves are
//! dropped. Inside a quoted span `""` stands for one literal quote.
//!
//! Malformed quoting never fails. An unmatched quote leaves the scanner in
//! a quoted span until the end of that line, so the remaining commas on the
//! line become part of the last field. Quote state does not carry across
//! lines.

/// Parse raw CSV text into rows of trimmed fields.
///
/// Lines that contain only whitespace are skipped. Empty trailing fields are
/// kept as empty strings. Fields are trimmed, which also strips the `\r` of
/// CRLF line endings.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Split a single line into trimmed fields.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Return the field at `index`, or `""` when the row is too short.
pub fn field(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Best-effort numeric parse.
///
/// Reads the longest leading decimal number (optional sign, digits, one
/// decimal point, optional exponent) after skipping leading whitespace, so
/// `"30 hrs"` yields `30.0`. Anything without a leading number yields `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
