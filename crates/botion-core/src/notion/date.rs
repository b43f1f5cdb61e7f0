use core::fmt::Write as _;

use heapless::String;

/// The `start` value is not a `YYYY-MM-DD` prefixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedDueDate;

/// `MM/DD/YY`
pub type ShortDate = String<8>;

/// Turn an ISO-8601 date or datetime (`2024-05-17`, `2024-05-17T00:00:00.000Z`)
/// into `MM/DD/YY`. Anything after the date part is ignored.
pub fn format_due_date(raw: &str) -> Result<ShortDate, MalformedDueDate> {
    let bytes = raw.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(MalformedDueDate);
    }
    let digits = |from: usize, to: usize| bytes[from..to].iter().all(u8::is_ascii_digit);
    if !(digits(0, 4) && digits(5, 7) && digits(8, 10)) {
        return Err(MalformedDueDate);
    }

    let number = |at: usize| (bytes[at] - b'0') * 10 + (bytes[at + 1] - b'0');
    if !(1..=12).contains(&number(5)) || !(1..=31).contains(&number(8)) {
        return Err(MalformedDueDate);
    }

    // The first ten bytes are ASCII, so byte slicing stays on char boundaries.
    let mut short = ShortDate::new();
    write!(short, "{}/{}/{}", &raw[5..7], &raw[8..10], &raw[2..4]).map_err(|_| MalformedDueDate)?;
    Ok(short)
}
