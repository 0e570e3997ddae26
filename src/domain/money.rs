use std::fmt;

/// Balances and prices are held as integer cents.
/// `100.00` is stored as `10000`.
pub type Cents = i64;

/// Render cents as a plain decimal string, e.g. `-1234` -> `"-12.34"`.
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal amount into cents.
///
/// Accepts an optional leading `-`, whole units and up to two fractional
/// digits (`"29.99"`, `"12.5"`, `"100"`, `".50"`). Extra fractional digits
/// are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    // Pad or truncate to exactly two digits
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => fraction_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    // Negative amounts accumulate downwards so i64::MIN stays reachable
    let scaled = units.checked_mul(100).ok_or(ParseCentsError::Overflow)?;
    let cents = if negative {
        scaled.checked_neg().and_then(|c| c.checked_sub(fraction))
    } else {
        scaled.checked_add(fraction)
    };

    cents.ok_or(ParseCentsError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
