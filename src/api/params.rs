//! Lenient parsing of path and query parameters.
//!
//! Ids and numbers arrive as text and are read forgivingly: leading
//! whitespace and an optional sign are accepted, then as many digits as
//! follow. `"12abc"` is 12, `"abc"` is nothing.

use crate::error::{ApiError, ApiResult};
use crate::pagination::DEFAULT_LIMIT;

/// Parse the leading integer of `raw`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Id from a path segment. Unparseable ids become 0, which matches nothing.
pub fn path_id(raw: &str) -> i64 {
    parse_int(raw).unwrap_or(0)
}

/// Optional id filter from a query value. Missing, zero or unparseable means
/// "no filter".
pub fn id_filter(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_int).filter(|&id| id != 0)
}

/// Page or limit for list endpoints. Anything that is not a positive number
/// falls back to `default`.
pub fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(parse_int)
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(default)
}

/// Page and limit for `/projects/:id/page-tasks`.
///
/// Missing, zero or unparseable values use the defaults (1 and 10); a
/// negative value is rejected.
pub fn strict_page(page: Option<&str>, limit: Option<&str>) -> ApiResult<(usize, usize)> {
    let read = |raw: Option<&str>, default: i64| raw.and_then(parse_int).filter(|&n| n != 0).unwrap_or(default);
    let page = read(page, 1);
    let limit = read(limit, DEFAULT_LIMIT as i64);
    match (usize::try_from(page), usize::try_from(limit)) {
        (Ok(page), Ok(limit)) => Ok((page, limit)),
        _ => Err(ApiError::invalid_value(
            "page",
            "Page and limit must be positive numbers",
        )),
    }
}
