//! Unicode subset ranges
//!
//! Produces the compact `U+HEX` / `U+HEX-HEX` list used by `unicode-range`
//! descriptors, covering exactly the characters of a text sample.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::ParseError;

/// Compute the minimal list of contiguous codepoint ranges covering `text`.
///
/// Ranges are disjoint, strictly increasing and joined with `", "`.
/// Hex digits are uppercase without zero padding. Empty input yields an
/// empty string.
pub fn subset_ranges(text: &str) -> String {
    let codepoints: BTreeSet<u32> = text.chars().map(u32::from).collect();

    let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
    for cp in codepoints {
        match ranges.last_mut() {
            Some(range) if *range.end() + 1 == cp => *range = *range.start()..=cp,
            _ => ranges.push(cp..=cp),
        }
    }

    ranges
        .iter()
        .map(|range| {
            if range.start() == range.end() {
                format!("U+{:X}", range.start())
            } else {
                format!("U+{:X}-{:X}", range.start(), range.end())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a `U+HEX[-HEX]` list back into codepoint ranges.
///
/// Accepts the output of [`subset_ranges`]; whitespace around tokens is
/// ignored and an empty string parses to no ranges.
pub fn parse_unicode_ranges(ranges: &str) -> Result<Vec<RangeInclusive<u32>>, ParseError> {
    ranges
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let invalid = || ParseError::InvalidRange(token.to_string());
            let body = token
                .strip_prefix("U+")
                .or_else(|| token.strip_prefix("u+"))
                .ok_or_else(invalid)?;
            let (start, end) = match body.split_once('-') {
                Some((start, end)) => (start, end),
                None => (body, body),
            };
            let start = u32::from_str_radix(start, 16).map_err(|_| invalid())?;
            let end = u32::from_str_radix(end, 16).map_err(|_| invalid())?;
            if start > end {
                return Err(invalid());
            }
            Ok(start..=end)
        })
        .collect()
}
