//! Integer list and range tokenization, plus small path helpers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ListError;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+-[0-9]+$").expect("static regex must compile"));

/// Parses a delimited list of integers and inclusive ranges.
///
/// Each token is either all digits or a `<a>-<b>` range. Ranges are
/// normalized so `5-2` expands to `2, 3, 4, 5`. Range sizes are counted
/// before expansion, so a list that would exceed `max` entries fails with
/// [`ListError::TooMany`] without allocating it.
///
/// # Examples
///
/// ```
/// use wperf_args_core::{ListError, parse_int_list};
///
/// assert_eq!(parse_int_list("0,1,2", ',', 8), Ok(vec![0, 1, 2]));
/// assert_eq!(parse_int_list("5-2", ',', 8), Ok(vec![2, 3, 4, 5]));
/// assert_eq!(parse_int_list("0-4294967295", ',', 8), Err(ListError::TooMany { max: 8 }));
/// assert!(matches!(parse_int_list("1,a", ',', 8), Err(ListError::Malformed(_))));
/// ```
pub fn parse_int_list(input: &str, delimiter: char, max: usize) -> Result<Vec<u32>, ListError> {
    let mut output = Vec::new();
    let mut total: u64 = 0;
    let malformed = |token: &str| ListError::Malformed(token.to_string());

    for token in input.split(delimiter) {
        let (lower, upper) = if is_all_digits(token) {
            let value: u32 = token.parse().map_err(|_| malformed(token))?;
            (value, value)
        } else if RANGE_RE.is_match(token) {
            let (start, end) = token.split_once('-').ok_or_else(|| malformed(token))?;
            let start: u32 = start.parse().map_err(|_| malformed(token))?;
            let end: u32 = end.parse().map_err(|_| malformed(token))?;
            if start <= end { (start, end) } else { (end, start) }
        } else {
            return Err(malformed(token));
        };

        total += u64::from(upper - lower) + 1;
        if total > max as u64 {
            return Err(ListError::TooMany { max });
        }
        output.extend(lower..=upper);
    }

    Ok(output)
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Replaces the extension of `filename` with `ext`, adding one if absent.
///
/// # Examples
///
/// ```
/// use wperf_args_core::replace_file_extension;
///
/// assert_eq!(replace_file_extension("notepad.exe", "pdb"), "notepad.pdb");
/// assert_eq!(replace_file_extension("bin/app", "pdb"), "bin/app.pdb");
/// ```
pub fn replace_file_extension(filename: &str, ext: &str) -> String {
    let file_name_start = filename
        .rfind(['/', '\\'])
        .map_or(0, |idx| idx + 1);
    match filename[file_name_start..].rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{ext}", &filename[..file_name_start + dot]),
        _ => format!("{filename}.{ext}"),
    }
}

/// Returns the final path component of `path`, accepting both separators.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_list() {
        assert_eq!(parse_int_list("0,1,2", ',', 8), Ok(vec![0, 1, 2]));
        assert_eq!(parse_int_list("7", ',', 8), Ok(vec![7]));
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        for _ in 0..3 {
            assert_eq!(parse_int_list("0,1,2", ',', 8), Ok(vec![0, 1, 2]));
        }
    }

    #[test]
    fn test_ranges_are_order_normalized() {
        assert_eq!(parse_int_list("5-2", ',', 8), Ok(vec![2, 3, 4, 5]));
        assert_eq!(parse_int_list("2-5", ',', 8), Ok(vec![2, 3, 4, 5]));
        assert_eq!(parse_int_list("3-3", ',', 8), Ok(vec![3]));
    }

    #[test]
    fn test_mixed_list_and_ranges() {
        assert_eq!(parse_int_list("0,4-6,1", ',', 8), Ok(vec![0, 4, 5, 6, 1]));
    }

    #[test]
    fn test_bound_checked_before_expansion() {
        assert_eq!(parse_int_list("0-4294967295", ',', 128), Err(ListError::TooMany { max: 128 }));
        assert_eq!(parse_int_list("4294967295-0", ',', 1), Err(ListError::TooMany { max: 1 }));
        assert_eq!(parse_int_list("0,1-2", ',', 2), Err(ListError::TooMany { max: 2 }));
        assert_eq!(parse_int_list("0,1-2", ',', 3), Ok(vec![0, 1, 2]));
        assert_eq!(parse_int_list("4294967295", ',', 1), Ok(vec![u32::MAX]));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for input in ["", "1,", ",1", "1,,2", "a", "1-", "-1", "1-2-3", "1 ,2", "1.5", "99999999999"] {
            assert!(
                matches!(parse_int_list(input, ',', 8), Err(ListError::Malformed(_))),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_replace_file_extension() {
        assert_eq!(replace_file_extension("notepad.exe", "pdb"), "notepad.pdb");
        assert_eq!(
            replace_file_extension("C:\\Program\\sample.exe", "pdb"),
            "C:\\Program\\sample.pdb"
        );
        assert_eq!(replace_file_extension("dir.d/app", "pdb"), "dir.d/app.pdb");
        assert_eq!(replace_file_extension(".hidden", "pdb"), ".hidden.pdb");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("C:\\Program\\sample.exe"), "sample.exe");
        assert_eq!(file_name("/usr/bin/app"), "app");
        assert_eq!(file_name("notepad.exe"), "notepad.exe");
    }
}
