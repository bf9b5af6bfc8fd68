//! Ordering and formatting of dotted version identifiers
//!
//! ICD versions are plain dotted integers ("17", "8.0", "8.10"). They are
//! compared component by component, with missing trailing components treated
//! as `0`, so "8" and "8.0" compare equal. Components that are not numbers
//! also compare as `0` instead of failing.

use std::cmp::Ordering;

use indexmap::IndexSet;

/// Numeric value of a single component. Leading digits are used, anything
/// else counts as zero.
fn component_value(component: &str) -> u64 {
    let digits_end = component
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(component.len());
    component[..digits_end].parse().unwrap_or(0)
}

/// Compare two version identifiers component-wise.
///
/// Examples:
/// - "8" == "8.0"
/// - "8.10" > "8.7"
/// - "abc" == "0"
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parts_a: Vec<&str> = a.split('.').collect();
    let parts_b: Vec<&str> = b.split('.').collect();
    let max_len = parts_a.len().max(parts_b.len());

    for i in 0..max_len {
        let num_a = parts_a.get(i).map_or(0, |p| component_value(p));
        let num_b = parts_b.get(i).map_or(0, |p| component_value(p));

        match num_a.cmp(&num_b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

pub fn sort_ascending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}

/// Remove duplicate tokens, keeping the first occurrence of each.
pub fn dedup_versions<I, S>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    versions
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Highest version under [`compare_versions`] ordering.
///
/// When several tokens compare equal ("8" and "8.0"), the last one wins,
/// matching what an ascending sort followed by "take last" would yield.
pub fn latest_of(versions: &[String]) -> Option<String> {
    versions
        .iter()
        .max_by(|a, b| compare_versions(a, b))
        .cloned()
}

/// Format versions as human readable prose: "13, 14, 15, 16 or 17".
///
/// The input is expected to be sorted already.
pub fn format_prose_list(versions: &[String]) -> String {
    match versions {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [head @ .., last] => format!("{} or {}", head.join(", "), last),
    }
}
