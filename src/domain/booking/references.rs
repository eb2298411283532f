//! Parsing of catalog references supplied as strings.

use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use super::BookingError;

/// Parses every reference in `raw`, failing on the first malformed one.
///
/// Duplicates are dropped, keeping first-seen order.
pub(crate) fn parse_references<T>(field: &str, raw: &[String]) -> Result<Vec<T>, BookingError>
where
    T: FromStr + Eq + Hash + Copy,
{
    let mut seen = HashSet::with_capacity(raw.len());
    let mut parsed = Vec::with_capacity(raw.len());
    for value in raw {
        let id = value
            .trim()
            .parse::<T>()
            .map_err(|_| BookingError::invalid_reference(field, value.clone()))?;
        if seen.insert(id) {
            parsed.push(id);
        }
    }
    Ok(parsed)
}

/// Appends `items` to `into` skipping ids already present.
pub(crate) fn union_into<T: Eq + Hash + Copy>(
    into: &mut Vec<T>,
    seen: &mut HashSet<T>,
    items: &[T],
) {
    for id in items {
        if seen.insert(*id) {
            into.push(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ServiceId;

    #[test]
    fn parses_and_dedups_in_order() {
        let a = ServiceId::new();
        let b = ServiceId::new();
        let raw = vec![a.to_string(), b.to_string(), a.to_string()];
        let parsed: Vec<ServiceId> = parse_references("services", &raw).unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn malformed_reference_names_field_and_value() {
        let raw = vec!["not-an-id".to_string()];
        let err = parse_references::<ServiceId>("services", &raw).unwrap_err();
        assert_eq!(err, BookingError::invalid_reference("services", "not-an-id"));
    }
}
