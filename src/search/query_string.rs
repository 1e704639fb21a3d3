//! Shareable filter strings.
//!
//! Filters round-trip through the same `q` / `conferences` query string the web version
//! of the screener keeps in its address bar, so a link copied from a browser can be
//! passed to `--filter` and vice versa.

use crate::catalog::ConferenceId;
use std::collections::BTreeSet;

const QUERY_KEY: &str = "q";
const CONFERENCES_KEY: &str = "conferences";

/// Filter values carried by a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedFilter {
    pub query: String,
    pub conferences: BTreeSet<ConferenceId>,
}

/// Encode a filter. Absent values are omitted, so an empty filter encodes to `""`.
pub fn encode(query: &str, conferences: &BTreeSet<ConferenceId>) -> String {
    let mut params = Vec::with_capacity(2);
    if !query.is_empty() {
        params.push(format!("{}={}", QUERY_KEY, urlencoding::encode(query)));
    }
    if !conferences.is_empty() {
        let joined = conferences
            .iter()
            .map(|c| urlencoding::encode(c.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        params.push(format!("{}={}", CONFERENCES_KEY, joined));
    }
    params.join("&")
}

/// Decode a query string, with or without the leading `?`. Unknown keys are ignored.
pub fn decode(input: &str) -> SharedFilter {
    let mut filter = SharedFilter::default();
    let input = input.trim().trim_start_matches('?');

    for pair in input.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            QUERY_KEY => filter.query = decode_component(value),
            CONFERENCES_KEY => {
                filter.conferences = value
                    .split(',')
                    .map(decode_component)
                    .filter(|id| !id.is_empty())
                    .map(ConferenceId::new)
                    .collect();
            }
            _ => {}
        }
    }

    filter
}

/// Percent-decode one component, treating `+` as a space like browsers do.
fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes()))
            .into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<ConferenceId> {
        ids.iter().map(|id| ConferenceId::new(*id)).collect()
    }

    #[test]
    fn test_absent_values_are_omitted() {
        assert_eq!(encode("", &BTreeSet::new()), "");
        assert_eq!(encode("deep nets", &BTreeSet::new()), "q=deep%20nets");
        assert_eq!(
            encode("", &set(&["iclr2026", "iclr2025"])),
            "conferences=iclr2025,iclr2026"
        );
    }

    #[test]
    fn test_encode_both() {
        assert_eq!(
            encode("a&b", &set(&["iclr2026"])),
            "q=a%26b&conferences=iclr2026"
        );
    }

    #[test]
    fn test_decode_browser_link() {
        let filter = decode("?q=deep+nets&conferences=iclr2026,iclr2024&utm=x");
        assert_eq!(filter.query, "deep nets");
        assert_eq!(filter.conferences, set(&["iclr2024", "iclr2026"]));
    }

    #[test]
    fn test_decode_percent_encoding_and_empty_entries() {
        let filter = decode("q=a%26b%2Cc&conferences=,iclr2025,,");
        assert_eq!(filter.query, "a&b,c");
        assert_eq!(filter.conferences, set(&["iclr2025"]));
    }

    #[test]
    fn test_decode_empty_and_roundtrip() {
        assert_eq!(decode(""), SharedFilter::default());

        let conferences = set(&["iclr2026"]);
        let decoded = decode(&encode("Über nets + more", &conferences));
        assert_eq!(decoded.query, "Über nets + more");
        assert_eq!(decoded.conferences, conferences);
    }
}
