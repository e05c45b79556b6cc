use std::collections::HashSet;

use crate::core::address::parse_free_text;
use crate::models::{AddressField, LocationDetail};

/// Score for candidates in a different country: penalized, not excluded
pub const COUNTRY_MISMATCH_SCORE: f64 = 0.1;

/// Minimum token overlap for a partial text match
pub const TOKEN_OVERLAP_THRESHOLD: f64 = 0.3;

/// Partial text matches never score as high as a structured match
pub const TOKEN_OVERLAP_CAP: f64 = 0.7;

/// Calculate how well a property address satisfies a buyer's preferred location.
///
/// Buyer preferences are usually coarse ("Tampa, FL") while property
/// addresses are full street addresses, so components are compared only where
/// both sides carry them. When no component can be compared the raw strings
/// are compared by token overlap instead.
///
/// Not symmetric in intent: the first argument is the buyer side.
///
/// # Returns
/// Score in [0.0, 1.0] and the detail explaining it
pub fn location_similarity(
    buyer_location: Option<&str>,
    property_address: Option<&str>,
) -> (f64, LocationDetail) {
    let (buyer_text, property_text) = match (non_empty(buyer_location), non_empty(property_address)) {
        (Some(b), Some(p)) => (b, p),
        _ => return (0.0, LocationDetail::MissingAddress),
    };

    let buyer = parse_free_text(buyer_text);
    let property = parse_free_text(property_text);

    if let (Some(buyer_country), Some(property_country)) = (&buyer.country, &property.country) {
        if normalize(buyer_country) != normalize(property_country) {
            return (
                COUNTRY_MISMATCH_SCORE,
                LocationDetail::CountryMismatch {
                    buyer_country: buyer_country.clone(),
                    property_country: property_country.clone(),
                },
            );
        }
    }

    let mut compared = Vec::new();
    let mut matched = Vec::new();

    for field in AddressField::COMPARED {
        if let (Some(b), Some(p)) = (buyer.get(field), property.get(field)) {
            compared.push(field);
            if normalize(b) == normalize(p) {
                matched.push(field);
            }
        }
    }

    if !compared.is_empty() {
        let score = matched.len() as f64 / compared.len() as f64;
        return (score, LocationDetail::Components { matched, compared });
    }

    text_similarity(buyer_text, property_text)
}

/// Whole-string fallback used when no structured component overlaps
fn text_similarity(buyer_text: &str, property_text: &str) -> (f64, LocationDetail) {
    if normalize(buyer_text) == normalize(property_text) {
        return (1.0, LocationDetail::ExactText);
    }

    let overlap = token_overlap(buyer_text, property_text);
    if overlap >= TOKEN_OVERLAP_THRESHOLD {
        (overlap.min(TOKEN_OVERLAP_CAP), LocationDetail::TokenOverlap { overlap })
    } else {
        (0.0, LocationDetail::NoOverlap { overlap })
    }
}

/// Jaccard overlap of significant tokens (longer than two characters)
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let left = tokenize(a);
    let right = tokenize(b);

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }

    left.intersection(&right).count() as f64 / union as f64
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| token.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

#[inline]
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
