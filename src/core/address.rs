use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::ParsedAddress;

/// Known country names (lowercase) and their canonical form.
/// Longer names come first so "united states of america" wins over "america".
/// Abbreviations up to `ABBREVIATION_MAX_LEN` chars only count when they are
/// the whole segment, so "Route 9 US" is not read as a country.
const COUNTRIES: &[(&str, &str)] = &[
    ("united states of america", "United States"),
    ("united states", "United States"),
    ("united kingdom", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("america", "United States"),
    ("usa", "United States"),
    ("us", "United States"),
    ("india", "India"),
    ("bharat", "India"),
    ("canada", "Canada"),
    ("england", "United Kingdom"),
    ("uk", "United Kingdom"),
    ("australia", "Australia"),
    ("mexico", "Mexico"),
];

const ABBREVIATION_MAX_LEN: usize = 3;

/// Postal code patterns in priority order: US ZIP (+4), Indian PIN, UK postcode
static POSTAL_CODE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("valid US ZIP pattern"),
        Regex::new(r"\b\d{6}\b").expect("valid PIN pattern"),
        Regex::new(r"(?i)\b[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}\b").expect("valid UK postcode pattern"),
    ]
});

/// One component of a structured geocoding result (Google Geocoding API shape)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }

    fn is_sublocality(&self) -> bool {
        self.types
            .iter()
            .any(|t| t == "sublocality" || t.starts_with("sublocality_"))
    }
}

/// Address data the parser accepts
#[derive(Debug, Clone, Copy)]
pub enum AddressInput<'a> {
    Components(&'a [AddressComponent]),
    FreeText(&'a str),
}

/// Parse either structured components or free text into normalized location fields.
///
/// Never fails: unusable input yields an all-empty `ParsedAddress`.
pub fn parse_address(input: AddressInput<'_>) -> ParsedAddress {
    match input {
        AddressInput::Components(components) => parse_components(components),
        AddressInput::FreeText(text) => parse_free_text(text),
    }
}

/// Parse a raw geocoding JSON payload.
///
/// Accepts `{"results": [{...}]}`, `{"address_components": [...]}`, a bare
/// component array, or a plain string. Any other shape parses to empty.
pub fn parse_geocode_value(value: &Value) -> ParsedAddress {
    match value {
        Value::String(text) => parse_free_text(text),
        Value::Array(_) => serde_json::from_value::<Vec<AddressComponent>>(value.clone())
            .map(|components| parse_components(&components))
            .unwrap_or_default(),
        Value::Object(map) => {
            if let Some(first) = map.get("results").and_then(|r| r.as_array()).and_then(|r| r.first()) {
                return parse_geocode_value(first);
            }
            map.get("address_components")
                .map(parse_geocode_value)
                .unwrap_or_default()
        }
        _ => ParsedAddress::default(),
    }
}

/// Map typed geocoding components onto location fields
///
/// locality beats sublocality for the city; administrative_area_level_3 is
/// only used as the county when level_2 is absent.
pub fn parse_components(components: &[AddressComponent]) -> ParsedAddress {
    let mut parsed = ParsedAddress::default();
    let mut sublocality = None;
    let mut level_3 = None;
    let mut names = Vec::with_capacity(components.len());

    for component in components {
        let name = component.long_name.trim();
        if name.is_empty() {
            continue;
        }
        names.push(name);

        if component.has_type("locality") {
            parsed.city.get_or_insert_with(|| name.to_string());
        } else if component.is_sublocality() {
            sublocality.get_or_insert(name);
        }

        if component.has_type("administrative_area_level_2") {
            parsed.county.get_or_insert_with(|| name.to_string());
        } else if component.has_type("administrative_area_level_3") {
            level_3.get_or_insert(name);
        }

        if component.has_type("administrative_area_level_1") {
            parsed.state.get_or_insert_with(|| name.to_string());
        }
        if component.has_type("country") {
            parsed.country.get_or_insert_with(|| name.to_string());
        }
        if component.has_type("postal_code") {
            parsed.zip_code.get_or_insert_with(|| name.to_string());
        }
    }

    if parsed.city.is_none() {
        parsed.city = sublocality.map(str::to_string);
    }
    if parsed.county.is_none() {
        parsed.county = level_3.map(str::to_string);
    }
    if !names.is_empty() {
        parsed.full_address = Some(names.join(", "));
    }

    parsed
}

/// Best-effort parse of a comma separated address such as
/// `"123 Main St, Tampa, FL 33602, USA"`.
///
/// Steps:
/// 1. Trailing segment naming a known country becomes `country`
/// 2. Leading street lines (house number followed by street text) are set aside
/// 3. The last postal code found in the other segments (scanning from the end) becomes `zip_code`
/// 4. Remaining segments after the street lines fill city, state, county in that order
pub fn parse_free_text(text: &str) -> ParsedAddress {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedAddress::default();
    }

    let mut parsed = ParsedAddress {
        full_address: Some(trimmed.to_string()),
        ..ParsedAddress::default()
    };

    let mut segments: Vec<String> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(country) = segments.last().and_then(|last| find_country(last)) {
        parsed.country = Some(country.to_string());
        segments.pop();
    }

    // house numbers must not be mistaken for postal codes
    let mut street_lines = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .take_while(|s| is_street_line(s))
        .count();

    if let Some((index, zip, remainder)) = extract_postal_code(&segments[street_lines..]) {
        parsed.zip_code = Some(zip);
        segments[street_lines + index] = remainder;
        segments.retain(|s| !s.is_empty());
        street_lines = street_lines.min(segments.len().saturating_sub(1));
    }

    let mut locality = segments.into_iter().skip(street_lines);
    parsed.city = locality.next();
    parsed.state = locality.next();
    parsed.county = locality.next();

    parsed
}

/// Canonical country name if `segment` mentions a known country as a whole word
fn find_country(segment: &str) -> Option<&'static str> {
    let lowered = segment.to_lowercase();
    COUNTRIES
        .iter()
        .find(|(name, _)| {
            if name.len() <= ABBREVIATION_MAX_LEN {
                lowered.trim() == *name
            } else {
                contains_word(&lowered, name)
            }
        })
        .map(|(_, canonical)| *canonical)
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Find a postal code, returning (segment index, code, segment with code removed)
fn extract_postal_code(segments: &[String]) -> Option<(usize, String, String)> {
    segments.iter().enumerate().rev().find_map(|(index, segment)| {
        POSTAL_CODE_PATTERNS.iter().find_map(|pattern| {
            pattern.find(segment).map(|m| {
                let remainder = format!("{}{}", &segment[..m.start()], &segment[m.end()..]);
                let remainder = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
                (index, m.as_str().to_uppercase(), remainder)
            })
        })
    })
}

/// A house number followed by more text, e.g. "12345 Ranch Rd". A bare
/// number is left alone since it is more likely a postal code.
#[inline]
fn is_street_line(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_digit()) && segment.split_whitespace().nth(1).is_some()
}
