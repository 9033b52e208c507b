use std::sync::OnceLock;

use regex::Regex;

use super::patterns::PatternCatalog;
use super::types::{Forecast, Pattern, PatternListView, PatternMatches};

pub const FORECAST_NOT_FOUND: &str = "❌ Прогноз не найден.";
pub const NEW_PATTERN_MARKER: &str = "(новый)";
pub const NO_PATTERNS_TITLE: &str = "❌ Паттерны не распознаны";
pub const NO_PATTERNS_DESCRIPTION: &str = "Модель не нашла совпадений.";

fn forecast_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*Прогноз:(.*?)\*\*").expect("valid forecast regex"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%%(.*?)%%").expect("valid pattern token regex"))
}

/// Returns the whole bolded `**Прогноз: ...**` marker, first occurrence only.
pub fn extract_forecast(text: &str) -> Forecast {
    match forecast_regex().find(text) {
        Some(m) => Forecast::Found(m.as_str().to_string()),
        None => Forecast::NotFound,
    }
}

impl Forecast {
    pub fn label(&self) -> &str {
        match self {
            Forecast::Found(text) => text,
            Forecast::NotFound => FORECAST_NOT_FOUND,
        }
    }
}

fn names_overlap(token: &str, known: &str) -> bool {
    token.contains(known) || known.contains(token)
}

/// Splits `%%name%%` tokens into catalog matches and new patterns.
pub fn extract_pattern_names(text: &str, catalog: &PatternCatalog) -> PatternMatches {
    let mut matches = PatternMatches::default();
    if text.is_empty() {
        return matches;
    }

    let known_names = catalog.lowercase_names();

    for cap in token_regex().captures_iter(text) {
        let clean = cap[1].trim().to_lowercase();
        if clean.is_empty() {
            continue;
        }

        if clean.ends_with(NEW_PATTERN_MARKER) {
            let stripped = clean.replace(NEW_PATTERN_MARKER, "").trim().to_string();
            if !stripped.is_empty() {
                matches.new_patterns.push(stripped);
            }
        } else if known_names.iter().any(|k| names_overlap(&clean, k)) {
            matches.detected.push(clean);
        } else {
            matches.new_patterns.push(clean);
        }
    }

    matches
}

/// Catalog entries (catalog order) that any detected token refers to.
pub fn recognized_patterns(detected: &[String], catalog: &PatternCatalog) -> Vec<Pattern> {
    catalog
        .all()
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            detected.iter().any(|d| names_overlap(d, &name))
        })
        .cloned()
        .collect()
}

pub fn build_pattern_view(matches: &PatternMatches, catalog: &PatternCatalog) -> PatternListView {
    if matches.is_empty() {
        return PatternListView {
            recognized: Vec::new(),
            new_patterns: Vec::new(),
            empty_title: Some(NO_PATTERNS_TITLE.to_string()),
            empty_description: Some(NO_PATTERNS_DESCRIPTION.to_string()),
        };
    }

    PatternListView {
        recognized: recognized_patterns(&matches.detected, catalog),
        new_patterns: matches.new_patterns.clone(),
        empty_title: None,
        empty_description: None,
    }
}
