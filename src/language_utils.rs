use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for tokenizer language handling
///
/// Tokenizer languages may be given as English language names ("english",
/// "German") or as ISO 639-1 / ISO 639-2 codes. This module normalizes all of
/// them to an `isolang::Language`.

/// Map ISO 639-2/B codes to their ISO 639-2/T equivalent
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some(part2t) = bibliographic_to_terminology(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Resolve a language given by English name or ISO code
pub fn resolve_language(language: &str) -> Result<Language> {
    let trimmed = language.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Language must not be empty"));
    }

    // Names are stored capitalized ("English")
    let mut chars = trimmed.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    };
    if let Some(lang) = Language::from_name(&capitalized).or_else(|| Language::from_name(trimmed)) {
        return Ok(lang);
    }

    let part2t = normalize_to_part2t(trimmed)
        .map_err(|_| anyhow!("Unknown language: {}", language))?;
    Language::from_639_3(&part2t).ok_or_else(|| anyhow!("Unknown language: {}", language))
}

/// Check if two language identifiers denote the same language
pub fn languages_match(a: &str, b: &str) -> bool {
    match (resolve_language(a), resolve_language(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a name or code
pub fn get_language_name(language: &str) -> Result<String> {
    Ok(resolve_language(language)?.to_name().to_string())
}
