/*!
 * Tokenizers used to segment raw text into stimulus elements.
 *
 * Three layers are involved:
 * - an explicit `Tokenizer` supplied by the caller (regex pattern or custom object),
 * - an NLP tokenizer obtained from a `TokenizerResolver` for a given language,
 * - the built-in fallback word tokenizer, used when no NLP tokenizer resolves.
 */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use crate::errors::{ResourceError, StimulusError};
use crate::language_utils;

// @const: Words and standalone punctuation for the rule-based tokenizer
static RULE_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:['\-]\w+)*|[^\w\s]").unwrap()
});

// @const: English abbreviations that do not end a sentence
const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc",
    "e.g", "i.e", "inc", "ltd", "co", "no", "fig", "mt", "approx",
];

/// Unit of segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentUnit {
    Word,
    Sentence,
}

impl FromStr for SegmentUnit {
    type Err = StimulusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "word" {
            Ok(Self::Word)
        } else if s.starts_with("sent") {
            Ok(Self::Sentence)
        } else {
            Err(StimulusError::InvalidUnit(s.to_string()))
        }
    }
}

impl fmt::Display for SegmentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => write!(f, "word"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

/// Anything that can split a string into tokens
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Caller-supplied tokenizer, overriding unit-based segmentation
pub enum Tokenizer {
    /// Regex applied with find-all semantics. When the pattern has capturing
    /// groups the first group is the token.
    Pattern(Regex),
    /// Arbitrary tokenizer object
    Custom(Box<dyn Tokenize>),
}

impl Tokenizer {
    /// Compile a pattern tokenizer
    pub fn pattern(pattern: &str) -> Result<Self, StimulusError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| StimulusError::InvalidPattern(e.to_string()))
    }

    /// Wrap a custom tokenizer object
    pub fn custom<T: Tokenize + 'static>(tokenizer: T) -> Self {
        Self::Custom(Box::new(tokenizer))
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            Self::Pattern(regex) => find_all(regex, text),
            Self::Custom(tokenizer) => tokenizer.tokenize(text),
        }
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish(),
        }
    }
}

fn find_all(regex: &Regex, text: &str) -> Vec<String> {
    if regex.captures_len() > 1 {
        regex
            .captures_iter(text)
            .map(|caps| caps.get(1).map_or_else(String::new, |m| m.as_str().to_string()))
            .collect()
    } else {
        regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

/// Language-aware tokenizer able to split words and sentences
pub trait NlpTokenizer: Send + Sync {
    fn word_tokenize(&self, text: &str) -> Vec<String>;

    fn sent_tokenize(&self, text: &str) -> Vec<String>;

    fn tokenize_unit(&self, text: &str, unit: SegmentUnit) -> Vec<String> {
        match unit {
            SegmentUnit::Word => self.word_tokenize(text),
            SegmentUnit::Sentence => self.sent_tokenize(text),
        }
    }
}

/// Supplies NLP tokenizers on demand.
///
/// Resolution is the only place where tokenizer resources are located or
/// loaded; segmentation itself never does it behind the caller's back.
pub trait TokenizerResolver {
    fn resolve(&self, language: &str) -> Result<Arc<dyn NlpTokenizer>, ResourceError>;
}

/// Resolver for environments without any NLP tokenizer resource
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl TokenizerResolver for OfflineResolver {
    fn resolve(&self, language: &str) -> Result<Arc<dyn NlpTokenizer>, ResourceError> {
        Err(ResourceError::NotInstalled(format!(
            "no NLP tokenizer configured for '{}'",
            language
        )))
    }
}

/// Resolver backed by the built-in rule-based tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResolver;

impl TokenizerResolver for RuleBasedResolver {
    fn resolve(&self, language: &str) -> Result<Arc<dyn NlpTokenizer>, ResourceError> {
        let resolved = language_utils::resolve_language(language)
            .map_err(|_| ResourceError::UnsupportedLanguage(language.to_string()))?;
        debug!("Resolved rule-based tokenizer for {}", resolved.to_name());
        Ok(Arc::new(RuleBasedTokenizer::new(resolved == isolang::Language::Eng)))
    }
}

/// Resolves each language once and keeps the tokenizer around.
/// Failed resolutions are retried on the next request.
pub struct CachingResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, Arc<dyn NlpTokenizer>>>,
}

impl<R: TokenizerResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of languages currently cached
    pub fn cached_languages(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<R: TokenizerResolver> TokenizerResolver for CachingResolver<R> {
    fn resolve(&self, language: &str) -> Result<Arc<dyn NlpTokenizer>, ResourceError> {
        let key = language.trim().to_lowercase();
        let mut cache = self.cache.lock();
        if let Some(tokenizer) = cache.get(&key) {
            return Ok(Arc::clone(tokenizer));
        }

        let tokenizer = self.inner.resolve(language)?;
        cache.insert(key, Arc::clone(&tokenizer));
        Ok(tokenizer)
    }
}

/// Regex and punctuation rules standing in for a trained tokenizer
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedTokenizer {
    english_abbreviations: bool,
}

impl RuleBasedTokenizer {
    pub fn new(english_abbreviations: bool) -> Self {
        Self { english_abbreviations }
    }

    fn is_abbreviation(&self, word: &str) -> bool {
        let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut chars = word.chars();
        // Single initials ("J. Smith")
        if let (Some(first), None) = (chars.next(), chars.next()) {
            if first.is_uppercase() {
                return true;
            }
        }
        self.english_abbreviations && ENGLISH_ABBREVIATIONS.contains(&word.to_lowercase().as_str())
    }
}

impl NlpTokenizer for RuleBasedTokenizer {
    fn word_tokenize(&self, text: &str) -> Vec<String> {
        RULE_WORD_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn sent_tokenize(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            if !matches!(c, '.' | '!' | '?') {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?') {
                j += 1;
            }
            while j < chars.len() && matches!(chars[j].1, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}') {
                j += 1;
            }

            let at_boundary = j == chars.len() || chars[j].1.is_whitespace();
            let single_period = c == '.' && j == i + 1;
            let previous_word = text[start..pos].split_whitespace().last().unwrap_or("");

            if at_boundary && !(single_period && self.is_abbreviation(previous_word)) {
                let end = if j == chars.len() { text.len() } else { chars[j].0 };
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = end;
            }
            i = j;
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}

fn in_upper_class(c: char) -> bool {
    c.is_ascii_uppercase() || c == '-' || c == '\''
}

fn in_lower_class(c: char) -> bool {
    c.is_ascii_lowercase() || c == '-' || c == '\''
}

fn in_word_class(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\''
}

fn run_length(chars: &[char], from: usize, class: fn(char) -> bool) -> usize {
    chars[from..].iter().take_while(|c| class(**c)).count()
}

// Acronyms: two or more capitals/hyphens/apostrophes not followed by a lowercase letter
fn match_acronym(chars: &[char], i: usize) -> Option<usize> {
    let run = run_length(chars, i, in_upper_class);
    (2..=run)
        .rev()
        .find(|len| !chars.get(i + len).is_some_and(|c| c.is_ascii_lowercase()))
}

// Capitalised fragment directly followed by another capital ("Mc" in "McDonald")
fn match_camel_head(chars: &[char], i: usize) -> Option<usize> {
    if !in_upper_class(chars[i]) {
        return None;
    }
    let run = run_length(chars, i + 1, in_lower_class);
    (1..=run)
        .rev()
        .map(|len| len + 1)
        .find(|len| chars.get(i + len).is_some_and(|c| c.is_ascii_uppercase()))
}

fn match_word(chars: &[char], i: usize) -> Option<usize> {
    let run = run_length(chars, i, in_word_class);
    (run > 0).then_some(run)
}

/// Dependency-free word tokenizer used when no NLP tokenizer is available.
///
/// At each position the first matching rule wins: acronym, camel-case head,
/// then a plain run of word characters, hyphens and apostrophes. Positions
/// matching no rule (whitespace, punctuation) are skipped.
pub fn fallback_word_tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let matched = match_acronym(&chars, i)
            .or_else(|| match_camel_head(&chars, i))
            .or_else(|| match_word(&chars, i));

        match matched {
            Some(len) => {
                tokens.push(chars[i..i + len].iter().collect());
                i += len;
            }
            None => i += 1,
        }
    }

    tokens
}

/// Split `text` into tokens.
///
/// An explicit tokenizer always wins and `unit` is then ignored. Otherwise the
/// unit is validated and an NLP tokenizer is requested from `resolver`; when
/// that fails, words fall back to `fallback_word_tokenize` and sentences fail.
pub fn segment(
    text: &str,
    unit: &str,
    tokenizer: Option<&Tokenizer>,
    language: &str,
    resolver: &dyn TokenizerResolver,
) -> Result<Vec<String>, StimulusError> {
    if let Some(tokenizer) = tokenizer {
        return Ok(tokenizer.tokenize(text));
    }

    let unit: SegmentUnit = unit.parse()?;
    match resolver.resolve(language) {
        Ok(nlp) => Ok(nlp.tokenize_unit(text, unit)),
        Err(e) if unit == SegmentUnit::Word => {
            warn!("NLP tokenizer unavailable ({}), using fallback word tokenizer", e);
            Ok(fallback_word_tokenize(text))
        }
        Err(e) => Err(StimulusError::TokenizerUnavailable {
            unit: unit.to_string(),
            reason: e.to_string(),
        }),
    }
}
