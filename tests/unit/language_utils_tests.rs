/*!
 * Tests for language utility functions
 */

use anyhow::Result;
use textstim::language_utils;

/// Test ISO 639-1 to 639-2/T normalization
#[test]
fn test_normalizeToPart2t_withTwoLetterCode_shouldReturnThreeLetters() -> Result<()> {
    assert_eq!(language_utils::normalize_to_part2t("en")?, "eng");
    assert_eq!(language_utils::normalize_to_part2t("FR")?, "fra");
    Ok(())
}

/// Test that bibliographic codes map to terminology codes
#[test]
fn test_normalizeToPart2t_withBibliographicCode_shouldMapToTerminology() -> Result<()> {
    assert_eq!(language_utils::normalize_to_part2t("ger")?, "deu");
    assert_eq!(language_utils::normalize_to_part2t("fre")?, "fra");
    Ok(())
}

/// Test that invalid codes are rejected
#[test]
fn test_normalizeToPart2t_withInvalidCode_shouldFail() {
    assert!(language_utils::normalize_to_part2t("xx").is_err());
    assert!(language_utils::normalize_to_part2t("english").is_err());
}

/// Test that names and codes resolve to the same English name
#[test]
fn test_getLanguageName_withNameOrCode_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(language_utils::get_language_name("english")?, "English");
    assert_eq!(language_utils::get_language_name("de")?, "German");
    assert_eq!(language_utils::get_language_name(" Spanish ")?, "Spanish");
    Ok(())
}

/// Test language matching across forms
#[test]
fn test_languagesMatch_withEquivalentForms_shouldMatch() {
    assert!(language_utils::languages_match("en", "English"));
    assert!(language_utils::languages_match("fre", "fr"));
    assert!(!language_utils::languages_match("en", "unknown"));
}
