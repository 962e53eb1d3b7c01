use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the learner's native language setting
///
/// Accepts ISO 639-1 (2-letter) and ISO 639-2 (3-letter, T or B variant)
/// codes and resolves them to the language name used in prompts.
/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"), // French
    ("ger", "deu"), // German
    ("dut", "nld"), // Dutch
    ("gre", "ell"), // Greek
    ("chi", "zho"), // Chinese
    ("cze", "ces"), // Czech
    ("ice", "isl"), // Icelandic
    ("alb", "sqi"), // Albanian
    ("arm", "hye"), // Armenian
    ("baq", "eus"), // Basque
    ("bur", "mya"), // Burmese
    ("per", "fas"), // Persian
    ("geo", "kat"), // Georgian
    ("may", "msa"), // Malay
    ("mac", "mkd"), // Macedonian
    ("rum", "ron"), // Romanian
    ("slo", "slk"), // Slovak
    ("wel", "cym"), // Welsh
];

/// Resolve an ISO 639-1 or ISO 639-2 code to a language
pub fn resolve_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == normalized_code)
                .map(|(_, t)| *t)
                .unwrap_or(normalized_code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English name of a language from its code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_name().to_string())
}

/// Get the name of a language in that language, falling back to the English name
pub fn get_native_name(code: &str) -> Result<String> {
    let language = resolve_language(code)?;
    Ok(language
        .to_autonym()
        .unwrap_or_else(|| language.to_name())
        .to_string())
}
