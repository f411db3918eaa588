//! Language codes accepted by the speech-to-text provider (ISO 639-1).

pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "es", "en", "pt", "fr", "de", "it", "ja", "ko", "zh", "nl", "ru", "ar", "hi", "tr", "pl",
    "sv", "no", "da", "fi", "el", "cs", "ro", "hu", "th", "id", "ms", "vi", "uk", "ca", "hr",
    "bg", "sk", "sl", "sr", "he", "fa",
];

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("spanish", "es"),
    ("english", "en"),
    ("portuguese", "pt"),
    ("french", "fr"),
    ("german", "de"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("chinese", "zh"),
    ("dutch", "nl"),
    ("russian", "ru"),
    ("arabic", "ar"),
    ("hindi", "hi"),
    ("turkish", "tr"),
    ("polish", "pl"),
    ("swedish", "sv"),
    ("norwegian", "no"),
    ("danish", "da"),
    ("finnish", "fi"),
    ("greek", "el"),
    ("czech", "cs"),
    ("romanian", "ro"),
    ("hungarian", "hu"),
    ("thai", "th"),
    ("indonesian", "id"),
    ("malay", "ms"),
    ("vietnamese", "vi"),
    ("ukrainian", "uk"),
    ("catalan", "ca"),
    ("croatian", "hr"),
    ("bulgarian", "bg"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("serbian", "sr"),
    ("hebrew", "he"),
    ("persian", "fa"),
];

/// Longest language value the response store keeps.
pub const MAX_LANGUAGE_LEN: usize = 5;

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Picks the code sent to the provider: a supported hint, otherwise `default`.
pub fn normalize_hint(hint: Option<&str>, default: &str) -> String {
    hint.map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| is_supported(h))
        .unwrap_or_else(|| default.to_string())
}

/// Converts a provider-reported language (code or long name) into a short code.
///
/// Short values are kept, known names are mapped, anything else is truncated.
pub fn normalize_detected(language: &str) -> String {
    let trimmed = language.trim();
    if trimmed.chars().count() <= MAX_LANGUAGE_LEN {
        return trimmed.to_ascii_lowercase();
    }
    let lowered = trimmed.to_lowercase();
    LANGUAGE_NAMES
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| lowered.chars().take(MAX_LANGUAGE_LEN).collect())
}
