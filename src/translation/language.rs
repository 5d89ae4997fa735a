//! Language tags and the built-in language catalog.

use std::fmt;

use thiserror::Error;

use crate::ui::Style;

/// Known language codes (ISO 639-1, plus a few regional variants) and their names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ky", "Kyrgyz"),
    ("la", "Latin"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("tt", "Tatar"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Every ISO 639-1 code, plus the legacy `iw` and `jw` still used by Google.
const ISO_639_1_CODES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zu", "iw", "jw",
];

/// Three-letter codes accepted as translation targets.
const THREE_LETTER_CODES: &[&str] = &[
    "ace", "alz", "awa", "bal", "ban", "bbc", "bci", "bem", "bew", "bho", "bik", "bts", "btx",
    "bua", "ceb", "cgg", "chm", "ckb", "cnh", "crh", "crs", "dik", "din", "doi", "dov", "dyu",
    "fil", "fon", "fur", "gaa", "gom", "haw", "hil", "hmn", "hrx", "iba", "ilo", "jam", "kac",
    "kek", "kri", "ktu", "lij", "lmo", "ltg", "luo", "lus", "mad", "mai", "mak", "mam", "mfe",
    "min", "mni", "mwr", "ndc", "nhe", "nso", "nus", "pag", "pam", "pap", "scn", "shn", "szl",
    "tcy", "tet", "tiv", "tpi", "trp", "tyv", "udm", "yua", "zap",
];

/// A language entry as reported by a provider catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Returns the built-in catalog as owned entries.
pub fn builtin_catalog() -> Vec<Language> {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| Language::new(*code, *name))
        .collect()
}

/// Looks up the English name of a known language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid language code: '{0}'")]
pub struct InvalidLanguageCode(pub String);

/// A validated, canonical target language tag such as `ru` or `zh-TW`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parses user input into a target tag.
    ///
    /// The language subtag must be a known ISO 639 code; an optional region
    /// (`pt-BR`) or script (`mni-Mtei`) subtag may follow. Matching is
    /// case-insensitive and accepts `_` as a separator. Names come from the
    /// built-in table when available, so codes outside it are still valid.
    pub fn parse(input: &str) -> Result<Self, InvalidLanguageCode> {
        let invalid = || InvalidLanguageCode(input.to_string());

        let trimmed = input.trim();
        let mut parts = trimmed.split(['-', '_']);
        let primary = parts
            .next()
            .filter(|p| is_alpha(p, 2..=3))
            .map(str::to_ascii_lowercase)
            .filter(|p| is_known_language(p))
            .ok_or_else(invalid)?;

        let canonical = match (parts.next(), parts.next()) {
            (None, _) => primary,
            (Some(region), None) if is_alpha(region, 2..=2) => {
                format!("{primary}-{}", region.to_ascii_uppercase())
            }
            (Some(script), None) if is_alpha(script, 4..=4) => {
                format!("{primary}-{}", title_case(script))
            }
            _ => return Err(invalid()),
        };

        Ok(Self(canonical))
    }

    /// Builds a tag from a code that is already canonical.
    pub(crate) fn from_known(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// English display name, falling back to the code itself.
    pub fn name(&self) -> &str {
        language_name(&self.0).unwrap_or(&self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_known_language(primary: &str) -> bool {
    ISO_639_1_CODES.contains(&primary)
        || THREE_LETTER_CODES.contains(&primary)
        || language_name(primary).is_some()
}

fn title_case(part: &str) -> String {
    let lower = part.to_ascii_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

fn is_alpha(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic())
}

/// Prints all built-in language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:6} {}", Style::code(code), Style::secondary(name));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(LanguageTag::parse("ru").unwrap().as_str(), "ru");
        assert_eq!(LanguageTag::parse("fil").unwrap().as_str(), "fil");
        assert_eq!(LanguageTag::parse(" en ").unwrap().as_str(), "en");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(LanguageTag::parse("RU").unwrap().as_str(), "ru");
        assert_eq!(LanguageTag::parse("zh-tw").unwrap().as_str(), "zh-TW");
        assert_eq!(LanguageTag::parse("pt_br").unwrap().as_str(), "pt-BR");
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert_eq!(
            LanguageTag::parse("xx"),
            Err(InvalidLanguageCode("xx".to_string()))
        );
        assert!(LanguageTag::parse("").is_err());
        assert!(LanguageTag::parse("english").is_err());
        assert!(LanguageTag::parse("qqq").is_err());
        assert!(LanguageTag::parse("xx-US").is_err());
        assert!(LanguageTag::parse("e1").is_err());
        assert!(LanguageTag::parse("zh-TW-x").is_err());
        assert!(LanguageTag::parse("ru-").is_err());
    }

    #[test]
    fn test_parse_accepts_codes_outside_builtin_table() {
        let codes = [
            "zu", "yo", "so", "haw", "ceb", "lb", "yi", "xh", "co", "ha", "iw", "jw",
        ];
        for code in codes {
            assert!(language_name(code).is_none(), "{code} has a built-in name");
            assert_eq!(LanguageTag::parse(code).unwrap().as_str(), code);
        }
        assert_eq!(LanguageTag::parse("en-gb").unwrap().as_str(), "en-GB");
        assert_eq!(LanguageTag::parse("mni-MTEI").unwrap().as_str(), "mni-Mtei");
        assert_eq!(LanguageTag::parse("zu").unwrap().name(), "zu");
    }

    #[test]
    fn test_every_builtin_code_parses_to_itself() {
        for (code, _) in SUPPORTED_LANGUAGES {
            assert_eq!(LanguageTag::parse(code).unwrap().as_str(), *code);
        }
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(LanguageTag::parse("ja").unwrap().name(), "Japanese");
        assert_eq!(language_name("nope"), None);
    }

    #[test]
    fn test_builtin_catalog_matches_table() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), SUPPORTED_LANGUAGES.len());
        assert!(catalog.contains(&Language::new("uk", "Ukrainian")));
    }
}
