//! Translation directions offered on the reply keyboard.

use crate::translation::LanguageTag;

/// A source → target pair picked with a keyboard button.
///
/// Only the target is sent to the provider; the source is always detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    RuEn,
    EnRu,
    UkEn,
    EnUk,
    EnJa,
    JaEn,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::RuEn,
        Self::EnRu,
        Self::UkEn,
        Self::EnUk,
        Self::EnJa,
        Self::JaEn,
    ];

    /// Keyboard layout: pairs and their reverse side by side.
    pub const KEYBOARD_ROWS: [[Self; 2]; 3] = [
        [Self::RuEn, Self::EnRu],
        [Self::UkEn, Self::EnUk],
        [Self::EnJa, Self::JaEn],
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::RuEn => "ru-en",
            Self::EnRu => "en-ru",
            Self::UkEn => "ukr-en",
            Self::EnUk => "en-ukr",
            Self::EnJa => "en-ja",
            Self::JaEn => "ja-en",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RuEn => "🇷🇺 RU → 🇬🇧 EN",
            Self::EnRu => "🇬🇧 EN → 🇷🇺 RU",
            Self::UkEn => "🇺🇦 UA → 🇬🇧 EN",
            Self::EnUk => "🇬🇧 EN → 🇺🇦 UA",
            Self::EnJa => "🇬🇧 EN → 🇯🇵 JP",
            Self::JaEn => "🇯🇵 JP → 🇬🇧 EN",
        }
    }

    /// Prompt sent after the button press, written in the source language.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::RuEn => "Введите текст для перевода с ru на en:",
            Self::EnRu => "Enter text to translate from en to ru:",
            Self::UkEn => "Введіть текст для перекладу з ukr на en:",
            Self::EnUk => "Enter text to translate from en to ukr:",
            Self::EnJa => "Enter text to translate from en to ja:",
            Self::JaEn => "ja から en に翻訳するテキストを入力してください:",
        }
    }

    const fn target_code(self) -> &'static str {
        match self {
            Self::RuEn | Self::UkEn | Self::JaEn => "en",
            Self::EnRu => "ru",
            Self::EnUk => "uk",
            Self::EnJa => "ja",
        }
    }

    pub fn target(self) -> LanguageTag {
        LanguageTag::from_known(self.target_code())
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.token() == token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert_eq!(Direction::EnRu.target().as_str(), "ru");
        assert_eq!(Direction::RuEn.target().as_str(), "en");
        assert_eq!(Direction::EnUk.target().as_str(), "uk");
        assert_eq!(Direction::EnJa.target().as_str(), "ja");
    }

    #[test]
    fn test_targets_are_valid_tags() {
        for direction in Direction::ALL {
            let target = direction.target();
            assert_eq!(LanguageTag::parse(target.as_str()).unwrap(), target);
        }
    }

    #[test]
    fn test_label_and_token_lookup() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_label(direction.label()), Some(direction));
            assert_eq!(Direction::from_token(direction.token()), Some(direction));
        }
        assert_eq!(Direction::from_label("EN → RU"), None);
        assert_eq!(Direction::from_token("en-fr"), None);
    }

    #[test]
    fn test_keyboard_covers_every_direction_once() {
        let mut seen: Vec<_> = Direction::KEYBOARD_ROWS.iter().flatten().copied().collect();
        seen.dedup();
        assert_eq!(seen, Direction::ALL.to_vec());
    }
}
