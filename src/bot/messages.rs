//! Fixed bot copy and reply formatting.

use chrono::{DateTime, Utc};

use crate::store::{TranslationRecord, UsageStats};
use crate::translation::Language;

pub const WELCOME: &str = "Welcome to Elarion, a bot that translates text into any language!\n\n\
    Pick a direction on the keyboard and send your text, or use:\n\
    /translate [target lang code] [text]\n\
    Example: /translate ru Hello World\n\n\
    /history shows your recent translations, /stats your statistics, \
    /languages the available languages and their codes.";

pub const TRANSLATE_USAGE: &str = "Use the format: /translate [target lang code] [text]";
pub const INVALID_LANGUAGE_CODE: &str =
    "Invalid language code. Use ISO 639-1 codes such as en, es, ru.";
pub const TRANSLATION_FAILED_PREFIX: &str = "Translation failed: ";
pub const HISTORY_NOT_SAVED: &str =
    "⚠️ The translation was done, but it could not be saved to your history.";
pub const HISTORY_EMPTY: &str = "Your translation history is empty.";
pub const HISTORY_FAILED: &str = "Could not load your translation history.";
pub const STATS_EMPTY: &str = "You have no statistics yet.";
pub const STATS_FAILED: &str = "Could not load your statistics.";
pub const LANGUAGES_FAILED: &str = "Could not load the list of languages.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /help to see what I can do.";

/// Longest stretch of each history text field shown back to the user.
pub const HISTORY_TEXT_LIMIT: usize = 500;
const PROVIDER_MESSAGE_LIMIT: usize = 200;

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Truncates to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Makes a provider error safe to echo: control characters become spaces,
/// runs of whitespace collapse, and the result is length-limited.
pub fn sanitize_provider_message(message: &str) -> String {
    let cleaned: String = message
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_text(&collapsed, PROVIDER_MESSAGE_LIMIT)
}

pub fn translation_failed(message: &str) -> String {
    format!(
        "{TRANSLATION_FAILED_PREFIX}{}",
        sanitize_provider_message(message)
    )
}

pub fn translated_without_history(text: &str) -> String {
    format!("{text}\n\n{HISTORY_NOT_SAVED}")
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_history(records: &[TranslationRecord]) -> String {
    if records.is_empty() {
        return HISTORY_EMPTY.to_string();
    }

    let entries: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "🔄 {}\n📝 {} → {}\n⏰ {}\n",
                truncate_text(&r.original, HISTORY_TEXT_LIMIT),
                truncate_text(&r.translated, HISTORY_TEXT_LIMIT),
                r.to_lang,
                format_timestamp(&r.created_at),
            )
        })
        .collect();

    format!("Your recent translations:\n\n{}", entries.join("\n"))
}

pub fn format_stats(stats: Option<&UsageStats>) -> String {
    stats.map_or_else(
        || STATS_EMPTY.to_string(),
        |s| {
            format!(
                "📊 Your statistics:\nTranslations: {}\nLast used: {}",
                s.translation_count,
                format_timestamp(&s.last_used)
            )
        },
    )
}

pub fn format_languages(languages: &[Language]) -> String {
    let lines: Vec<String> = languages
        .iter()
        .map(|l| format!("{} ({})", l.code, l.name))
        .collect();
    format!("Available languages:\n\n{}", lines.join("\n"))
}
