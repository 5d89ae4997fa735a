mod chat_completions;
mod client;
mod google;
mod language;
mod prompt;

pub use chat_completions::ChatCompletionsClient;
pub use client::{ProviderError, TranslationClient};
pub use google::{DEFAULT_ENDPOINT as GOOGLE_DEFAULT_ENDPOINT, GoogleTranslateClient};
pub use language::{
    InvalidLanguageCode, Language, LanguageTag, SUPPORTED_LANGUAGES, builtin_catalog,
    language_name, print_languages,
};
