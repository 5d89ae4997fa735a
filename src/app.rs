//! Wires configured components into a ready-to-serve router.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::bot::EventRouter;
use crate::config::{ResolvedConfig, ResolvedProvider};
use crate::pipeline::TranslationPipeline;
use crate::session::SessionRegistry;
use crate::store::{PersistenceStore, SqliteStore};
use crate::translation::{ChatCompletionsClient, GoogleTranslateClient, TranslationClient};

/// Long-lived components shared by every event handler.
pub struct App {
    pub router: Arc<EventRouter>,
    pub sessions: Arc<SessionRegistry>,
}

impl App {
    pub fn build(config: &ResolvedConfig) -> Result<Self> {
        let client = build_client(config)?;

        let store: Arc<dyn PersistenceStore> = Arc::new(
            SqliteStore::open(&config.db_path).with_context(|| {
                format!("Failed to open database: {}", config.db_path.display())
            })?,
        );

        Ok(Self::from_parts(client, store, &config.languages_locale))
    }

    pub fn from_parts(
        client: Arc<dyn TranslationClient>,
        store: Arc<dyn PersistenceStore>,
        languages_locale: &str,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let pipeline = TranslationPipeline::new(Arc::clone(&sessions), client, store)
            .with_languages_locale(languages_locale);

        Self {
            router: Arc::new(EventRouter::new(Arc::new(pipeline))),
            sessions,
        }
    }
}

fn build_client(config: &ResolvedConfig) -> Result<Arc<dyn TranslationClient>> {
    let client: Arc<dyn TranslationClient> = match &config.provider {
        ResolvedProvider::Google { endpoint, api_key } => {
            info!(endpoint = %endpoint, "using Google Cloud Translation");
            Arc::new(
                GoogleTranslateClient::new(
                    endpoint.clone(),
                    api_key.clone(),
                    config.provider_timeout,
                )
                .context("Failed to create translation client")?,
            )
        }
        ResolvedProvider::ChatCompletions {
            endpoint,
            model,
            api_key,
        } => {
            info!(endpoint = %endpoint, model = %model, "using chat completions provider");
            Arc::new(
                ChatCompletionsClient::new(
                    endpoint.clone(),
                    model.clone(),
                    api_key.clone(),
                    config.provider_timeout,
                )
                .context("Failed to create translation client")?,
            )
        }
    };

    Ok(client)
}
