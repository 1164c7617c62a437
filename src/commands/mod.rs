//! Command dispatch
//!
//! Every request from the presentation layer is a [`Command`]. The
//! [`Dispatcher`] runs it against the stores and always answers with a
//! [`CommandResponse`]; errors never escape as panics or `Err` values.

mod error;
mod transfer;
mod words;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::export::ExportFormat;
use crate::settings::SettingsStore;
use crate::storage::SharedStore;
use crate::translation::{TranslationOutcome, TranslationService, Translator};
use crate::vocabulary::{IntervalPolicy, SaveRequest, SortOrder, WordProgressStore};

pub use error::{CommandError, CommandResult};
pub use transfer::ExportedFile;
pub use words::{Affected, WordLookup};

/// A request, tagged by its `action` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    SaveWord(SaveRequest),
    GetSavedWords,
    CheckWordExists {
        word: String,
    },
    RemoveWord {
        word: String,
    },
    UpdateWordProgress {
        word: String,
        policy: Option<IntervalPolicy>,
    },
    UpdateWordStatus {
        word: String,
        #[serde(alias = "status")]
        new_status: String,
    },
    ToggleDifficulty {
        word: String,
    },
    ResetProgress {
        word: String,
    },
    RecordView {
        word: String,
    },
    ClearAllWords,
    QueryWords {
        filter: Option<String>,
        search: Option<String>,
        sort: Option<SortOrder>,
    },
    GetDueWords,
    PromoteStale,
    TranslateWord {
        #[serde(alias = "text")]
        word: String,
        from: Option<String>,
        to: Option<String>,
    },
    GetApiStatus,
    ClearTranslationCache,
    GetSettings,
    SaveSettings {
        settings: Value,
    },
    ExportWords {
        #[serde(default)]
        format: ExportFormat,
    },
    ImportWords {
        content: String,
    },
    GetStats,
}

impl Command {
    /// The `action` tag of this command
    pub fn action(&self) -> &'static str {
        match self {
            Self::SaveWord(_) => "saveWord",
            Self::GetSavedWords => "getSavedWords",
            Self::CheckWordExists { .. } => "checkWordExists",
            Self::RemoveWord { .. } => "removeWord",
            Self::UpdateWordProgress { .. } => "updateWordProgress",
            Self::UpdateWordStatus { .. } => "updateWordStatus",
            Self::ToggleDifficulty { .. } => "toggleDifficulty",
            Self::ResetProgress { .. } => "resetProgress",
            Self::RecordView { .. } => "recordView",
            Self::ClearAllWords => "clearAllWords",
            Self::QueryWords { .. } => "queryWords",
            Self::GetDueWords => "getDueWords",
            Self::PromoteStale => "promoteStale",
            Self::TranslateWord { .. } => "translateWord",
            Self::GetApiStatus => "getApiStatus",
            Self::ClearTranslationCache => "clearTranslationCache",
            Self::GetSettings => "getSettings",
            Self::SaveSettings { .. } => "saveSettings",
            Self::ExportWords { .. } => "exportWords",
            Self::ImportWords { .. } => "importWords",
            Self::GetStats => "getStats",
        }
    }
}

/// `{success, error?, data?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn empty() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    pub fn failure(error: CommandError) -> Self {
        Self {
            success: false,
            error: Some(error.message),
            data: None,
        }
    }

    fn from_outcome(outcome: TranslationOutcome) -> CommandResult<Self> {
        Ok(Self {
            success: outcome.success,
            error: outcome.error.clone(),
            data: Some(serde_json::to_value(outcome)?),
        })
    }
}

fn respond<T: Serialize>(data: T) -> CommandResult<CommandResponse> {
    Ok(CommandResponse::ok(serde_json::to_value(data)?))
}

/// Runs commands against the word store, settings, and translation service
pub struct Dispatcher {
    words: WordProgressStore,
    settings: SettingsStore,
    translation: TranslationService,
}

impl Dispatcher {
    pub fn new(
        words: WordProgressStore,
        settings: SettingsStore,
        translation: TranslationService,
    ) -> Self {
        Self {
            words,
            settings,
            translation,
        }
    }

    /// Open every store on the same backend
    pub fn open(backend: SharedStore, translator: Box<dyn Translator>) -> CommandResult<Self> {
        let words = WordProgressStore::open(backend.clone())?;
        let settings = SettingsStore::new(backend.clone());
        let translation = TranslationService::new(translator, backend);
        Ok(Self::new(words, settings, translation))
    }

    pub fn words(&self) -> &WordProgressStore {
        &self.words
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn dispatch(&mut self, command: Command) -> CommandResponse {
        self.dispatch_at(command, Utc::now())
    }

    pub fn dispatch_at(&mut self, command: Command, now: DateTime<Utc>) -> CommandResponse {
        let action = command.action();
        log::debug!("Dispatching {}", action);
        match self.execute(command, now) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} failed: {}", action, e);
                CommandResponse::failure(e)
            }
        }
    }

    /// Parse a JSON request and dispatch it
    pub fn dispatch_json(&mut self, request: &str) -> CommandResponse {
        match serde_json::from_str::<Command>(request) {
            Ok(command) => self.dispatch(command),
            Err(e) => CommandResponse::failure(e.into()),
        }
    }

    fn execute(&mut self, command: Command, now: DateTime<Utc>) -> CommandResult<CommandResponse> {
        match command {
            Command::SaveWord(request) => respond(words::save_word(&mut self.words, request, now)?),
            Command::GetSavedWords => respond(self.words.words()),
            Command::CheckWordExists { word } => {
                respond(words::check_word_exists(&self.words, &word))
            }
            Command::RemoveWord { word } => respond(self.words.remove(&word)?),
            Command::UpdateWordProgress { word, policy } => respond(words::update_word_progress(
                &mut self.words,
                &word,
                policy,
                now,
            )?),
            Command::UpdateWordStatus { word, new_status } => respond(
                words::update_word_status(&mut self.words, &word, &new_status, now)?,
            ),
            Command::ToggleDifficulty { word } => respond(self.words.toggle_difficulty(&word)?),
            Command::ResetProgress { word } => respond(self.words.reset_progress_at(&word, now)?),
            Command::RecordView { word } => respond(self.words.record_view_at(&word, now)?),
            Command::ClearAllWords => {
                self.words.clear_all()?;
                Ok(CommandResponse::empty())
            }
            Command::QueryWords {
                filter,
                search,
                sort,
            } => respond(words::query_words(
                &self.words,
                filter.as_deref(),
                search,
                sort,
            )?),
            Command::GetDueWords => respond(self.words.due_words(now)),
            Command::PromoteStale => {
                let progress_days = self.settings.load()?.word_progress_days;
                respond(words::promote_stale(&mut self.words, progress_days, now)?)
            }
            Command::TranslateWord { word, from, to } => {
                let settings = self.settings.load()?;
                let from = from.unwrap_or(settings.original_language);
                let to = to.unwrap_or(settings.translation_language);
                CommandResponse::from_outcome(self.translation.translate_outcome(&word, &from, &to))
            }
            Command::GetApiStatus => respond(self.settings.load()?.api_status()),
            Command::ClearTranslationCache => {
                self.translation.clear_cache()?;
                Ok(CommandResponse::empty())
            }
            Command::GetSettings => respond(self.settings.load()?),
            Command::SaveSettings { settings } => respond(self.settings.merge(settings)?),
            Command::ExportWords { format } => respond(transfer::export(&self.words, format, now)?),
            Command::ImportWords { content } => {
                respond(transfer::import(&mut self.words, &content)?)
            }
            Command::GetStats => respond(self.words.stats(now)),
        }
    }
}
