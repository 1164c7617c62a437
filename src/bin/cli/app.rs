use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use language_learner_lib::commands::{Command, CommandResponse, Dispatcher};
use language_learner_lib::settings::{Settings, SettingsStore};
use language_learner_lib::storage::{FileStore, SharedStore};
use language_learner_lib::translation::MyMemoryClient;

/// Shared application state for CLI commands
pub struct App {
    data_dir: PathBuf,
    settings: SettingsStore,
    dispatcher: Dispatcher,
}

impl App {
    /// Open the stores under `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStore::default_data_dir().context("Failed to get data directory")?,
        };

        let store = FileStore::new(data_dir.clone());
        store.init().context("Failed to initialize data directory")?;
        let backend: SharedStore = Arc::new(store);

        let settings = SettingsStore::new(backend.clone());
        let api_key = settings.load().context("Failed to load settings")?.api_key;
        let client = MyMemoryClient::new()
            .context("Failed to create translation client")?
            .with_api_key(api_key);

        let dispatcher = Dispatcher::open(backend, Box::new(client))
            .context("Failed to open saved words")?;
        log::debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            data_dir,
            settings,
            dispatcher,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> Result<Settings> {
        self.settings.load().context("Failed to load settings")
    }

    /// Run a command and return the raw response
    pub fn dispatch(&mut self, command: Command) -> CommandResponse {
        self.dispatcher.dispatch(command)
    }

    /// Run a raw JSON request
    pub fn dispatch_json(&mut self, request: &str) -> CommandResponse {
        self.dispatcher.dispatch_json(request)
    }

    /// Run a command, turning a failed response into an error
    pub fn call<T: DeserializeOwned>(&mut self, command: Command) -> Result<T> {
        let action = command.action();
        let response = self.dispatch(command);
        if !response.success {
            bail!(
                "{}",
                response.error.unwrap_or_else(|| format!("{} failed", action))
            );
        }
        serde_json::from_value(response.data.unwrap_or(Value::Null))
            .with_context(|| format!("Unexpected response to {}", action))
    }

    /// Like [`call`](Self::call) for commands that answer without data
    pub fn call_unit(&mut self, command: Command) -> Result<()> {
        self.call::<Value>(command).map(|_| ())
    }
}
