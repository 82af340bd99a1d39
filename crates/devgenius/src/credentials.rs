use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use devgenius_core::config::{
    resolve_api_key, save_api_key, CredentialError, CredentialStore, API_KEY_NAME,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Parser)]
#[command(name = "key")]
#[command(about = "Manage the stored Gemini API key")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Save a Gemini API key
    #[clap(name = "set")]
    Set {
        /// The API key from Google AI Studio
        key: String,
    },

    /// Show the stored key (masked) and where it lives
    #[clap(name = "show")]
    Show,

    /// Remove the stored key
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut store = FileCredentialStore::open_default()?;

    if global.verbose {
        eprintln!("Credential file: {}", store.path().display());
    }

    match app.command {
        Commands::Set { key } => {
            save_api_key(&mut store, &key)?;
            println!("{}", "API Key Saved".green().bold());
            println!("Your Gemini API key has been saved to {}", store.path().display());
        }
        Commands::Show => match resolve_api_key(None, &store)? {
            Some(key) => println!("{} {}", "Stored key:".green(), key.masked()),
            None => println!("{}", "No API key stored. Run `devgenius key set <KEY>`".yellow()),
        },
        Commands::Clear => {
            store.remove(API_KEY_NAME)?;
            println!("{}", "API key removed".green());
        }
    }

    Ok(())
}

/// Location of the credentials file under the user's config directory.
fn default_path() -> Result<PathBuf> {
    let config_dir = dirs_next::config_dir().ok_or(Error::NoConfigDir)?;
    Ok(config_dir.join("devgenius").join("credentials.json"))
}

/// Credentials kept as a flat JSON object on disk.
///
/// The file is written on every change and created on the first save.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileCredentialStore {
    pub fn open_default() -> Result<Self> {
        let path = default_path()?;
        Ok(Self::open(path)?)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| CredentialError::Storage(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| CredentialError::Corrupt(format!("{}: {e}", path.display())))?
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened credential store at {}", path.display());

        Ok(FileCredentialStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CredentialError::Storage(format!("{}: {e}", parent.display())))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CredentialError::Storage(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| CredentialError::Storage(format!("{}: {e}", self.path.display())))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| CredentialError::Storage(e.to_string()))?;
        }

        log::debug!("Wrote credential store at {}", self.path.display());

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.entries.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), CredentialError> {
        self.entries.insert(name.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, name: &str) -> Result<(), CredentialError> {
        if self.entries.remove(name).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
