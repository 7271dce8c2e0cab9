use complaintbase::config::AppConfig;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

/// Serializes tests that point `COMPLAINTBASE_HOME` at their own workspace.
static HOME_LOCK: Mutex<()> = Mutex::new(());

pub struct IntegrationHarness {
    workspace: TempDir,
    _home: MutexGuard<'static, ()>,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let home = HOME_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let workspace = TempDir::new().expect("failed to create temp workspace");
        env::set_var("COMPLAINTBASE_HOME", workspace.path());
        Self {
            workspace,
            _home: home,
        }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.workspace.path().join(name);
        std::fs::write(&path, contents).expect("failed to write fixture file");
        path
    }

    pub fn config(&self) -> AppConfig {
        complaintbase::config::load_or_default().expect("failed to load config")
    }
}

mod azure_client;
mod chat_router;
mod chat_session;
mod config_persistence;
pub mod support;
