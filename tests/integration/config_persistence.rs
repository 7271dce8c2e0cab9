use anyhow::Result;
use complaintbase::classification::IssueTaxonomy;
use complaintbase::config::{self, AppConfig};

use crate::IntegrationHarness;

#[test]
fn missing_file_yields_defaults() {
    let harness = IntegrationHarness::new();
    let config = harness.config();
    assert!(config.dataset.path.is_none());
    assert_eq!(config.classifier.taxonomy, IssueTaxonomy::Granular);
    assert_eq!(config.chat.sample_size, 15);
    assert!(!config::config_file_path().unwrap().exists());
}

#[test]
fn saved_config_is_reloaded_from_workspace() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut config = AppConfig::default();
    config.dataset.path = Some(harness.workspace_path().join("comments.jsonl"));
    config.classifier.taxonomy = IssueTaxonomy::Dashboard;
    config.chat.suggestions_enabled = false;
    config::save(&config)?;

    let path = config::config_file_path()?;
    assert!(path.starts_with(harness.workspace_path()));
    let written = std::fs::read_to_string(&path)?;
    assert!(written.contains("taxonomy = \"dashboard\""), "{written}");
    assert!(!written.contains("api_key ="), "keys never hit the disk: {written}");

    let reloaded = harness.config();
    assert_eq!(reloaded.dataset.path, config.dataset.path);
    assert_eq!(reloaded.classifier.taxonomy, IssueTaxonomy::Dashboard);
    assert!(!reloaded.chat.suggestions_enabled);
    Ok(())
}

#[test]
fn unparseable_file_is_an_error() -> Result<()> {
    let _harness = IntegrationHarness::new();
    std::fs::create_dir_all(config::config_dir()?)?;
    std::fs::write(config::config_file_path()?, "[chat\nsample_size = ")?;
    let err = config::load_or_default().unwrap_err();
    assert!(format!("{err}").contains("Failed to parse config file"));
    Ok(())
}
