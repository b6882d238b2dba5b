//! Read and update persisted settings.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use tailgate_config::defaults::DEFAULT_KEEP_TAIL_COUNT;
use tailgate_config::schema::PruningConfig;

/// The one setting the original options surface exposed, by its
/// storage key.
const KEEP_TAIL_COUNT: &str = "keep-tail-count";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a persisted setting
    Get { key: String },
    /// Update a persisted setting
    Set { key: String, value: String },
}

pub async fn run(config_path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => get(config_path, &key).await,
        ConfigAction::Set { key, value } => set(config_path, &key, &value).await,
    }
}

async fn get(config_path: &Path, key: &str) -> Result<()> {
    if key != KEEP_TAIL_COUNT {
        bail!("unknown config key: {key}");
    }
    let config = tailgate_config::load_config(config_path).await?;
    match config.keep_tail_count() {
        Some(count) => println!("{count}"),
        None => println!("{DEFAULT_KEEP_TAIL_COUNT} (default)"),
    }
    Ok(())
}

async fn set(config_path: &Path, key: &str, value: &str) -> Result<()> {
    if key != KEEP_TAIL_COUNT {
        bail!("unknown config key: {key}");
    }
    let count: i64 = value
        .parse()
        .with_context(|| format!("{value} is not an integer"))?;

    let mut config = tailgate_config::load_config(config_path).await?;
    config
        .pruning
        .get_or_insert_with(PruningConfig::default)
        .keep_tail_count = Some(count);
    tailgate_config::write_config(&config, config_path).await?;
    println!("{KEEP_TAIL_COUNT} = {count}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailgate_config::{config_file_path, load_config};

    #[tokio::test]
    async fn set_persists_the_bound() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());

        run(
            &path,
            ConfigAction::Set {
                key: KEEP_TAIL_COUNT.into(),
                value: "30".into(),
            },
        )
        .await
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.keep_tail_count(), Some(30));
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        let err = run(
            &path,
            ConfigAction::Get {
                key: "nope".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }
}
