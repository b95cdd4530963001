use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and an initial `config.json` file with default
/// settings. Running it again on an existing directory keeps the existing configuration.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/homelist`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the homelist directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("homelist");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(Config::load(&home).await.is_ok());

        // idempotent
        assert!(init(&home).await.is_ok());
    }
}
