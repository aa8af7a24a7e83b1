//! `pony config`: show or change persisted settings.

use crate::{
    config::{AppPaths, Settings, parse_assignment},
    log,
};
use anyhow::Result;

/// Print the settings, or apply one `key=value` assignment.
pub fn run_config(assignment: Option<&str>, paths: &AppPaths) -> Result<()> {
    paths.ensure()?;
    let path = paths.config_file();
    let mut settings = Settings::load(&path)?;

    let Some(assignment) = assignment else {
        println!("# {}", path.display());
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    };

    let (key, value) = parse_assignment(assignment)?;
    settings.set(key, value)?;
    settings.save(&path)?;
    log!("config"; "{} = {}", key, value.trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::TempDir;

    #[test]
    fn test_set_persists() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::at(temp.path());

        run_config(Some("theme=ribbon"), &paths).unwrap();
        run_config(Some("wsport=9001"), &paths).unwrap();

        let settings = Settings::load(&paths.config_file()).unwrap();
        assert_eq!(settings.theme, "ribbon");
        assert_eq!(settings.wsport, 9001);
    }

    #[test]
    fn test_bad_assignment_leaves_file() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::at(temp.path());
        run_config(None, &paths).unwrap();
        let before = std::fs::read_to_string(paths.config_file()).unwrap();

        let err = run_config(Some("colour=red"), &paths).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownKey(_))
        ));
        assert!(run_config(Some("port"), &paths).is_err());

        assert_eq!(std::fs::read_to_string(paths.config_file()).unwrap(), before);
    }
}
