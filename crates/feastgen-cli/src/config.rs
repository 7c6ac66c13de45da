use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use feastgen_generate::{GenerateOptions, LocaleKey};
use feastgen_sink::{ExportDestination, StoreDestination};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// TOML configuration file. Every table is optional.
///
/// ```toml
/// [generate]
/// seed = 42
/// customers = 100
///
/// [store]
/// database_url = "postgres://localhost/feast"
///
/// [export]
/// path = "fixtures/mock_data.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub generate: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreDestination>,
    pub export: ExportDestination,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub anchor: Option<DateTime<Utc>>,
    pub locale: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfig, CliError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn resolve_options(
    mut options: GenerateOptions,
    overrides: &Overrides,
) -> Result<GenerateOptions, CliError> {
    if let Some(seed) = overrides.seed {
        options.seed = Some(seed);
    }
    if let Some(anchor) = overrides.anchor {
        options.anchor = Some(anchor);
    }
    if let Some(locale) = overrides.locale.as_deref() {
        options.locale = LocaleKey::parse(locale).ok_or_else(|| {
            CliError::InvalidConfig(format!("unsupported locale '{locale}' (en_US, pt_BR)"))
        })?;
    }
    options.validate()?;
    Ok(options)
}

/// Merge `seed` flags into the `[store]` table.
pub fn resolve_store(
    configured: Option<StoreDestination>,
    database_url: Option<String>,
    schema: Option<String>,
    no_clear: bool,
    suspend_constraints: bool,
) -> Result<StoreDestination, CliError> {
    let mut store = match (configured, database_url) {
        (Some(mut store), Some(url)) => {
            store.database_url = url;
            store
        }
        (Some(store), None) => store,
        (None, Some(url)) => StoreDestination::new(url),
        (None, None) => {
            return Err(CliError::InvalidConfig(
                "seed needs --database-url or a [store] table in the config".to_string(),
            ));
        }
    };
    if let Some(schema) = schema {
        store.schema = schema;
    }
    if no_clear {
        store.clear = false;
    }
    if suspend_constraints {
        store.suspend_constraints = true;
    }
    Ok(store)
}

pub fn resolve_export(configured: ExportDestination, out: Option<PathBuf>) -> ExportDestination {
    match out {
        Some(path) => ExportDestination { path },
        None => configured,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [generate]
            seed = 7
            customers = 5
            locale = "pt_BR"

            [store]
            database_url = "postgres://localhost/feast"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.generate.seed, Some(7));
        assert_eq!(config.generate.customers, 5);
        assert_eq!(config.generate.locale, LocaleKey::PtBr);
        assert_eq!(config.generate.couriers, 10);
        let store = config.store.expect("store table");
        assert_eq!(store.schema, "public");
        assert!(store.clear);
        assert_eq!(config.export.path, PathBuf::from("mock_data.json"));
    }

    #[test]
    fn flags_override_the_file() {
        let anchor = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let options = resolve_options(
            GenerateOptions {
                seed: Some(1),
                ..GenerateOptions::default()
            },
            &Overrides {
                seed: Some(2),
                anchor: Some(anchor),
                locale: Some("en_US".to_string()),
            },
        )
        .expect("options");

        assert_eq!(options.seed, Some(2));
        assert_eq!(options.anchor, Some(anchor));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let result = resolve_options(
            GenerateOptions::default(),
            &Overrides {
                locale: Some("fr_FR".to_string()),
                ..Overrides::default()
            },
        );
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn store_flags_merge_with_config() {
        let store = resolve_store(
            Some(StoreDestination::new("postgres://config/feast")),
            None,
            Some("app".to_string()),
            true,
            true,
        )
        .expect("store");
        assert_eq!(store.database_url, "postgres://config/feast");
        assert_eq!(store.schema, "app");
        assert!(!store.clear);
        assert!(store.suspend_constraints);

        assert!(matches!(
            resolve_store(None, None, None, false, false),
            Err(CliError::InvalidConfig(_))
        ));
    }
}
