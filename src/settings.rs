//! Loading [`WorkbenchSettings`] from a config file and the environment.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML/JSON/YAML file (format picked from the extension)
//! 3. `BILLDOC__*` environment variables, e.g. `BILLDOC__TAX_RATE=19`
//!
//! # Example
//!
//! ```ignore
//! let settings = billdoc::settings::load("config/billdoc.toml")?;
//! ```

use std::path::Path;

use config::{Config, Environment, File};
use tracing::{debug, warn};

use crate::core::{DocumentError, WorkbenchSettings};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BILLDOC";

/// Load settings from `path` (optional) and the environment.
pub fn load(path: impl AsRef<Path>) -> Result<WorkbenchSettings, DocumentError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "settings file not found, using defaults and environment");
    }
    build(
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env_source()),
    )
}

/// Load settings from the environment only.
pub fn from_env() -> Result<WorkbenchSettings, DocumentError> {
    build(Config::builder().add_source(env_source()))
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<WorkbenchSettings, DocumentError> {
    let mut settings: WorkbenchSettings = builder
        .build()
        .and_then(|cfg| cfg.try_deserialize())
        .map_err(|e| {
            warn!(error = %e, "failed to load settings");
            DocumentError::Settings(e.to_string())
        })?;

    settings.currency_code = settings.currency_code.trim().to_ascii_uppercase();
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &WorkbenchSettings) -> Result<(), DocumentError> {
    use crate::core::sanitize::MAX_RATE;
    use rust_decimal::Decimal;

    for (name, rate) in [
        ("tax_rate", settings.tax_rate),
        ("discount_rate", settings.discount_rate),
    ] {
        if rate < Decimal::ZERO || rate > MAX_RATE {
            return Err(DocumentError::Settings(format!(
                "{name} {rate} must be between 0 and 100"
            )));
        }
    }
    let code = &settings.currency_code;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(DocumentError::Settings(format!(
            "currency_code '{}' must be a 3-letter ISO 4217 code",
            settings.currency_code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionPolicy;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, WorkbenchSettings::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billdoc.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "currency_code = \"EUR\"\ntax_rate = \"19\"\npayment_terms_days = 14\ntransition_policy = \"strict\""
        )
        .unwrap();

        let settings = load(&path).unwrap();
        assert_eq!(settings.currency_code, "EUR");
        assert_eq!(settings.tax_rate, dec!(19));
        assert_eq!(settings.payment_terms_days, 14);
        assert_eq!(settings.transition_policy, TransitionPolicy::Strict);
        assert_eq!(settings.quote_validity_days, 30);
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billdoc.toml");
        std::fs::write(&path, "discount_rate = \"120\"\n").unwrap();
        assert!(matches!(load(&path), Err(DocumentError::Settings(_))));
    }

    #[test]
    fn lowercase_currency_is_normalised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billdoc.toml");
        std::fs::write(&path, "currency_code = \" eur\"\nyear_rollover = \"continue\"\n").unwrap();

        let settings = load(&path).unwrap();
        assert_eq!(settings.currency_code, "EUR");
        assert_eq!(settings.year_rollover, crate::core::YearRollover::Continue);
    }

    #[test]
    fn malformed_currency_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billdoc.toml");
        for code in ["E1R", "€UR", "EURO", ""] {
            std::fs::write(&path, format!("currency_code = \"{code}\"\n")).unwrap();
            assert!(
                matches!(load(&path), Err(DocumentError::Settings(_))),
                "{code} should be rejected"
            );
        }
    }
}
