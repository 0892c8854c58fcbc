//! Configuration validation for Lexis services.
//!
//! Each configuration section validates its own invariants; [`Config::validate`]
//! collects the failures of every section.

use thiserror::Error;

use crate::config::{AuthConfig, Config, LexiconConfig, ObservabilityConfig, ScoringConfig, ServerConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        let sections: [&dyn Validate; 5] = [
            &self.server,
            &self.auth,
            &self.lexicon,
            &self.scoring,
            &self.observability,
        ];
        for section in sections {
            if let Err(e) = section.validate() {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load, apply environment overrides, and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "server.host".into(),
            });
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidValue {
                field: "server.port".into(),
                reason: "must be between 1 and 65535".into(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "server.max_body_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.moderator_roles.is_empty() {
            return Err(ValidationError::MissingField {
                field: "auth.moderator_roles".into(),
            });
        }
        if let Some(secret) = &self.jwt_secret {
            if secret.len() < 16 {
                return Err(ValidationError::InvalidValue {
                    field: "auth.jwt_secret".into(),
                    reason: "must be at least 16 bytes".into(),
                });
            }
        }
        Ok(())
    }
}

impl Validate for LexiconConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.min_learned_token_chars == 0 {
            return Err(ValidationError::InvalidValue {
                field: "lexicon.min_learned_token_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ScoringConfig {
    fn validate(&self) -> ValidationResult<()> {
        let invalid = |field: &str, reason: &str| ValidationError::InvalidValue {
            field: format!("scoring.{field}"),
            reason: reason.into(),
        };

        if self.short_text_max_words == 0 {
            return Err(invalid("short_text_max_words", "must be greater than 0"));
        }
        if self.medium_text_max_words <= self.short_text_max_words {
            return Err(invalid(
                "medium_text_max_words",
                "must be greater than short_text_max_words",
            ));
        }
        if self.long_text_min_words <= self.medium_text_max_words {
            return Err(invalid(
                "long_text_min_words",
                "must be greater than medium_text_max_words",
            ));
        }
        for (field, value) in [
            ("short_text_multiplier", self.short_text_multiplier),
            ("medium_text_multiplier", self.medium_text_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be a positive finite number"));
            }
        }
        if !(self.interrogative_penalty > 0.0 && self.interrogative_penalty <= 1.0) {
            return Err(invalid("interrogative_penalty", "must be in (0, 1]"));
        }
        if !self.positive_threshold.is_finite()
            || !self.negative_threshold.is_finite()
            || self.negative_threshold > self.positive_threshold
        {
            return Err(invalid(
                "negative_threshold",
                "thresholds must be finite with negative_threshold <= positive_threshold",
            ));
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }
        Ok(())
    }
}
