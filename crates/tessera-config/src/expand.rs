//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Only the braced form is recognized, so a literal `$` in a path or URL
/// passes through. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    };

    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(err) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.cause.0),
        }),
    }
}

/// A referenced variable without a value or default.
struct UnsetVar(String);
