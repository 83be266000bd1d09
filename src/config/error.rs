use thiserror::Error;

/// Why a configuration lookup could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("Missing configuration: 'config {namespace}, {key}: <value>'")]
    MissingConfig { namespace: String, key: String },

    #[error("Missing ENV variable: '{0}'")]
    MissingEnvVar(String),

    #[error("ENV must not be used on compilation time: '{0}'")]
    EnvAtBuildTime(String),
}
