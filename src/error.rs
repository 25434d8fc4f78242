use thiserror::Error;

/// Coarse classification of [`ConfError`], used by callers deciding whether a
/// failed render should block reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A pipeline names an input or output that does not exist.
    Reference,
    /// The topology itself is malformed.
    Invalid,
    /// Secret material needed by an output is missing or unusable.
    Credential,
    /// Internal consistency failure in generated elements.
    Structural,
}

/// Errors produced while validating a topology or rendering its configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfError {
    #[error("pipeline {pipeline:?} references unknown input {input:?}")]
    UnknownInput { pipeline: String, input: String },

    #[error("pipeline {pipeline:?} references unknown output {output:?}")]
    UnknownOutput { pipeline: String, output: String },

    #[error("duplicate pipeline name {0:?}")]
    DuplicatePipeline(String),

    #[error("duplicate output name {0:?}")]
    DuplicateOutput(String),

    #[error("output name {0:?} is reserved")]
    ReservedOutputName(String),

    #[error("pipeline {pipeline:?} must reference at least one {missing}")]
    EmptyPipeline {
        pipeline: String,
        missing: &'static str,
    },

    #[error("output {0:?} requires a url")]
    MissingUrl(String),

    #[error("output {0:?} of type googleCloudLogging requires a googleCloudLogging block")]
    MissingGoogleCloudLogging(String),

    #[error("component id {id:?} is used by both {first:?} and {second:?}")]
    ComponentIdConflict {
        id: String,
        first: String,
        second: String,
    },

    #[error("secrets {first:?} and {second:?} share environment id {env:?}")]
    SecretEnvConflict {
        env: String,
        first: String,
        second: String,
    },

    #[error("output {output:?} references missing secret {secret:?}")]
    MissingSecret { output: String, secret: String },

    #[error("output {output:?}: secret {secret:?} is missing key {key:?}")]
    MissingSecretKey {
        output: String,
        secret: String,
        key: &'static str,
    },

    #[error("output {output:?}: secret key {key:?} is not valid UTF-8")]
    InvalidSecretValue { output: String, key: &'static str },

    #[error("cyclic template reference: {path}")]
    TemplateCycle { path: String },

    #[error("element name {0:?} is shared by elements with different content")]
    NameCollision(String),

    #[error("element {0:?} is not registered")]
    UnknownElement(String),

    #[error("element {element:?} has no field {field:?}")]
    MissingField { element: String, field: String },

    #[error("template error: {0}")]
    Template(String),
}

impl ConfError {
    pub fn kind(&self) -> ErrorKind {
        use ConfError::*;

        match self {
            UnknownInput { .. } | UnknownOutput { .. } => ErrorKind::Reference,
            DuplicatePipeline(_)
            | DuplicateOutput(_)
            | ReservedOutputName(_)
            | EmptyPipeline { .. }
            | MissingUrl(_)
            | MissingGoogleCloudLogging(_)
            | ComponentIdConflict { .. }
            | SecretEnvConflict { .. } => ErrorKind::Invalid,
            MissingSecret { .. } | MissingSecretKey { .. } | InvalidSecretValue { .. } => {
                ErrorKind::Credential
            }
            TemplateCycle { .. }
            | NameCollision(_)
            | UnknownElement(_)
            | MissingField { .. }
            | Template(_) => ErrorKind::Structural,
        }
    }
}

impl From<regex::Error> for ConfError {
    fn from(err: regex::Error) -> Self {
        ConfError::Template(err.to_string())
    }
}
