use thiserror::Error;

/// errors a require batch can reject with
///
/// ImportSetup is special, the dispatcher absorbs it while probing and falls back to the
/// host's require hook, it only reaches a caller who invokes a host adapter directly
#[derive(Debug, Error)]
pub enum RequireError {
    /// no module loading primitive could be detected in the host
    #[error("no require implementation available")]
    NoImplementationAvailable,

    /// the host loader rejected or threw, cause carries the host's original error
    #[error("could not load module '{}': {cause}", .module.as_deref().unwrap_or("<batch>"))]
    LoadFailed {
        module: Option<String>,
        cause: anyhow::Error,
    },

    /// the host's dynamic import capability could not be constructed
    #[error("dynamic import setup failed: {0}")]
    ImportSetup(String),
}

impl RequireError {
    /// load failure for a single named module
    pub fn load_failed(module: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::LoadFailed {
            module: Some(module.into()),
            cause,
        }
    }

    pub fn load_failed_msg(module: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::LoadFailed {
            module: Some(module.into()),
            cause: anyhow::anyhow!(msg.into()),
        }
    }

    /// load failure of a whole batch, for hosts which report errors without a module name
    pub fn batch_failed(cause: anyhow::Error) -> Self {
        Self::LoadFailed {
            module: None,
            cause,
        }
    }

    pub fn batch_failed_msg(msg: impl Into<String>) -> Self {
        Self::LoadFailed {
            module: None,
            cause: anyhow::anyhow!(msg.into()),
        }
    }

    pub fn import_setup(msg: impl Into<String>) -> Self {
        Self::ImportSetup(msg.into())
    }

    /// the identifier that failed, when the host loader attributed the error to one
    pub fn failed_module(&self) -> Option<&str> {
        match self {
            Self::LoadFailed {
                module: Some(module),
                ..
            } => Some(module.as_str()),
            _ => None,
        }
    }
}
