use thiserror::Error;

use crate::instance::Instance;
use crate::value::QName;

/// Failure of an authoritative navigation or edit.
///
/// Every variant carries the instance the operation was invoked on, so the
/// error renders as `[<pointer>] <text>`.
#[derive(Debug, Error, Clone)]
pub enum InstanceError {
    /// The operation doesn't apply to the shape of the focused value or to
    /// its context.
    #[error("[{}] {text}", .instance.pointer())]
    InstanceTypeError { instance: Instance, text: String },
    /// The addressed instance doesn't exist.
    #[error("[{}] {text}", .instance.pointer())]
    NonexistentInstance { instance: Instance, text: String },
    /// A member of that name is already present.
    #[error("[{}] member {name}", .instance.pointer())]
    DuplicateMember { instance: Instance, name: QName },
}

impl InstanceError {
    pub(crate) fn type_error(instance: &Instance, text: impl Into<String>) -> Self {
        let err = InstanceError::InstanceTypeError {
            instance: instance.clone(),
            text: text.into(),
        };
        log::debug!("{err}");
        err
    }

    pub(crate) fn nonexistent(instance: &Instance, text: impl Into<String>) -> Self {
        let err = InstanceError::NonexistentInstance {
            instance: instance.clone(),
            text: text.into(),
        };
        log::debug!("{err}");
        err
    }

    pub(crate) fn duplicate(instance: &Instance, name: &str) -> Self {
        let err = InstanceError::DuplicateMember {
            instance: instance.clone(),
            name: name.to_string(),
        };
        log::debug!("{err}");
        err
    }

    /// The instance on which the failing operation was invoked.
    pub fn instance(&self) -> &Instance {
        match self {
            InstanceError::InstanceTypeError { instance, .. }
            | InstanceError::NonexistentInstance { instance, .. }
            | InstanceError::DuplicateMember { instance, .. } => instance,
        }
    }
}
