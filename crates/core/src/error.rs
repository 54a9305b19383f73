//! Error taxonomy for the provenance engine
//!
//! Every fallible operation in the workspace returns [`RmapResult`]. The
//! variants of [`RmapError`] are the kinds a caller is expected to branch
//! on; [`ErrorKind`] is the plain tag for callers that only need the kind.
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `NotFound` | No object exists for the id |
//! | `Deleted` | The object existed but was deleted |
//! | `Tombstoned` | The object exists but was tombstoned |
//! | `DefectiveArgument` | Malformed or missing input |
//! | `AgentNotFound` | A requesting agent does not resolve |
//! | `InactiveVersion` | An update targeted a non-ACTIVE DiSCO |
//! | `NotLatestVersion` | An update targeted a superseded DiSCO |
//! | `PermissionDenied` | Requester is neither creator nor admin |
//! | `Internal` | Integrity violation or store failure |

use std::fmt;
use thiserror::Error;

/// Result alias used across the workspace
pub type RmapResult<T> = Result<T, RmapError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Tag identifying the kind of an [`RmapError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown id
    NotFound,
    /// Object was deleted
    Deleted,
    /// Object was tombstoned
    Tombstoned,
    /// Malformed or missing input
    DefectiveArgument,
    /// Requesting agent unknown
    AgentNotFound,
    /// Update target not ACTIVE
    InactiveVersion,
    /// Update target not the latest lineage member
    NotLatestVersion,
    /// Requester lacks rights
    PermissionDenied,
    /// Integrity violation or store failure
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Deleted => "deleted",
            ErrorKind::Tombstoned => "tombstoned",
            ErrorKind::DefectiveArgument => "defective argument",
            ErrorKind::AgentNotFound => "agent not found",
            ErrorKind::InactiveVersion => "inactive version",
            ErrorKind::NotLatestVersion => "not latest version",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Error type for all provenance engine operations
#[derive(Debug, Error)]
pub enum RmapError {
    /// No object exists for the requested id
    #[error("not found: {message}")]
    NotFound {
        /// Description naming the missing id
        message: String,
    },

    /// The object has been physically deleted
    #[error("object {id} has been deleted")]
    Deleted {
        /// Id of the deleted object
        id: String,
    },

    /// The object has been tombstoned (soft deleted)
    #[error("object {id} has been tombstoned")]
    Tombstoned {
        /// Id of the tombstoned object
        id: String,
    },

    /// Malformed or missing input
    #[error("defective argument: {message}")]
    DefectiveArgument {
        /// What was wrong with the input
        message: String,
    },

    /// The requesting agent does not exist
    #[error("agent not found: {id}")]
    AgentNotFound {
        /// The unresolved agent id
        id: String,
    },

    /// The update target is not ACTIVE
    #[error("DiSCO {id} is not active and cannot be updated")]
    InactiveVersion {
        /// Id of the inactive DiSCO
        id: String,
    },

    /// Optimistic-concurrency conflict
    #[error(
        "The DiSCO provided ({id}) is not the latest version. The latest version can be found at {latest}"
    )]
    NotLatestVersion {
        /// Id the caller targeted
        id: String,
        /// Current latest member of the lineage
        latest: String,
    },

    /// Requester is neither the creating agent nor an administrator
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Description of the refused action
        message: String,
    },

    /// Integrity violation or unexpected store failure
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },
}

impl RmapError {
    /// Unknown id
    pub fn not_found(message: impl Into<String>) -> Self {
        RmapError::NotFound {
            message: message.into(),
        }
    }

    /// Object was deleted
    pub fn deleted(id: impl fmt::Display) -> Self {
        RmapError::Deleted { id: id.to_string() }
    }

    /// Object was tombstoned
    pub fn tombstoned(id: impl fmt::Display) -> Self {
        RmapError::Tombstoned { id: id.to_string() }
    }

    /// Malformed or missing input
    pub fn defective(message: impl Into<String>) -> Self {
        RmapError::DefectiveArgument {
            message: message.into(),
        }
    }

    /// Requesting agent unknown
    pub fn agent_not_found(id: impl fmt::Display) -> Self {
        RmapError::AgentNotFound { id: id.to_string() }
    }

    /// Update target not ACTIVE
    pub fn inactive_version(id: impl fmt::Display) -> Self {
        RmapError::InactiveVersion { id: id.to_string() }
    }

    /// Update target superseded by `latest`
    pub fn not_latest_version(id: impl fmt::Display, latest: impl fmt::Display) -> Self {
        RmapError::NotLatestVersion {
            id: id.to_string(),
            latest: latest.to_string(),
        }
    }

    /// Requester lacks rights
    pub fn permission_denied(message: impl Into<String>) -> Self {
        RmapError::PermissionDenied {
            message: message.into(),
        }
    }

    /// Integrity violation without an underlying cause
    pub fn internal(message: impl Into<String>) -> Self {
        RmapError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Integrity violation or store failure wrapping a cause
    pub fn internal_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RmapError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The kind tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RmapError::NotFound { .. } => ErrorKind::NotFound,
            RmapError::Deleted { .. } => ErrorKind::Deleted,
            RmapError::Tombstoned { .. } => ErrorKind::Tombstoned,
            RmapError::DefectiveArgument { .. } => ErrorKind::DefectiveArgument,
            RmapError::AgentNotFound { .. } => ErrorKind::AgentNotFound,
            RmapError::InactiveVersion { .. } => ErrorKind::InactiveVersion,
            RmapError::NotLatestVersion { .. } => ErrorKind::NotLatestVersion,
            RmapError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            RmapError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The latest-version IRI carried by a `NotLatestVersion` error
    pub fn latest_version(&self) -> Option<&str> {
        match self {
            RmapError::NotLatestVersion { latest, .. } => Some(latest),
            _ => None,
        }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
