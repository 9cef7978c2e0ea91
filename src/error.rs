use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// Result code handed to every asynchronous host callback.
///
/// The numeric values are stable and match the codes exposed over the C ABI,
/// so new codes must only ever be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// The operation completed.
    Success = 0,
    /// Something failed that does not fit any other category.
    Unknown = 1,
    /// The device could not authenticate (signing or handshake failure).
    AuthFailed = 2,
    /// The operation needs a paired device and this one is not paired (yet).
    NotPaired = 3,
    /// The server answered with a non-success result, or could not be reached.
    ApiError = 4,
    /// A local file could not be read or written.
    FileError = 5,
}

impl ErrorCode {
    /// Returns the stable integer code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns `true` for [`ErrorCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns a string representation suitable for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Unknown => "unknown",
            Self::AuthFailed => "auth_failed",
            Self::NotPaired => "not_paired",
            Self::ApiError => "api_error",
            Self::FileError => "file_error",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a [`Transport`](crate::net::Transport) implementation.
///
/// Every variant maps to [`ErrorCode::ApiError`] when surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransportError {
    /// The server answered with a non-success status.
    Status {
        /// The HTTP-equivalent status code.
        code: u16,
        /// The reply body, kept for diagnostics.
        body: String,
    },
    /// The server could not be reached (DNS, TLS, timeout, reset ...).
    Connection {
        /// A description of the connection failure.
        context: String,
    },
    /// The server answered but the reply could not be understood.
    InvalidResponse {
        /// A description of what was wrong with the reply.
        context: String,
    },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Status { code, body } => {
                write!(f, "Server replied with status {}: {}", code, body)
            },
            TransportError::Connection { context } => {
                write!(f, "Connection failed: {}", context)
            },
            TransportError::InvalidResponse { context } => {
                write!(f, "Invalid server response: {}", context)
            },
        }
    }
}

impl Error for TransportError {}

impl From<&TransportError> for ErrorCode {
    fn from(_: &TransportError) -> Self {
        ErrorCode::ApiError
    }
}

/// Rejected configuration passed to [`SessionNetBuilder`](crate::net::SessionNetBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// A mandatory device-info field was left empty.
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A numeric setting was outside its allowed range.
    OutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Neither a device UUID nor a host identifier to derive one from was given.
    NoMachineIdentity,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField { field } => {
                write!(f, "Missing mandatory field `{}`", field)
            },
            ConfigError::OutOfRange { field, reason } => {
                write!(f, "Invalid value for `{}`: {}", field, reason)
            },
            ConfigError::NoMachineIdentity => {
                write!(
                    f,
                    "Either a device UUID or a host identifier (e.g. MAC address) is required"
                )
            },
        }
    }
}

impl Error for ConfigError {}
