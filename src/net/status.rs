//! Authentication state machine.
//!
//! # State Machine Diagram
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                     Authentication State Machine                     │
//! │                                                                      │
//! │  ┌──────────────────┐  authenticate()  ┌────────────────┐            │
//! │  │ NotAuthenticated │ ────────────────►│ Authenticating │            │
//! │  └──────────────────┘                  └───────┬────────┘            │
//! │                                                │                     │
//! │                      sign + handshake ok       │  sign or handshake  │
//! │                  ┌─────────────────────────────┤  failed             │
//! │                  ▼                             ▼                     │
//! │  ┌──────────────────────────────┐   ┌──────────────────────┐         │
//! │  │ AuthenticatedCheckingPairing │   │ AuthenticationFailed │         │
//! │  └───────┬──────────────┬───────┘   └──────────────────────┘         │
//! │   paired │              │ not paired / check failed                  │
//! │          ▼              ▼                                            │
//! │  ┌─────────────────────┐  heartbeat re-check   ┌───────────────────┐ │
//! │  │ AuthenticatedPaired │◄──────────────────────│ Authenticated-    │ │
//! │  │                     │──────────────────────►│ Unpaired          │ │
//! │  └─────────────────────┘  request_unpair() ok  └───────────────────┘ │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Transitions
//!
//! | From                | To                   | Trigger                               |
//! |---------------------|----------------------|---------------------------------------|
//! | NotAuthenticated    | Authenticating       | `authenticate()` called               |
//! | Authenticating      | CheckingPairing      | Signature accepted by the server      |
//! | Authenticating      | AuthenticationFailed | Signer or handshake failure           |
//! | CheckingPairing     | Paired               | Server reports the device paired      |
//! | CheckingPairing     | Unpaired             | Server reports unpaired, or error     |
//! | Unpaired            | Paired               | Heartbeat re-check finds it paired    |
//! | Paired              | Unpaired             | `request_unpair()` succeeded          |
//!
//! No transition leads back to `NotAuthenticated` or `Authenticating`, and
//! `AuthenticationFailed` is terminal: a fresh session object is needed.

/// Authentication and pairing state of a device.
///
/// The integer codes are stable and shared with the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AuthStatus {
    /// Nothing happened yet.
    ///
    /// **Transition**: `authenticate()` → `Authenticating`
    NotAuthenticated = 0,

    /// The signed handshake is queued or in flight.
    ///
    /// **Transition**: handshake ok → `AuthenticatedCheckingPairing`,
    /// failure → `AuthenticationFailed`
    Authenticating = 1,

    /// Authenticated; the pairing state is being queried.
    ///
    /// Only pairing short codes can be requested in this state.
    AuthenticatedCheckingPairing = 2,

    /// Authenticated but not linked to a venue machine.
    ///
    /// Installed reports, heartbeats and pairing short codes are allowed.
    /// Every heartbeat re-checks pairing.
    AuthenticatedUnpaired = 3,

    /// Authenticated and linked to a venue machine. Everything is allowed.
    AuthenticatedPaired = 4,

    /// The handshake failed.
    ///
    /// **Transition**: None (terminal state)
    AuthenticationFailed = 5,
}

impl AuthStatus {
    /// Returns the stable integer code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Inverse of [`as_i32`](Self::as_i32).
    #[must_use]
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NotAuthenticated),
            1 => Some(Self::Authenticating),
            2 => Some(Self::AuthenticatedCheckingPairing),
            3 => Some(Self::AuthenticatedUnpaired),
            4 => Some(Self::AuthenticatedPaired),
            5 => Some(Self::AuthenticationFailed),
            _ => None,
        }
    }

    /// True once the handshake has succeeded.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(
            self,
            Self::AuthenticatedCheckingPairing
                | Self::AuthenticatedUnpaired
                | Self::AuthenticatedPaired
        )
    }

    /// Returns a string representation suitable for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not authenticated",
            Self::Authenticating => "authenticating",
            Self::AuthenticatedCheckingPairing => "checking pairing",
            Self::AuthenticatedUnpaired => "unpaired",
            Self::AuthenticatedPaired => "paired",
            Self::AuthenticationFailed => "authentication failed",
        }
    }
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
