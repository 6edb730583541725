//! Host command session
//!
//! Tracks one command at a time from its first byte to its response, and
//! answers read requests in every state.
//!
//! ```text
//!            'M'                 16 bytes
//!   Idle ─────────► AwaitingPayload ─────────► Executing ──► Completed
//!    │  'H' / 'B'                    │                │
//!    └───────────────────────────────┼──────► ────────┘
//!                                    │ timeout        │ action failed
//!                                    ▼                ▼
//!                                Failed(kind) ◄───────┘
//! ```
//!
//! Any command byte received in `Idle`, `Completed` or `Failed` starts a new
//! session. Bytes received while `Executing` are ignored.

pub mod machine;
pub mod protocol;

pub use machine::{ErrorKind, Job, SessionState};
pub use protocol::{ProtocolSession, WriteOutcome, DEFAULT_PAYLOAD_TIMEOUT_US};
