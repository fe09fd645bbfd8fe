//! Interactive review of flagged rows.
//!
//! - [`state`]: the per-row state machine
//! - [`prompt`]: parsing of commands and field answers
//! - [`console`]: operator I/O (stdin/stdout or a scripted answer list)
//! - [`session`]: the driver that ties them to the store and audit log

pub mod console;
pub mod prompt;
pub mod session;
pub mod state;

pub use console::{OperatorConsole, ScriptedConsole, StdioConsole};
pub use prompt::{parse_command, parse_field_input, Command, InputError};
pub use session::{ReviewSession, SessionSummary};
pub use state::{ReviewEvent, ReviewState, TransitionError};
