//! Interactive games played against a learner
//!
//! [`GameKind`] holds the rules (action names, what beats what, who scores),
//! [`Session`] holds one game's state. Rendering and input handling are left
//! to the caller.

pub mod rules;
pub mod session;

pub use rules::GameKind;
pub use session::{RoundResult, Session};
