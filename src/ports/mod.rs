//! Ports (trait boundaries) between the learning core and its callers.
//!
//! Sessions and experiments depend on these traits rather than on concrete
//! learners or output formats.

pub mod learner;
pub mod observer;

pub use learner::{Learner, UniformLearner};
pub use observer::Observer;
