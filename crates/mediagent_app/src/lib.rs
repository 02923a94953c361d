//! MediAgent terminal front end: effect execution, session hand-off and rendering.
pub mod platform;
