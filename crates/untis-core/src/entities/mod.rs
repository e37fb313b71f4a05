//! Entity structs for the normalized timetable model.
//!
//! All structs derive `Serialize` and `Deserialize` so they can be handed to
//! the surrounding web layer or printed by the CLI as JSON.

mod lesson;
mod reference;

pub use lesson::Lesson;
pub use reference::ReferenceEntity;
