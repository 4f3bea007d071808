pub mod prerequisites;

pub use prerequisites::{PrerequisiteCycle, PrerequisiteGraph};
