//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ImageRenderer)
//! but are themselves concrete structs, not traits.

mod dump;
mod session;

pub use dump::{DumpArtifact, DumpLayout, DumpService};
pub use session::TreeSession;
