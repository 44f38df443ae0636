//! Application layer: sessions, rendering and data loading
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod diagnostics;
pub mod error;
pub mod error_ext;
pub mod render;
pub mod sample;
pub mod services;
pub mod session;

pub use diagnostics::Diagnostics;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::{KindStyle, TreeRenderer};
pub use session::{HierarchySession, VisibleRow};
