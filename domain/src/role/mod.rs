//! Role subdomain: stances, configured role records and the validated registry.

pub mod entities;
pub mod registry;
pub mod stance;

pub use entities::{DisplayColor, Role, RoleId, RoleSpec};
pub use registry::{RegistryOptions, RoleRegistry};
pub use stance::Stance;
