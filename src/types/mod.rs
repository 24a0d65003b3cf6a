// SmartBookmarks shared type definitions
// Each submodule defines types used across the client core.

pub mod bookmark;
pub mod change;
pub mod errors;
pub mod settings;
pub mod user;
