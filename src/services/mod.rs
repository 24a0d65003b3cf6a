// SmartBookmarks services
// Stateless or collaborator-facing pieces: URL canonicalization, auth boundary, configuration.

pub mod auth;
pub mod settings_engine;
pub mod url_normalizer;
