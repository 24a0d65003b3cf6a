// SmartBookmarks state managers
// Managers own the mutable client state: the bookmark snapshot, the edit session,
// the realtime subscription and the signed-in user.

pub mod bookmark_store;
pub mod edit_session;
pub mod realtime_sync;
pub mod session_controller;
