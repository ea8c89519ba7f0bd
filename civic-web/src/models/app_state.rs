use crate::session::Session;
use yewdux::Store;

/// Global UI state. The session is a mirror of the `SessionStore` snapshot.
#[derive(Debug, Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub session: Session,
}
