use maybe_sync::{MaybeSend, MaybeSync};

/// Notifies the application that the map content changed and it should be redrawn.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests the map to be redrawn.
    fn request_redraw(&self);
}
