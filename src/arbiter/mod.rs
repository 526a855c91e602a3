//! Camera ownership arbitration
//!
//! Serializes access to the single physical camera across independently
//! mounted UI features. Arbitration is advisory and cooperative: the
//! underlying device has no multiplexing, so a denied requester must show
//! the user an explicit "busy" message instead of queueing or retrying
//! silently. The arbiter itself never touches hardware.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A feature competing for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraOwner {
    /// The live face-recognition view.
    Recognition,
    /// The local video-recording form.
    Recording,
}

impl fmt::Display for CameraOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraOwner::Recognition => write!(f, "recognition"),
            CameraOwner::Recording => write!(f, "recording"),
        }
    }
}

/// Registry of which feature currently holds the camera.
///
/// One instance is created per application session and handed to each view
/// controller; clones share the same ownership value. At most one owner is
/// ever current, and only the current owner can release it.
#[derive(Clone, Default)]
pub struct CameraArbiter {
    current: Arc<Mutex<Option<CameraOwner>>>,
}

impl CameraArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request exclusive use of the camera.
    ///
    /// Grants when the camera is free or already held by `owner` (re-request
    /// by the same owner is idempotent). Denies without side effects when a
    /// different feature holds it; there is no waiting or preemption.
    pub fn request(&self, owner: CameraOwner) -> bool {
        let mut current = self.current.lock();
        match *current {
            None => {
                *current = Some(owner);
                tracing::debug!(%owner, "camera ownership granted");
                true
            }
            Some(held) if held == owner => true,
            Some(held) => {
                tracing::debug!(%owner, %held, "camera request denied");
                false
            }
        }
    }

    /// Release the camera.
    ///
    /// A no-op unless `owner` matches the current holder, so a stale or
    /// unmounted feature can never release another feature's session.
    pub fn release(&self, owner: CameraOwner) {
        let mut current = self.current.lock();
        if *current == Some(owner) {
            *current = None;
            tracing::debug!(%owner, "camera ownership released");
        }
    }

    /// The feature currently holding the camera, if any.
    pub fn current(&self) -> Option<CameraOwner> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_owner_at_a_time() {
        let arbiter = CameraArbiter::new();

        assert!(arbiter.request(CameraOwner::Recognition));
        assert!(!arbiter.request(CameraOwner::Recording));
        assert_eq!(arbiter.current(), Some(CameraOwner::Recognition));
    }

    #[test]
    fn test_re_request_by_same_owner_is_idempotent() {
        let arbiter = CameraArbiter::new();

        assert!(arbiter.request(CameraOwner::Recording));
        assert!(arbiter.request(CameraOwner::Recording));
        assert_eq!(arbiter.current(), Some(CameraOwner::Recording));
    }

    #[test]
    fn test_foreign_release_is_a_no_op() {
        let arbiter = CameraArbiter::new();

        assert!(arbiter.request(CameraOwner::Recognition));
        arbiter.release(CameraOwner::Recording);
        assert_eq!(arbiter.current(), Some(CameraOwner::Recognition));
    }

    #[test]
    fn test_release_without_owner_is_a_no_op() {
        let arbiter = CameraArbiter::new();

        arbiter.release(CameraOwner::Recording);
        assert_eq!(arbiter.current(), None);
    }

    #[test]
    fn test_handoff_after_release() {
        let arbiter = CameraArbiter::new();

        assert!(arbiter.request(CameraOwner::Recognition));
        assert!(!arbiter.request(CameraOwner::Recording));

        arbiter.release(CameraOwner::Recognition);
        assert!(arbiter.request(CameraOwner::Recording));
        assert_eq!(arbiter.current(), Some(CameraOwner::Recording));
    }

    #[test]
    fn test_clones_share_ownership() {
        let arbiter = CameraArbiter::new();
        let other_view = arbiter.clone();

        assert!(arbiter.request(CameraOwner::Recognition));
        assert!(!other_view.request(CameraOwner::Recording));
        other_view.release(CameraOwner::Recognition);
        assert_eq!(arbiter.current(), None);
    }
}
