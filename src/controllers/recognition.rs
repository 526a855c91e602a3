//! Recognition view controller
//!
//! Drives the live recognition view: claims the camera through the arbiter,
//! toggles the remote recognition stream, and exposes the live event feed.
//! The camera ownership claim here is advisory - the actual device is held
//! by the recognition microservice, not this process.

use chrono::Utc;
use std::sync::Arc;

use crate::arbiter::{CameraArbiter, CameraOwner};
use crate::events::{ConnectionState, EventChannelFactory, EventLogEntry, LiveEventFeed};
use crate::remote::recognition::{CameraStartStatus, RecognitionService};
use crate::utils::error::{AppError, AppResult};

pub struct RecognitionController {
    arbiter: CameraArbiter,
    service: Arc<dyn RecognitionService>,
    feed: LiveEventFeed,
    active: bool,
    stream_url: Option<String>,
}

impl RecognitionController {
    /// Mount the view: the event feed opens immediately, the camera is only
    /// claimed on an explicit [`start`].
    ///
    /// [`start`]: RecognitionController::start
    pub fn new(
        arbiter: CameraArbiter,
        service: Arc<dyn RecognitionService>,
        channels: &dyn EventChannelFactory,
    ) -> Self {
        Self {
            arbiter,
            service,
            feed: LiveEventFeed::open(channels.open()),
            active: false,
            stream_url: None,
        }
    }

    /// Start the remote recognition stream.
    ///
    /// Claims the camera first; a denial is returned as a
    /// [`AppError::ResourceConflict`] for the view to render - never
    /// retried silently. Ownership is released again if the remote start
    /// fails.
    pub async fn start(&mut self) -> AppResult<()> {
        if self.active {
            return Ok(());
        }

        if !self.arbiter.request(CameraOwner::Recognition) {
            let holder = self.arbiter.current().unwrap_or(CameraOwner::Recording);
            let err = AppError::ResourceConflict { holder };
            tracing::warn!(reason = %err.user_message(), "recognition start denied");
            return Err(err);
        }

        let response = match self.service.start_camera().await {
            Ok(response) => response,
            Err(err) => {
                self.arbiter.release(CameraOwner::Recognition);
                return Err(err);
            }
        };

        match response.status {
            CameraStartStatus::Success | CameraStartStatus::AlreadyRunning => {
                self.active = true;
                // cache-busted so the <img> element always reopens the stream
                self.stream_url = Some(format!(
                    "{}?t={}",
                    self.service.stream_url(),
                    Utc::now().timestamp_millis()
                ));
                tracing::info!(status = ?response.status, "recognition stream started");
                Ok(())
            }
            CameraStartStatus::Error => {
                self.arbiter.release(CameraOwner::Recognition);
                Err(AppError::Remote(response.message.unwrap_or_else(|| {
                    "the recognition service could not start the camera".into()
                })))
            }
        }
    }

    /// Stop the remote stream and release the camera claim.
    ///
    /// Local state and ownership are cleared even when the remote call
    /// fails - keeping a stale claim would lock the recording view out.
    pub async fn stop(&mut self) -> AppResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.stream_url = None;

        let result = self.service.stop_camera().await;
        self.arbiter.release(CameraOwner::Recognition);
        tracing::info!("recognition stream stopped");
        result
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.feed.state()
    }

    /// Live events, newest first.
    pub fn events(&self) -> Vec<EventLogEntry> {
        self.feed.entries()
    }

    /// Unmount the view: stop the remote stream and close the feed.
    pub async fn shutdown(mut self) -> AppResult<()> {
        let result = self.stop().await;
        self.feed.close();
        result
    }
}

impl Drop for RecognitionController {
    fn drop(&mut self) {
        // remote stop needs an async context; the arbiter claim and the
        // feed must still go away on abrupt teardown
        self.feed.close();
        if self.active {
            self.arbiter.release(CameraOwner::Recognition);
            self.active = false;
        }
    }
}
