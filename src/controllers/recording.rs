//! Recording view controller
//!
//! Drives the register-by-recording form: claims the camera through the
//! arbiter, runs the local capture session, and uploads the finished
//! recording together with the resident's details. Teardown runs on every
//! exit path, including abrupt drops.

use std::sync::Arc;

use crate::arbiter::{CameraArbiter, CameraOwner};
use crate::capture::session::{CaptureSession, SessionError, SessionState, Telemetry};
use crate::capture::traits::{CameraDevice, EncoderFactory};
use crate::remote::residents::{NewResidentForm, ResidentsApi};
use crate::utils::error::{AppError, AppResult};

pub struct RecordingController {
    arbiter: CameraArbiter,
    session: CaptureSession,
    residents: Arc<dyn ResidentsApi>,
    owned: bool,
}

impl RecordingController {
    pub fn new(
        arbiter: CameraArbiter,
        device: Arc<dyn CameraDevice>,
        encoders: Arc<dyn EncoderFactory>,
        residents: Arc<dyn ResidentsApi>,
    ) -> Self {
        Self {
            arbiter,
            session: CaptureSession::new(device, encoders),
            residents,
            owned: false,
        }
    }

    /// Mount the view: claim the camera, then acquire the device stream.
    ///
    /// A denied claim comes back as [`AppError::ResourceConflict`] with the
    /// holding view named, for the form to render - never a silent retry.
    /// An acquisition failure keeps the claim so the user can fix the cause
    /// and use [`retry_acquire`].
    ///
    /// [`retry_acquire`]: RecordingController::retry_acquire
    pub async fn init(&mut self) -> AppResult<()> {
        if !self.arbiter.request(CameraOwner::Recording) {
            let holder = self.arbiter.current().unwrap_or(CameraOwner::Recognition);
            let err = AppError::ResourceConflict { holder };
            tracing::warn!(reason = %err.user_message(), "recording init denied");
            return Err(err);
        }
        self.owned = true;

        self.session.acquire().await?;
        Ok(())
    }

    /// Manual retry after a failed acquisition. Nothing retries on its own.
    pub async fn retry_acquire(&mut self) -> AppResult<()> {
        if !self.owned {
            return self.init().await;
        }
        self.session.acquire().await?;
        Ok(())
    }

    pub fn start_recording(&mut self) -> AppResult<()> {
        self.session.start_recording()?;
        Ok(())
    }

    pub fn stop_recording(&mut self) {
        self.session.stop_recording();
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    pub fn telemetry(&self) -> Telemetry {
        self.session.telemetry()
    }

    /// Diagnostic from the last failed acquisition, for the retry banner.
    pub fn capture_diagnostic(&self) -> Option<String> {
        self.session.diagnostic()
    }

    /// Upload the finished recording with the resident's details.
    pub async fn submit(&mut self, form: NewResidentForm) -> AppResult<()> {
        if self.session.is_recording() {
            return Err(SessionError::StillRecording.into());
        }
        let video = self.session.blob();
        tracing::info!(bytes = video.len(), name = %form.name, "uploading recorded resident");
        self.residents.upload_recorded(video, form).await
    }

    /// Unmount the view: release the session and the camera claim.
    /// Idempotent; also wired through `Drop` for abrupt exits.
    pub fn teardown(&mut self) {
        self.session.release();
        if self.owned {
            self.arbiter.release(CameraOwner::Recording);
            self.owned = false;
        }
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::session::RecordingBlob;
    use crate::capture::traits::{CaptureStream, ChunkEncoder};
    use crate::utils::error::CaptureError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct FakeStream;

    impl CaptureStream for FakeStream {
        fn stop_tracks(&mut self) {}
    }

    /// Camera that plays back a script of acquisition outcomes.
    struct ScriptedCamera {
        outcomes: Mutex<VecDeque<Result<(), CaptureError>>>,
    }

    impl ScriptedCamera {
        fn working() -> Arc<Self> {
            Self::with_script(vec![Ok(()), Ok(()), Ok(())])
        }

        fn with_script(outcomes: Vec<Result<(), CaptureError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
            })
        }
    }

    #[async_trait]
    impl CameraDevice for ScriptedCamera {
        async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
            match self.outcomes.lock().pop_front() {
                Some(Ok(())) | None => Ok(Box::new(FakeStream)),
                Some(Err(err)) => Err(err),
            }
        }
    }

    struct BurstEncoder {
        burst: Vec<Vec<u8>>,
    }

    impl ChunkEncoder for BurstEncoder {
        fn start(&mut self, _flush_interval: Duration) -> mpsc::UnboundedReceiver<Vec<u8>> {
            let (tx, rx) = mpsc::unbounded_channel();
            for chunk in self.burst.drain(..) {
                let _ = tx.send(chunk);
            }
            rx
        }

        fn stop(&mut self) {}
    }

    struct BurstFactory {
        burst: Vec<Vec<u8>>,
    }

    impl EncoderFactory for BurstFactory {
        fn create(&self, _stream: &dyn CaptureStream) -> Box<dyn ChunkEncoder> {
            Box::new(BurstEncoder {
                burst: self.burst.clone(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingResidents {
        uploads: Mutex<Vec<(RecordingBlob, NewResidentForm)>>,
    }

    #[async_trait]
    impl ResidentsApi for RecordingResidents {
        async fn upload_recorded(
            &self,
            video: RecordingBlob,
            form: NewResidentForm,
        ) -> AppResult<()> {
            self.uploads.lock().push((video, form));
            Ok(())
        }
    }

    fn form() -> NewResidentForm {
        NewResidentForm {
            name: "Ana Quispe".into(),
            dni: "45678901".into(),
            apartment: "302-B".into(),
        }
    }

    fn controller_with(
        arbiter: CameraArbiter,
        camera: Arc<ScriptedCamera>,
        burst: Vec<Vec<u8>>,
    ) -> (RecordingController, Arc<RecordingResidents>) {
        let residents = Arc::new(RecordingResidents::default());
        let controller = RecordingController::new(
            arbiter,
            camera,
            Arc::new(BurstFactory { burst }),
            residents.clone(),
        );
        (controller, residents)
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_init_claims_camera_and_acquires() {
        let arbiter = CameraArbiter::new();
        let (mut controller, _) = controller_with(arbiter.clone(), ScriptedCamera::working(), vec![]);

        controller.init().await.unwrap();
        assert_eq!(controller.state(), SessionState::Ready);
        assert_eq!(arbiter.current(), Some(CameraOwner::Recording));
    }

    #[tokio::test]
    async fn test_init_denied_while_recognition_holds_camera() {
        let arbiter = CameraArbiter::new();
        assert!(arbiter.request(CameraOwner::Recognition));

        let (mut controller, _) = controller_with(arbiter.clone(), ScriptedCamera::working(), vec![]);
        let err = controller.init().await.unwrap_err();

        assert!(matches!(
            err,
            AppError::ResourceConflict {
                holder: CameraOwner::Recognition
            }
        ));
        assert!(err.user_message().contains("recognition"));
        assert_eq!(controller.state(), SessionState::Idle);
        // the denial changed nothing
        assert_eq!(arbiter.current(), Some(CameraOwner::Recognition));
    }

    #[tokio::test]
    async fn test_handoff_scenario_between_views() {
        let arbiter = CameraArbiter::new();
        assert!(arbiter.request(CameraOwner::Recognition));

        let (mut controller, _) = controller_with(arbiter.clone(), ScriptedCamera::working(), vec![]);
        assert!(controller.init().await.is_err());

        arbiter.release(CameraOwner::Recognition);
        controller.init().await.unwrap();
        assert_eq!(arbiter.current(), Some(CameraOwner::Recording));
    }

    #[tokio::test]
    async fn test_acquisition_failure_keeps_claim_for_manual_retry() {
        let arbiter = CameraArbiter::new();
        let camera = ScriptedCamera::with_script(vec![
            Err(CaptureError::DeviceBusy("service holds the device".into())),
            Ok(()),
        ]);
        let (mut controller, _) = controller_with(arbiter.clone(), camera, vec![]);

        let err = controller.init().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Capture(CaptureError::DeviceBusy(_))
        ));
        assert_eq!(controller.state(), SessionState::Error);
        assert!(controller.capture_diagnostic().is_some());
        // claim survives the failure; the conflict is with another process,
        // not another view
        assert_eq!(arbiter.current(), Some(CameraOwner::Recording));

        controller.retry_acquire().await.unwrap();
        assert_eq!(controller.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_record_and_submit_uploads_blob_and_form() {
        let arbiter = CameraArbiter::new();
        let (mut controller, residents) = controller_with(
            arbiter,
            ScriptedCamera::working(),
            vec![b"seg1-".to_vec(), b"seg2".to_vec()],
        );

        controller.init().await.unwrap();
        controller.start_recording().unwrap();
        settle().await;
        controller.stop_recording();
        settle().await;

        controller.submit(form()).await.unwrap();

        let uploads = residents.uploads.lock();
        assert_eq!(uploads.len(), 1);
        let (video, submitted) = &uploads[0];
        assert_eq!(video.data, b"seg1-seg2".to_vec());
        assert_eq!(video.mime, "video/mp4");
        assert_eq!(submitted.name, "Ana Quispe");
        assert_eq!(submitted.apartment, "302-B");
    }

    #[tokio::test]
    async fn test_submit_refused_while_recording() {
        let arbiter = CameraArbiter::new();
        let (mut controller, residents) =
            controller_with(arbiter, ScriptedCamera::working(), vec![b"x".to_vec()]);

        controller.init().await.unwrap();
        controller.start_recording().unwrap();

        let err = controller.submit(form()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Session(SessionError::StillRecording)
        ));
        assert!(residents.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_releases_session_and_claim() {
        let arbiter = CameraArbiter::new();
        let (mut controller, _) = controller_with(arbiter.clone(), ScriptedCamera::working(), vec![]);

        controller.init().await.unwrap();
        controller.teardown();
        controller.teardown(); // idempotent

        assert_eq!(controller.state(), SessionState::Released);
        assert_eq!(arbiter.current(), None);
    }

    #[tokio::test]
    async fn test_drop_releases_claim() {
        let arbiter = CameraArbiter::new();
        let (mut controller, _) = controller_with(arbiter.clone(), ScriptedCamera::working(), vec![]);

        controller.init().await.unwrap();
        drop(controller);
        assert_eq!(arbiter.current(), None);
    }
}
