//! Webview host: routes page messages and camera events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use passcam_core::bridge::{
    BridgeChannel, BridgeEvent, ChannelState, OutboundMessage, PageCommand, PdfPayload,
    UploadResult,
};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, ShellConfig};
use crate::export::PdfExporter;
use crate::pipeline::{CapturePipeline, ShutterOutcome};
use crate::platform::{
    Alerter, CaptureDevice, CaptureOptions, ImageService, ScriptInjector, ShareSink, Uploader,
};

/// The platform bindings a [`Host`] drives.
pub struct Platform<D, I, U, S> {
    pub device: D,
    pub images: I,
    pub uploader: U,
    pub share: S,
    pub injector: Box<dyn ScriptInjector>,
    pub alerter: Box<dyn Alerter>,
}

pub struct Host<D, I, U, S> {
    webview_url: String,
    pipeline: CapturePipeline<D, I, U>,
    exporter: PdfExporter<S>,
    injector: Box<dyn ScriptInjector>,
    alerter: Box<dyn Alerter>,
    channel: Mutex<BridgeChannel>,
    camera_open: AtomicBool,
    flash: AtomicBool,
}

impl<D, I, U, S> Host<D, I, U, S>
where
    D: CaptureDevice,
    I: ImageService,
    U: Uploader,
    S: ShareSink,
{
    /// Validate `config` and wire the capture and export flows for a screen
    /// of `screen_width` x `screen_height` points.
    pub fn from_config(
        config: &ShellConfig,
        screen_width: f64,
        screen_height: f64,
        platform: Platform<D, I, U, S>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.screen_geometry(screen_width, screen_height)?;
        let Platform {
            device,
            images,
            uploader,
            share,
            injector,
            alerter,
        } = platform;

        Ok(Self {
            webview_url: config.webview_url.clone(),
            pipeline: CapturePipeline::new(device, images, uploader, geometry, config),
            exporter: PdfExporter::from_config(share, config),
            injector,
            alerter,
            channel: Mutex::new(BridgeChannel::new()),
            camera_open: AtomicBool::new(false),
            flash: AtomicBool::new(false),
        })
    }

    /// Page to load into the webview.
    pub fn webview_url(&self) -> &str {
        &self.webview_url
    }

    pub fn pipeline(&self) -> &CapturePipeline<D, I, U> {
        &self.pipeline
    }

    pub fn exporter(&self) -> &PdfExporter<S> {
        &self.exporter
    }

    pub fn is_flash_on(&self) -> bool {
        self.flash.load(Ordering::Acquire)
    }

    /// Flip the flash setting for the next shots, returning the new value.
    pub fn toggle_flash(&self) -> bool {
        let on = !self.flash.fetch_xor(true, Ordering::AcqRel);
        debug!(flash = on, "flash toggled");
        on
    }

    pub fn is_camera_open(&self) -> bool {
        self.camera_open.load(Ordering::Acquire)
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel().state()
    }

    /// The webview finished loading a document.
    pub fn on_page_load(&self) {
        let ready = self.channel().page_loaded();
        debug!("page loaded, announcing bridge");
        self.injector.inject(&ready.injection_script());
    }

    /// Handle a raw message posted by the page.
    ///
    /// Malformed or unknown messages are logged and dropped.
    pub async fn handle_page_message(&self, raw: &str) {
        let event = match self.channel().receive(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "ignoring page message");
                return;
            }
        };

        match event {
            BridgeEvent::Acknowledged(pending) => {
                debug!(flushed = pending.len(), "bridge acknowledged");
                for message in pending {
                    self.injector.inject(&message.injection_script());
                }
            }
            BridgeEvent::Command(PageCommand::OpenCamera) => {
                info!("opening camera");
                // Each camera session starts with the flash off
                self.flash.store(false, Ordering::Release);
                self.camera_open.store(true, Ordering::Release);
            }
            BridgeEvent::Command(PageCommand::DownloadPdf(payload)) => {
                self.download_pdf(&payload).await;
            }
        }
    }

    /// Run a capture for a shutter press on the open camera.
    ///
    /// On success the page receives `UPLOAD_COMPLETE` and the camera closes;
    /// on failure the user is alerted and the camera stays open.
    pub async fn on_shutter(&self) -> Option<UploadResult> {
        if !self.is_camera_open() {
            debug!("shutter pressed with camera closed");
            return None;
        }

        let options = CaptureOptions {
            flash: self.is_flash_on(),
        };
        match self.pipeline.on_shutter(options).await {
            Ok(ShutterOutcome::Uploaded(result)) => {
                self.post(OutboundMessage::UploadComplete {
                    payload: result.clone(),
                });
                self.close_camera();
                Some(result)
            }
            Ok(ShutterOutcome::Ignored) => None,
            Err(e) => {
                error!(error = %e, "capture failed");
                self.alerter.alert(e.alert_title(), &e.to_string());
                None
            }
        }
    }

    /// Dismiss the camera without a capture.
    pub fn close_camera(&self) {
        if self.camera_open.swap(false, Ordering::AcqRel) {
            info!("camera closed");
        }
    }

    async fn download_pdf(&self, payload: &PdfPayload) {
        match self.exporter.export(payload).await {
            Ok(path) => {
                self.post(OutboundMessage::PdfDownloadSuccess);
                self.alerter
                    .alert("PDF Saved", &format!("Saved {}", path.display()));
            }
            Err(e) if e.is_cancellation() => {
                info!("pdf share cancelled");
            }
            Err(e) => {
                error!(error = %e, "pdf export failed");
                self.alerter.alert("Download Error", &e.to_string());
                self.post(OutboundMessage::PdfDownloadError {
                    error: e.to_string(),
                });
            }
        }
    }

    fn post(&self, message: OutboundMessage) {
        // Bind first so the lock is released before injecting
        let deliverable = self.channel().post(message);
        match deliverable {
            Some(message) => self.injector.inject(&message.injection_script()),
            None => debug!("bridge not acknowledged, message queued"),
        }
    }

    fn channel(&self) -> MutexGuard<'_, BridgeChannel> {
        self.channel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
