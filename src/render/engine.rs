//! Headless-browser rasterization engine
//!
//! One Chromium instance is shared by the whole process; every render gets
//! its own short-lived page that is closed on success and on failure. The
//! browser is launched at startup, but a guarded lazy path relaunches it if
//! the first render arrives before (or after) the engine went away.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::Rgba;
use chromiumoxide::cdp::browser_protocol::emulation::SetDefaultBackgroundColorOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// CSS selector of the element captured into the sticker.
const CAPTURE_SELECTOR: &str = ".message-container";

/// Rasterization surface capability. The pipeline only needs "markup in,
/// PNG of the bubble out"; everything browser-shaped stays behind this
/// seam.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Rasterize markup and return a PNG cropped to the bubble container,
    /// with a transparent page background.
    async fn capture(&self, html: &str) -> Result<Vec<u8>>;
}

/// Configuration for the shared browser engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Chromium executable override; `None` lets the driver discover one.
    pub executable: Option<String>,
    /// Logical viewport width. The body is laid out at this width.
    pub viewport_width: u32,
    /// Viewport height; tall enough for any bubble, the capture is cropped
    /// to the container anyway.
    pub viewport_height: u32,
    /// Device scale factor; 3x so the downscaled sticker stays sharp.
    pub scale: f64,
    /// Settle delay after navigation before capturing. A heuristic wait for
    /// fonts and images to finish painting, not a completion signal; slow
    /// networks can still lose the race.
    pub settle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: None,
            viewport_width: 512,
            viewport_height: 2000,
            scale: 3.0,
            settle: Duration::from_millis(100),
        }
    }
}

struct Engine {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

/// Shared Chromium renderer.
pub struct ChromiumRenderer {
    config: EngineConfig,
    slot: Mutex<Option<Engine>>,
}

impl ChromiumRenderer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    /// Launch the shared browser. Called once at process start; failure
    /// here is the one startup-abort condition of the bot.
    pub async fn startup(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        if slot.is_none() {
            *slot = Some(launch(&self.config).await?);
            info!("browser engine started");
        }
        Ok(())
    }

    /// Close the shared browser. Renders arriving afterwards relaunch it.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(mut engine) = slot.take() {
            if let Err(err) = engine.browser.close().await {
                warn!(%err, "browser close failed");
            }
            engine.event_loop.abort();
            info!("browser engine stopped");
        }
    }

    /// Open a page on the shared browser, launching it first if needed.
    async fn new_page(&self, url: &str) -> Result<Page> {
        let mut slot = self.slot.lock().await;
        if slot.is_none() {
            warn!("browser engine not running, launching lazily");
            *slot = Some(launch(&self.config).await?);
        }
        let engine = match slot.as_ref() {
            Some(engine) => engine,
            None => return Err(Error::browser("browser engine unavailable")),
        };
        engine.browser.new_page(url).await.map_err(Error::browser)
    }
}

async fn launch(config: &EngineConfig) -> Result<Engine> {
    let mut builder = BrowserConfig::builder()
        .args(["--no-sandbox", "--disable-setuid-sandbox"])
        .viewport(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            device_scale_factor: Some(config.scale),
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });
    if let Some(executable) = &config.executable {
        builder = builder.chrome_executable(executable);
    }
    let browser_config = builder.build().map_err(Error::Browser)?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(Error::browser)?;

    // The handler stream must be drained for the whole browser lifetime.
    let event_loop = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    Ok(Engine {
        browser,
        event_loop,
    })
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn capture(&self, html: &str) -> Result<Vec<u8>> {
        let url = format!("data:text/html;base64,{}", BASE64.encode(html));
        let page = self.new_page(&url).await?;

        let captured = capture_container(&page, self.config.settle).await;

        // The page must not outlive the render, success or not.
        if let Err(err) = page.close().await {
            debug!(%err, "page close failed");
        }
        captured
    }
}

async fn capture_container(page: &Page, settle: Duration) -> Result<Vec<u8>> {
    page.wait_for_navigation().await.map_err(Error::browser)?;

    // Transparent page background so only the bubble is visible.
    let transparent = Rgba::builder()
        .r(0)
        .g(0)
        .b(0)
        .a(0.0)
        .build()
        .map_err(Error::Browser)?;
    page.execute(
        SetDefaultBackgroundColorOverrideParams::builder()
            .color(transparent)
            .build(),
    )
    .await
    .map_err(Error::browser)?;

    // Best-effort font wait; the settle delay below is the real backstop.
    if let Err(err) = page.evaluate("document.fonts.ready").await {
        debug!(%err, "font readiness wait failed");
    }
    tokio::time::sleep(settle).await;

    let element = page
        .find_element(CAPTURE_SELECTOR)
        .await
        .map_err(Error::browser)?;
    element
        .screenshot(CaptureScreenshotFormat::Png)
        .await
        .map_err(Error::browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config_matches_sticker_geometry() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport_width, 512);
        assert!((config.scale - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.settle, Duration::from_millis(100));
    }

    #[tokio::test]
    #[ignore = "requires a local Chromium install"]
    async fn test_capture_renders_minimal_page() {
        let renderer = ChromiumRenderer::new(EngineConfig::default());
        renderer.startup().await.unwrap();
        let png = renderer
            .capture(r#"<html><body><div class="message-container">hi</div></body></html>"#)
            .await
            .unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        renderer.shutdown().await;
    }
}
