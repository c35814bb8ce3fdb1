//! Sticker render pipeline
//!
//! Markup assembly → rasterization → downscale/encode. The rasterizer is
//! injected behind the [`Renderer`] seam so the pipeline can be driven in
//! tests without a browser.

pub mod encode;
pub mod engine;
pub mod markup;

use std::sync::Arc;

use tera::Tera;
use tracing::debug;

pub use encode::{Sticker, STICKER_WIDTH};
pub use engine::{ChromiumRenderer, EngineConfig, Renderer};

use crate::error::{Error, Result};
use crate::state::{Composition, Theme};

/// Turns finalized compositions into sticker artifacts.
pub struct RenderPipeline {
    renderer: Arc<dyn Renderer>,
    templates: Tera,
}

impl RenderPipeline {
    /// Build a pipeline around an injected rasterizer.
    pub fn new(renderer: Arc<dyn Renderer>) -> Result<Self> {
        Ok(Self {
            renderer,
            templates: markup::templates()?,
        })
    }

    /// Render a composition into an encoded sticker.
    pub async fn render(&self, composition: &Composition, theme: Theme) -> Result<Sticker> {
        let context = markup::bubble_context(composition, theme);
        let html = self.templates.render(markup::TEMPLATE_NAME, &context)?;

        let png = self.renderer.capture(&html).await?;
        debug!(capture_bytes = png.len(), "captured bubble");

        let sticker = tokio::task::spawn_blocking(move || encode::encode_sticker(&png))
            .await
            .map_err(|err| Error::render(format!("encode task failed: {err}")))??;

        debug!(
            webp_bytes = sticker.webp.len(),
            width = sticker.width,
            height = sticker.height,
            "sticker encoded"
        );
        Ok(sticker)
    }
}
