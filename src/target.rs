//! Off-screen render targets with a destroy-and-recreate resize model.

use crate::color::Color;
use crate::gpu::{GraphicsApi, IncompleteTarget, RenderAttachments, TextureHandle, validate_target};

/// An off-screen color (and optionally depth) buffer sized to a viewport.
///
/// The attachments are owned: replacing or dropping them releases the GPU
/// storage, so [`RenderTarget::cleanup`] is just a reset.
pub struct RenderTarget<A: GraphicsApi> {
    label: &'static str,
    width: u32,
    height: u32,
    want_color: bool,
    want_depth: bool,
    attachments: Option<A::Attachments>,
}

impl<A: GraphicsApi> RenderTarget<A> {
    /// An empty target. Nothing is allocated until [`RenderTarget::create`].
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            width: 0,
            height: 0,
            want_color: true,
            want_depth: false,
            attachments: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_complete(&self) -> bool {
        self.attachments.is_some()
    }

    pub fn has_depth(&self) -> bool {
        self.attachments.as_ref().is_some_and(|a| a.has_depth())
    }

    /// Handle under which the color attachment can be sampled.
    pub fn color_attachment(&self) -> Option<TextureHandle> {
        self.attachments.as_ref().and_then(|a| a.color())
    }

    /// Allocates attachments for a `width × height` target, replacing any
    /// existing ones. Returns false and logs the reason when the target
    /// cannot be made complete; the previous attachments are released either way.
    pub fn create(
        &mut self,
        api: &mut A,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> bool {
        self.cleanup();
        self.want_color = want_color;
        self.want_depth = want_depth;

        match self.try_create(api, width, height) {
            Ok(attachments) => {
                log::debug!("render target '{}' created at {width}x{height}", self.label);
                self.attachments = Some(attachments);
                self.width = width;
                self.height = height;
                true
            }
            Err(reason) => {
                log::warn!("render target '{}' is incomplete: {reason}", self.label);
                false
            }
        }
    }

    fn try_create(
        &self,
        api: &mut A,
        width: u32,
        height: u32,
    ) -> Result<A::Attachments, IncompleteTarget> {
        // Rejected here so an impossible request never reaches the backend.
        validate_target(&api.limits(), width, height, self.want_color, self.want_depth)?;
        api.create_attachments(width, height, self.want_color, self.want_depth)
    }

    /// Makes this target the draw destination. Returns false, binding
    /// nothing, when the target has no attachments.
    pub fn bind(&self, api: &mut A) -> bool {
        match &self.attachments {
            Some(attachments) => {
                api.bind_target(Some(attachments));
                true
            }
            None => false,
        }
    }

    /// Restores the default framebuffer if this target is the current destination.
    pub fn unbind(&self, api: &mut A) {
        if let Some(attachments) = &self.attachments {
            if api.is_bound(attachments) {
                api.bind_target(None);
            }
        }
    }

    /// Clears this target. Returns false, touching nothing, unless it is the
    /// current draw destination.
    pub fn clear(&self, api: &mut A, color: Color) -> bool {
        match &self.attachments {
            Some(attachments) if api.is_bound(attachments) => {
                api.clear(color);
                true
            }
            _ => false,
        }
    }

    /// Recreates the target at the new size with the same attachment set.
    /// A zero dimension leaves the target untouched and returns false.
    pub fn resize(&mut self, api: &mut A, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        log::info!(
            "render target '{}' resized {}x{} -> {width}x{height}",
            self.label,
            self.width,
            self.height
        );
        self.create(api, width, height, self.want_color, self.want_depth)
    }

    /// Releases the attachments. Safe to call any number of times.
    pub fn cleanup(&mut self) {
        self.attachments = None;
        self.width = 0;
        self.height = 0;
    }
}
