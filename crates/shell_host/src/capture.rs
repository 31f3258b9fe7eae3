//! Window bitmap capture contract for the genie animation.

use std::{future::Future, pin::Pin};

use desktop_core::genie::CapturedBitmap;
use desktop_core::geometry::Rect;

/// Object-safe boxed future used by [`CaptureService`].
pub type CaptureFuture<'a> = Pin<Box<dyn Future<Output = Result<CapturedBitmap, String>> + 'a>>;

/// Host service that rasterizes a window's frame into a bitmap.
///
/// Capture is best-effort: an error tells the animation driver to abort the
/// genie transition and fall back to the immediate lifecycle commit.
pub trait CaptureService {
    /// Captures the window element identified by `dom_id` at `bounds`.
    fn capture_window<'a>(&'a self, dom_id: &'a str, bounds: Rect) -> CaptureFuture<'a>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Capture service that always fails, for targets with no rasterizer.
pub struct NoopCaptureService;

impl CaptureService for NoopCaptureService {
    fn capture_window<'a>(&'a self, _dom_id: &'a str, _bounds: Rect) -> CaptureFuture<'a> {
        Box::pin(async { Err("window capture unavailable".to_string()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Capture service returning a fixed bitmap, for tests.
pub struct StubCaptureService {
    /// Bitmap handed to every capture request.
    pub bitmap: CapturedBitmap,
}

impl CaptureService for StubCaptureService {
    fn capture_window<'a>(&'a self, _dom_id: &'a str, bounds: Rect) -> CaptureFuture<'a> {
        Box::pin(async move {
            let mut bitmap = self.bitmap.clone();
            if bitmap.width == 0 {
                bitmap.width = bounds.w;
                bitmap.height = bounds.h;
            }
            Ok(bitmap)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn noop_capture_always_errors() {
        let service = NoopCaptureService;
        let service_obj: &dyn CaptureService = &service;
        let result = block_on(service_obj.capture_window("w-1", Rect::new(0, 0, 100, 100)));
        assert!(result.is_err());
    }

    #[test]
    fn stub_capture_fills_dimensions_from_bounds() {
        let service = StubCaptureService::default();
        let service_obj: &dyn CaptureService = &service;
        let bitmap =
            block_on(service_obj.capture_window("w-1", Rect::new(10, 10, 540, 380))).expect("capture");
        assert_eq!((bitmap.width, bitmap.height), (540, 380));
    }
}
