//! Platform window handles the engine can render into.

use crate::utils::error::{Result, TPlayerError};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

/// An embeddable native window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHandle {
    /// X11 window id
    X11(u64),

    /// Win32 HWND
    Win32(isize),

    /// macOS NSView pointer
    AppKit(usize),
}

impl RenderHandle {
    /// Value for the engine's window-id option
    pub fn wid(&self) -> i64 {
        match *self {
            RenderHandle::X11(window) => window as i64,
            RenderHandle::Win32(hwnd) => hwnd as i64,
            RenderHandle::AppKit(view) => view as i64,
        }
    }
}

impl TryFrom<RawWindowHandle> for RenderHandle {
    type Error = TPlayerError;

    fn try_from(raw: RawWindowHandle) -> Result<Self> {
        match raw {
            RawWindowHandle::Xlib(handle) => Ok(RenderHandle::X11(handle.window as u64)),
            RawWindowHandle::Xcb(handle) => Ok(RenderHandle::X11(handle.window.get() as u64)),
            RawWindowHandle::Win32(handle) => Ok(RenderHandle::Win32(handle.hwnd.get())),
            RawWindowHandle::AppKit(handle) => Ok(RenderHandle::AppKit(handle.ns_view.as_ptr() as usize)),
            other => Err(TPlayerError::RenderTarget(format!(
                "Window handle cannot be embedded: {:?}",
                other
            ))),
        }
    }
}

/// Something the engine can draw video into
pub trait RenderTarget {
    /// The platform handle of the drawable surface
    fn render_handle(&self) -> Result<RenderHandle>;
}

/// Resolve the handle of any `raw-window-handle` window
pub fn handle_of<W: HasWindowHandle + ?Sized>(window: &W) -> Result<RenderHandle> {
    let handle = window
        .window_handle()
        .map_err(|e| TPlayerError::RenderTarget(format!("Window handle unavailable: {}", e)))?;
    RenderHandle::try_from(handle.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{WaylandWindowHandle, XcbWindowHandle, XlibWindowHandle};
    use std::num::NonZeroU32;
    use std::ptr::NonNull;

    #[test]
    fn test_x11_handles_embed() {
        let xlib = RawWindowHandle::Xlib(XlibWindowHandle::new(0x3a0000f));
        assert_eq!(RenderHandle::try_from(xlib).unwrap(), RenderHandle::X11(0x3a0000f));

        let xcb = RawWindowHandle::Xcb(XcbWindowHandle::new(NonZeroU32::new(77).unwrap()));
        assert_eq!(RenderHandle::try_from(xcb).unwrap().wid(), 77);
    }

    #[test]
    fn test_wayland_handle_is_rejected() {
        let mut surface = 0u8;
        let ptr = NonNull::from(&mut surface).cast();
        let wayland = RawWindowHandle::Wayland(WaylandWindowHandle::new(ptr));

        assert!(matches!(
            RenderHandle::try_from(wayland),
            Err(TPlayerError::RenderTarget(_))
        ));
    }
}
