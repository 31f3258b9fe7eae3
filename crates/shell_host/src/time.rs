//! Timestamps for icon metadata.
//!
//! Trash ordering and copy/paste naming rely on every icon mutation carrying
//! a distinct `modified_at_ms`, even when several land within one
//! millisecond. The shell therefore stamps icons with wall-clock values
//! nudged past the last one issued on this thread.

use std::cell::Cell;

thread_local! {
    static LAST_ISSUED_MS: Cell<u64> = const { Cell::new(0) };
}

fn wall_clock_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a unix-millisecond timestamp for icon metadata, strictly greater
/// than every timestamp previously issued on this thread.
pub fn icon_timestamp_ms() -> u64 {
    LAST_ISSUED_MS.with(|last| {
        let stamp = wall_clock_ms().max(last.get().saturating_add(1));
        last.set(stamp);
        stamp
    })
}
