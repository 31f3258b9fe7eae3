//! Browser runtime for the desktop shell: Leptos components, host adapters,
//! and the genie animation driver over the pure interaction core.

pub mod adapters;
pub mod apps;
pub mod components;
pub mod host;
pub mod runtime_context;

pub use components::{genie, DesktopShell};
pub use host::ShellHostContext;
pub use runtime_context::{
    use_shell_runtime, DesktopView, GenieOverlayState, ShellProvider, ShellRuntimeContext,
    WindowsView,
};
