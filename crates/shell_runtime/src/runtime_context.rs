//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived interaction controllers, the read-model
//! signals derived from them, and host bootstrap wiring. UI composition stays
//! in [`crate::components`].

use std::collections::HashSet;

use desktop_core::genie::{CapturedBitmap, GenieDirection, GeniePhase, GenieSpeed};
use desktop_core::{
    DesktopInteractionController, Icon, IconId, Point, Rect, ShellEffect, WindowController,
    WindowId, WindowRecord,
};
use leptos::*;

use crate::host::ShellHostContext;

#[derive(Debug, Clone, PartialEq, Default)]
/// Read model of the window registry for reactive rendering.
pub struct WindowsView {
    /// Every managed window record.
    pub windows: Vec<WindowRecord>,
    /// The focused window, if any.
    pub focused: Option<WindowId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Read model of the desktop icon field for reactive rendering.
pub struct DesktopView {
    /// Icons with committed positions, in display order.
    pub icons: Vec<(Icon, Point)>,
    /// Current selection.
    pub selected: Vec<IconId>,
    /// Live marquee rectangle, when a marquee is in flight.
    pub marquee: Option<Rect>,
    /// Number of items in the trash.
    pub trash_count: usize,
    /// Icons whose entrance animation should be skipped this render.
    pub entrance_suppressed: HashSet<IconId>,
}

#[derive(Debug, Clone, PartialEq)]
/// State of the slice overlay while a genie animation runs.
pub struct GenieOverlayState {
    /// Window being animated.
    pub window_id: WindowId,
    /// Window frame the slices cover.
    pub frame: Rect,
    /// Dock target the slices pinch toward.
    pub target: Rect,
    /// Captured bitmap painted across the slices.
    pub bitmap: CapturedBitmap,
    /// Direction of travel.
    pub direction: GenieDirection,
    /// Phase currently running, `None` before the first phase starts.
    pub phase: Option<GeniePhase>,
    /// Duration of the running phase.
    pub duration_ms: u32,
}

#[derive(Clone, Copy)]
/// Leptos context for reading shell state and driving the controllers.
pub struct ShellRuntimeContext {
    /// Host service bundle for side effects and environment queries.
    pub host: StoredValue<ShellHostContext>,
    /// Window lifecycle controller (registry + genie gating).
    pub windows: StoredValue<WindowController>,
    /// Desktop icon interaction controller.
    pub desktop: StoredValue<DesktopInteractionController>,
    /// Reactive window read model, refreshed after each controller update.
    pub windows_view: RwSignal<WindowsView>,
    /// Reactive desktop read model, refreshed after each controller update.
    pub desktop_view: RwSignal<DesktopView>,
    /// Slice overlay state for the in-flight genie animation.
    pub genie_overlay: RwSignal<Option<GenieOverlayState>>,
    /// Whether the active drag currently hovers the trash.
    pub trash_hovered: RwSignal<bool>,
    /// Playback speed applied to genie animations (slow-motion modifier).
    pub genie_speed: RwSignal<GenieSpeed>,
    /// Windows that present a desktop folder's contents, for drop-region
    /// bookkeeping.
    pub folder_windows: StoredValue<std::collections::HashMap<WindowId, IconId>>,
}

impl ShellRuntimeContext {
    /// Applies `f` to the window controller, then refreshes the window read
    /// model.
    pub fn update_windows<R>(&self, f: impl FnOnce(&mut WindowController) -> R) -> R {
        let result = self.windows.try_update_value(f);
        self.sync_windows();
        match result {
            Some(value) => value,
            None => unreachable!("window controller disposed"),
        }
    }

    /// Applies `f` to the desktop controller, executes the effects it
    /// returns, then refreshes the desktop read model.
    pub fn update_desktop(
        &self,
        f: impl FnOnce(&mut DesktopInteractionController) -> Vec<ShellEffect>,
    ) {
        let mut effects = Vec::new();
        let mut snapshot = None;
        self.desktop.update_value(|desktop| {
            effects = f(desktop);
            if effects.contains(&ShellEffect::PersistDesktop) {
                snapshot = Some(desktop.snapshot());
            }
        });
        let host = self.host.get_value();
        for effect in effects {
            host.run_effect(effect, snapshot.as_ref());
        }
        self.sync_desktop();
    }

    /// Rebuilds the window read model from the controller.
    pub fn sync_windows(&self) {
        let next = self.windows.with_value(|controller| WindowsView {
            windows: controller.registry().windows().to_vec(),
            focused: controller.registry().focused_id(),
        });
        if self.windows_view.get_untracked() != next {
            self.windows_view.set(next);
        }
    }

    /// Rebuilds the desktop read model from the controller.
    pub fn sync_desktop(&self) {
        let viewport = self.host.get_value().viewport_rect();
        let next = self.desktop.try_update_value(|desktop| {
            let icons = desktop
                .items()
                .desktop_icons()
                .to_vec()
                .into_iter()
                .map(|icon| {
                    let position = desktop.ensure_position(icon.id, viewport);
                    (icon, position)
                })
                .collect();
            DesktopView {
                icons,
                selected: desktop.selected().to_vec(),
                marquee: desktop.marquee_rect(),
                trash_count: desktop.items().trash_contents().len(),
                entrance_suppressed: desktop.take_entrance_suppressed(),
            }
        });
        if let Some(next) = next {
            if self.desktop_view.get_untracked() != next {
                self.desktop_view.set(next);
            }
        }
    }
}

#[component]
/// Provides [`ShellRuntimeContext`] to descendant components and boots
/// persisted state.
pub fn ShellProvider(
    /// Injected host bundle assembled by the entry layer.
    host_services: ShellHostContext,
    children: Children,
) -> impl IntoView {
    let host = store_value(host_services);
    let windows = store_value(WindowController::default());
    let desktop = store_value(DesktopInteractionController::default());
    let windows_view = create_rw_signal(WindowsView::default());
    let desktop_view = create_rw_signal(DesktopView::default());
    let genie_overlay = create_rw_signal(None::<GenieOverlayState>);
    let trash_hovered = create_rw_signal(false);
    let genie_speed = create_rw_signal(GenieSpeed::default());
    let folder_windows = store_value(std::collections::HashMap::new());

    let runtime = ShellRuntimeContext {
        host,
        windows,
        desktop,
        windows_view,
        desktop_view,
        genie_overlay,
        trash_hovered,
        genie_speed,
        folder_windows,
    };

    provide_context(runtime);
    runtime.sync_desktop();
    install_boot_hydration(runtime);

    children().into_view()
}

fn install_boot_hydration(runtime: ShellRuntimeContext) {
    let store = runtime.host.get_value().record_store();
    spawn_local(async move {
        match shell_host::load_desktop_snapshot(store.as_ref()).await {
            Ok(Some(snapshot)) => {
                runtime
                    .desktop
                    .update_value(|desktop| desktop.apply_snapshot(&snapshot));
                runtime.sync_desktop();
            }
            Ok(None) => {}
            Err(err) => logging::warn!("desktop snapshot hydration failed: {err}"),
        }
    });
}

/// Returns the current [`ShellRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`ShellProvider`].
pub fn use_shell_runtime() -> ShellRuntimeContext {
    use_context::<ShellRuntimeContext>().expect("ShellRuntimeContext not provided")
}
