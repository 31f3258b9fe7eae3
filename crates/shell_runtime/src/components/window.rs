use super::*;
use desktop_core::WindowLifecycle;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
pub(super) fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameGesture {
    Move { pointer: Point, origin: Point },
    Resize { pointer: Point, size: (i32, i32) },
}

fn frame_state_class(lifecycle: WindowLifecycle) -> &'static str {
    match lifecycle {
        WindowLifecycle::Minimizing => " minimizing",
        // Minimized frames stay mounted so app state inside the body
        // survives a minimize/restore cycle; only their box is hidden.
        WindowLifecycle::Minimized => " minimized",
        WindowLifecycle::Restoring => " restoring",
        WindowLifecycle::Closing => " closing",
        WindowLifecycle::Open => "",
    }
}

fn frame_style(bounds: Rect, z_index: u32, lifecycle: WindowLifecycle) -> String {
    let hidden = if lifecycle == WindowLifecycle::Minimized {
        "display:none;"
    } else {
        ""
    };
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};{hidden}",
        bounds.x, bounds.y, bounds.w, bounds.h, z_index
    )
}

#[component]
pub(super) fn WindowFrame(window_id: WindowId) -> impl IntoView {
    let runtime = use_shell_runtime();

    let window = Signal::derive(move || {
        runtime
            .windows_view
            .get()
            .windows
            .into_iter()
            .find(|w| w.id == window_id)
    });
    let gesture = create_rw_signal(None::<FrameGesture>);

    let focus = move |_: web_sys::PointerEvent| {
        let should_focus = window
            .get_untracked()
            .map(|w| runtime.windows_view.get_untracked().focused != Some(w.id))
            .unwrap_or(false);
        if should_focus {
            runtime.update_windows(|c| c.registry_mut().focus(window_id));
        }
    };

    let begin_move = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.update_windows(|c| c.registry_mut().focus(window_id));
        if let Some(win) = window.get_untracked() {
            gesture.set(Some(FrameGesture::Move {
                pointer: Point::new(ev.client_x(), ev.client_y()),
                origin: Point::new(win.bounds.x, win.bounds.y),
            }));
        }
    };
    let begin_resize = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(win) = window.get_untracked() {
            gesture.set(Some(FrameGesture::Resize {
                pointer: Point::new(ev.client_x(), ev.client_y()),
                size: (win.bounds.w, win.bounds.h),
            }));
        }
    };
    let track_gesture = move |ev: web_sys::PointerEvent| {
        let Some(active) = gesture.get_untracked() else {
            return;
        };
        let (dx, dy) = match active {
            FrameGesture::Move { pointer, .. } | FrameGesture::Resize { pointer, .. } => {
                (ev.client_x() - pointer.x, ev.client_y() - pointer.y)
            }
        };
        runtime.update_windows(|c| match active {
            FrameGesture::Move { origin, .. } => {
                c.registry_mut()
                    .update_position(window_id, origin.x + dx, origin.y + dy);
            }
            FrameGesture::Resize { size, .. } => {
                c.registry_mut()
                    .update_size(window_id, size.0 + dx, size.1 + dy);
            }
        });
    };
    let end_gesture = move |_: web_sys::PointerEvent| gesture.set(None);

    let minimize = move || genie::start_minimize(runtime, window_id);
    let close = move || genie::start_close(runtime, window_id);
    let zoom = move || runtime.update_windows(|c| c.registry_mut().zoom(window_id));

    view! {
        <Show when=move || window.get().is_some() fallback=|| ()>
            {move || {
                let Some(win) = window.get() else {
                    return ().into_view();
                };
                let focused = runtime.windows_view.get().focused == Some(win.id);
                let style = frame_style(win.bounds, win.z_index, win.lifecycle);
                let state_class = frame_state_class(win.lifecycle);
                let focused_class = if focused { " focused" } else { "" };

                view! {
                    <section
                        id=genie::window_dom_id(win.id)
                        class=format!("shell-window{focused_class}{state_class}")
                        style=style
                        on:pointerdown=focus
                        role="dialog"
                        aria-label=win.title.clone()
                    >
                        <header
                            class="titlebar"
                            on:pointerdown=begin_move
                            on:pointermove=track_gesture
                            on:pointerup=end_gesture
                        >
                            <button
                                class="titlebar-close"
                                aria-label="Close window"
                                on:pointerdown=move |ev: web_sys::PointerEvent| {
                                    ev.prevent_default();
                                    ev.stop_propagation();
                                }
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    close();
                                }
                            />
                            <span class="titlebar-title">{win.title.clone()}</span>
                            <button
                                class="titlebar-minimize"
                                aria-label="Minimize window"
                                on:pointerdown=move |ev: web_sys::PointerEvent| {
                                    ev.prevent_default();
                                    ev.stop_propagation();
                                }
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    minimize();
                                }
                            />
                            <button
                                class="titlebar-zoom"
                                aria-label="Zoom window"
                                on:pointerdown=move |ev: web_sys::PointerEvent| {
                                    ev.prevent_default();
                                    ev.stop_propagation();
                                }
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    zoom();
                                }
                            />
                        </header>
                        <div class="window-body">
                            <WindowBody window_id=win.id />
                        </div>
                        <div
                            class="window-resize-handle"
                            aria-hidden="true"
                            on:pointerdown=begin_resize
                            on:pointermove=track_gesture
                            on:pointerup=end_gesture
                        />
                    </section>
                }
                    .into_view()
            }}
        </Show>
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_shell_runtime();
    let app = runtime
        .windows_view
        .get_untracked()
        .windows
        .into_iter()
        .find(|w| w.id == window_id)
        .map(|w| w.app);
    let folder = runtime
        .folder_windows
        .with_value(|map| map.get(&window_id).copied());

    view! {
        <div class="window-body-content">
            {apps::window_contents(app, folder)}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn minimized_frames_hide_without_leaving_the_layout_flow() {
        let bounds = Rect::new(60, 52, 540, 380);
        let hidden = frame_style(bounds, 7, WindowLifecycle::Minimized);
        assert!(hidden.ends_with("display:none;"));
        assert_eq!(frame_state_class(WindowLifecycle::Minimized), " minimized");

        // Every other lifecycle keeps the frame's box on screen.
        for lifecycle in [
            WindowLifecycle::Open,
            WindowLifecycle::Minimizing,
            WindowLifecycle::Restoring,
            WindowLifecycle::Closing,
        ] {
            assert!(!frame_style(bounds, 7, lifecycle).contains("display:none"));
        }
    }

    #[test]
    fn frame_style_places_the_window_by_its_record() {
        let style = frame_style(Rect::new(10, 20, 300, 200), 42, WindowLifecycle::Open);
        assert_eq!(style, "left:10px;top:20px;width:300px;height:200px;z-index:42;");
    }
}
