use super::*;
use desktop_core::WindowLifecycle;

#[component]
/// The dock strip: minimized window thumbnails on the left, trash on the
/// right.
pub(super) fn Dock() -> impl IntoView {
    let runtime = use_shell_runtime();

    // The trash drop region is fixed dock geometry, not measured DOM.
    let publish_trash_region = move || {
        let viewport = runtime.host.get_value().viewport_rect();
        runtime.update_desktop(|d| {
            d.set_trash_region(genie::dock_trash_rect(viewport));
            Vec::new()
        });
    };
    publish_trash_region();
    #[cfg(target_arch = "wasm32")]
    {
        let resize_listener = window_event_listener(ev::resize, move |_| publish_trash_region());
        on_cleanup(move || resize_listener.remove());
    }

    let minimized = Signal::derive(move || {
        runtime
            .windows_view
            .get()
            .windows
            .into_iter()
            .filter(|w| w.lifecycle == WindowLifecycle::Minimized)
            .collect::<Vec<_>>()
    });
    let trash_class = move || {
        let hovered = runtime.trash_hovered.get();
        let full = runtime.desktop_view.get().trash_count > 0;
        format!(
            "dock-trash{}{}",
            if full { " full" } else { "" },
            if hovered { " drop-target" } else { "" }
        )
    };
    let open_trash = move |_| {
        runtime.update_windows(|c| {
            c.registry_mut()
                .open(AppId::trusted("shell.trash"), "Trash")
        });
    };

    view! {
        <footer class="dock">
            <div class="dock-minimized">
                <For
                    each=move || minimized.get()
                    key=|w| w.id
                    children=move |window| {
                        let window_id = window.id;
                        let thumbnail = runtime.windows.with_value(|c| {
                            c.captured_thumbnail(window_id).map(|b| b.data_url.clone())
                        });
                        let restore = move |_| genie::start_restore(runtime, window_id);
                        view! {
                            <button
                                class="dock-thumbnail"
                                aria-label=format!("Restore {}", window.title)
                                on:click=restore
                            >
                                {thumbnail
                                    .map(|url| {
                                        view! { <img src=url alt="" /> }.into_view()
                                    })
                                    .unwrap_or_else(|| {
                                        view! { <span class="dock-thumbnail-fallback" /> }
                                            .into_view()
                                    })}
                            </button>
                        }
                    }
                />
            </div>
            <button class=trash_class aria-label="Trash" on:dblclick=open_trash>
                <span class="dock-trash-glyph" aria-hidden="true" />
            </button>
        </footer>
    }
}
