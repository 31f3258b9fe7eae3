use super::*;
use desktop_core::{Icon, IconKind, PointerModifiers};

/// Presentation handle writing live drag offsets and committed positions
/// straight to an icon's element, bypassing the reactive read model.
#[cfg(target_arch = "wasm32")]
struct DomIconHandle {
    element: web_sys::HtmlElement,
}

#[cfg(target_arch = "wasm32")]
impl desktop_core::IconHandle for DomIconHandle {
    fn set_live_offset(&self, dx: i32, dy: i32) {
        let _ = self
            .element
            .style()
            .set_property("transform", &format!("translate({dx}px, {dy}px)"));
    }

    fn clear_live_offset(&self) {
        let _ = self.element.style().remove_property("transform");
    }

    fn commit(&self, position: Point) {
        let style = self.element.style();
        let _ = style.set_property("left", &format!("{}px", position.x));
        let _ = style.set_property("top", &format!("{}px", position.y));
    }
}

fn event_point(ev: &web_sys::PointerEvent) -> Point {
    Point::new(ev.client_x(), ev.client_y())
}

fn icon_kind_class(kind: IconKind) -> &'static str {
    match kind {
        IconKind::Drive => "drive",
        IconKind::File => "file",
        IconKind::Folder => "folder",
        IconKind::Application => "application",
        IconKind::SmartFolder => "smart-folder",
        IconKind::BurnFolder => "burn-folder",
    }
}

/// Opens the window associated with an icon activation (double click).
pub(super) fn open_icon(runtime: ShellRuntimeContext, icon: &Icon) {
    match icon.kind {
        IconKind::Folder | IconKind::BurnFolder | IconKind::Drive | IconKind::SmartFolder => {
            let window_id = runtime.update_windows(|c| {
                c.registry_mut()
                    .open(AppId::trusted("shell.finder"), icon.label.clone())
            });
            runtime
                .folder_windows
                .update_value(|map| {
                    map.insert(window_id, icon.id);
                });
        }
        IconKind::Application => {
            let app = AppId::new(format!("app.{}", icon.label.to_lowercase()))
                .unwrap_or_else(|_| AppId::trusted("app.unknown"));
            runtime.update_windows(|c| c.registry_mut().open(app, icon.label.clone()));
        }
        IconKind::File => {
            runtime.update_windows(|c| {
                c.registry_mut()
                    .open(AppId::trusted("shell.viewer"), icon.label.clone())
            });
        }
    }
}

#[component]
/// The desktop icon field: background marquee, icons, selection highlight.
pub(super) fn DesktopSurface() -> impl IntoView {
    let runtime = use_shell_runtime();
    let view_model = runtime.desktop_view;

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        window::try_set_pointer_capture(&ev);
        let additive = ev.shift_key() || ev.meta_key() || ev.ctrl_key();
        runtime.update_desktop(|d| {
            d.background_pointer_down(event_point(&ev), additive);
            Vec::new()
        });
    };
    let on_pointermove = move |ev: web_sys::PointerEvent| {
        let point = event_point(&ev);
        let dragging = runtime.desktop.with_value(|d| d.is_dragging());
        let hover = runtime
            .desktop
            .try_update_value(|d| d.pointer_move(point))
            .flatten();
        if dragging {
            // Live offsets already went straight to the handles; only the
            // deduplicated trash-hover bit touches reactive state.
            if let Some(hovered) = hover {
                runtime.trash_hovered.set(hovered);
            }
        } else {
            runtime.sync_desktop();
        }
    };
    let on_pointerup = move |ev: web_sys::PointerEvent| {
        let viewport = runtime.host.get_value().viewport_rect();
        let now = shell_host::icon_timestamp_ms();
        runtime.update_desktop(|d| d.pointer_up(event_point(&ev), viewport, now));
        runtime.trash_hovered.set(false);
    };
    let on_click = move |_| {
        runtime.update_desktop(|d| {
            d.background_click();
            Vec::new()
        });
    };

    view! {
        <div
            class="desktop-surface"
            on:pointerdown=on_pointerdown
            on:pointermove=on_pointermove
            on:pointerup=on_pointerup
            on:click=on_click
        >
            <For
                each=move || view_model.get().icons
                key=|(icon, _)| icon.id
                children=move |(icon, position)| {
                    view! { <DesktopIcon icon=icon position=position /> }
                }
            />
            {move || {
                view_model
                    .get()
                    .marquee
                    .map(|rect| {
                        view! {
                            <div
                                class="selection-marquee"
                                style=format!(
                                    "left:{}px;top:{}px;width:{}px;height:{}px;",
                                    rect.x, rect.y, rect.w, rect.h
                                )
                            />
                        }
                            .into_view()
                    })
                    .unwrap_or_else(|| ().into_view())
            }}
        </div>
    }
}

#[component]
fn DesktopIcon(icon: Icon, position: Point) -> impl IntoView {
    let runtime = use_shell_runtime();
    let icon_id = icon.id;
    let node = create_node_ref::<html::Div>();

    // Hand the mounted element to the drag engine; drop it on unmount.
    #[cfg(target_arch = "wasm32")]
    {
        create_effect(move |_| {
            if let Some(element) = node.get() {
                let element: web_sys::HtmlElement = (*element).clone().into();
                runtime.desktop.update_value(|d| {
                    d.register_icon_handle(
                        icon_id,
                        std::rc::Rc::new(DomIconHandle { element }),
                    );
                });
            }
        });
    }
    on_cleanup(move || {
        runtime
            .desktop
            .update_value(|d| d.unregister_icon_handle(icon_id));
    });

    let selected = Signal::derive(move || {
        runtime
            .desktop_view
            .get()
            .selected
            .contains(&icon_id)
    });
    let suppressed = runtime
        .desktop_view
        .get_untracked()
        .entrance_suppressed
        .contains(&icon_id);

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        ev.stop_propagation();
        let modifiers = PointerModifiers {
            toggle: ev.meta_key() || ev.ctrl_key(),
            range: ev.shift_key(),
        };
        runtime.update_desktop(|d| {
            d.icon_pointer_down(icon_id, event_point(&ev), modifiers);
            Vec::new()
        });
    };
    let label = icon.label.clone();
    let on_dblclick = {
        let icon = icon.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            open_icon(runtime, &icon);
        }
    };

    view! {
        <div
            node_ref=node
            class=move || {
                format!(
                    "desktop-icon {}{}{}",
                    icon_kind_class(icon.kind),
                    if selected.get() { " selected" } else { "" },
                    if suppressed { " no-entrance" } else { "" }
                )
            }
            style=format!("left:{}px;top:{}px;", position.x, position.y)
            on:pointerdown=on_pointerdown
            on:dblclick=on_dblclick
        >
            <span class="icon-glyph" aria-hidden="true" />
            <span class="icon-label">{label}</span>
        </div>
    }
}
