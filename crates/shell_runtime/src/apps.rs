//! Window content rendering seam.
//!
//! The shell core does not interpret window contents; this module maps an
//! owning app id onto a body view. Folder and trash windows render live item
//! listings, everything else gets a named placeholder surface the embedding
//! product replaces.

use desktop_core::{AppId, Icon, IconId, TrashedIcon};
use leptos::*;

use crate::runtime_context::use_shell_runtime;

/// Renders the body for a window owned by `app`.
pub fn window_contents(app: Option<AppId>, folder: Option<IconId>) -> View {
    match app.as_ref().map(AppId::as_str) {
        Some("shell.finder") => match folder {
            Some(folder) => view! { <FolderContents folder=folder /> }.into_view(),
            None => placeholder("Finder"),
        },
        Some("shell.trash") => view! { <TrashContents /> }.into_view(),
        Some(other) => placeholder(other),
        None => view! { <p class="window-placeholder">"Closed"</p> }.into_view(),
    }
}

fn placeholder(name: &str) -> View {
    view! {
        <div class="window-placeholder">
            <p>{name.to_string()}</p>
        </div>
    }
    .into_view()
}

#[component]
fn FolderContents(folder: IconId) -> impl IntoView {
    let runtime = use_shell_runtime();
    let contents = Signal::derive(move || {
        // Re-read on any desktop change; folder listings are small.
        runtime.desktop_view.with(|_| ());
        runtime
            .desktop
            .with_value(|d| d.items().folder_contents(folder).to_vec())
    });

    view! {
        <ul class="folder-contents">
            <For
                each=move || contents.get()
                key=|icon: &Icon| icon.id
                children=|icon| view! { <li class="folder-entry">{icon.label}</li> }
            />
        </ul>
    }
}

#[component]
fn TrashContents() -> impl IntoView {
    let runtime = use_shell_runtime();
    let contents = Signal::derive(move || {
        runtime.desktop_view.with(|_| ());
        runtime
            .desktop
            .with_value(|d| d.items().trash_contents().to_vec())
    });
    let empty_trash = move |_| {
        runtime.update_desktop(|d| d.empty_trash());
    };
    let put_away = move |id: IconId| {
        let viewport = runtime.host.get_value().viewport_rect();
        runtime.update_desktop(move |d| d.restore_trashed(id, viewport));
    };

    view! {
        <div class="trash-contents">
            <ul>
                <For
                    each=move || contents.get()
                    key=|item: &TrashedIcon| item.icon.id
                    children=move |item| {
                        let id = item.icon.id;
                        view! {
                            <li class="trash-entry">
                                <span>{item.icon.label.clone()}</span>
                                <button on:click=move |_| put_away(id)>"Put Away"</button>
                            </li>
                        }
                    }
                />
            </ul>
            <button
                class="empty-trash"
                disabled=move || contents.get().is_empty()
                on:click=empty_trash
            >
                "Empty Trash"
            </button>
        </div>
    }
}
