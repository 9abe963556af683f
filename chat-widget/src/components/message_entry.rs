//! One row of the chat history

use leptos::prelude::*;

use crate::state::{ChatEntry, EntryKind};

/// Avatar plus body. Text is always rendered as a text node, so markup in a
/// message (typed or returned by the backend) shows up literally.
#[component]
pub fn MessageEntry(entry: ChatEntry) -> impl IntoView {
    let sender = entry.sender();

    let (class, body) = match entry.kind {
        EntryKind::Message { text, .. } => (
            format!("message {}", sender.class_name()),
            view! { <div>{text}</div> }.into_any(),
        ),
        EntryKind::Loader { .. } => (
            format!("message {}", sender.class_name()),
            view! { <div class="loader-chat"></div> }.into_any(),
        ),
        EntryKind::Error { text } => (
            format!("message {} error", sender.class_name()),
            view! { <div role="alert">{text}</div> }.into_any(),
        ),
    };

    view! {
        <div class=class>
            <img src=sender.avatar() alt=sender.class_name()/>
            {body}
        </div>
    }
}
