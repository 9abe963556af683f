//! Chat history, input field and send button

use leptos::prelude::*;

use crate::app::ControllerHandle;
use crate::components::MessageEntry;
use crate::state::use_chat_context;
use crate::utils::constants::{CHAT_CONTAINER_ID, CHAT_HISTORY_ID, SEND_BUTTON_ID, USER_INPUT_ID};

#[component]
pub fn ChatWindow(controller: ControllerHandle) -> impl IntoView {
    let chat = use_chat_context();

    let on_send = move |_| {
        let Some(controller) = controller.get_value() else {
            return;
        };
        let raw = chat.input.get_untracked();
        if let Some(message) = controller.activate_send(&raw) {
            chat.clear_input();
            leptos::task::spawn_local(async move {
                // Failures are already rendered in the transcript
                let _ = controller.send_message(message).await;
            });
        }
    };

    let on_focus = move |_| {
        if let Some(controller) = controller.get_value() {
            controller.input_focused();
        }
    };

    let on_blur = move |_| {
        if let Some(controller) = controller.get_value() {
            controller.input_blurred();
        }
    };

    view! {
        <div
            id=CHAT_CONTAINER_ID
            class="chat-container"
            style:padding-bottom=move || format!("{}px", chat.keyboard_padding.get())
        >
            <div id=CHAT_HISTORY_ID class="chat-history">
                <For
                    each=move || chat.transcript.with(|t| t.entries().to_vec())
                    key=|entry| entry.id
                    children=move |entry| view! { <MessageEntry entry=entry/> }
                />
            </div>
            <div class="chat-input">
                <input
                    id=USER_INPUT_ID
                    type="text"
                    placeholder="Type your message..."
                    autocomplete="off"
                    prop:value=move || chat.input.get()
                    on:input=move |ev| chat.input.set(event_target_value(&ev))
                    on:focus=on_focus
                    on:blur=on_blur
                />
                <button
                    id=SEND_BUTTON_ID
                    class="btn"
                    disabled=move || !chat.send_enabled.get()
                    on:click=on_send
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}
