//! Consent overlay shown in the Facebook in-app browser

use leptos::prelude::*;

use crate::app::ControllerHandle;
use crate::state::use_chat_context;
use crate::utils::constants::{AGREE_BUTTON_ID, CONSENT_MODAL_ID, PROMPT_PARAM};
use crate::utils::url::get_query_param;

#[component]
pub fn ConsentModal(controller: ControllerHandle) -> impl IntoView {
    let chat = use_chat_context();

    let on_agree = move |_| {
        let Some(controller) = controller.get_value() else {
            log::warn!("Consent acknowledged before the widget finished booting");
            return;
        };
        leptos::task::spawn_local(async move {
            controller
                .acknowledge_consent(get_query_param(PROMPT_PARAM))
                .await;
        });
    };

    view! {
        <div
            id=CONSENT_MODAL_ID
            class="modal"
            style:display=move || if chat.consent_visible.get() { "block" } else { "none" }
        >
            <div class="modal-content">
                <h2>"Chat with Samm"</h2>
                <p>
                    "Samm is our renovation assistant. Tap Agree to start chatting. "
                    "Messages you send are shared with our team so we can follow up on your project."
                </p>
                <button id=AGREE_BUTTON_ID class="btn" on:click=on_agree>
                    "Agree"
                </button>
            </div>
        </div>
    }
}
