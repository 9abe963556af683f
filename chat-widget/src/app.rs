//! Samm chat widget - Leptos frontend
//!
//! Mounts the consent overlay and chat window, then boots the controller once
//! the visitor's IP is known.

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::components::{ChatWindow, ConsentModal};
use crate::config::WidgetConfig;
use crate::controller::{resolve_user_ip, ChatController};
use crate::services::{HttpChatTransport, IpInfoResolver, PixelAnalytics, SessionThreadStore};
use crate::state::{provide_chat_context, ChatContext};
use crate::utils::constants::{IN_APP_BODY_CLASS, PROMPT_PARAM, THREAD_ID_KEY};
use crate::utils::url::get_query_param;
use crate::utils::user_agent::{current_user_agent, is_in_app_browser};

pub type BrowserController =
    ChatController<HttpChatTransport, SessionThreadStore, ChatContext, PixelAnalytics>;

/// Empty until bootstrap finishes; event handlers ignore input until then.
pub type ControllerHandle = StoredValue<Option<Rc<BrowserController>>, LocalStorage>;

#[component]
pub fn App() -> impl IntoView {
    let chat = provide_chat_context();
    let controller: ControllerHandle = StoredValue::new_local(None);

    leptos::task::spawn_local(bootstrap(chat, controller));

    view! {
        <div class="chat-app">
            <ConsentModal controller=controller/>
            <ChatWindow controller=controller/>
        </div>
    }
}

async fn bootstrap(chat: ChatContext, handle: ControllerHandle) {
    let config = WidgetConfig::default();

    let resolver = IpInfoResolver::new(config.ip_lookup_url.clone());
    let user_ip = resolve_user_ip(&resolver, &config.fallback_ip).await;

    let in_app = is_in_app_browser(&current_user_agent());
    if in_app {
        mark_in_app_browser();
    }

    let transport = HttpChatTransport::new(config.chat_endpoint.clone());
    let controller = Rc::new(
        ChatController::new(
            config,
            user_ip,
            transport,
            SessionThreadStore::new(THREAD_ID_KEY),
            chat,
            PixelAnalytics,
        )
        .with_in_app_browser(in_app),
    );
    handle.set_value(Some(Rc::clone(&controller)));

    let startup = controller.boot(get_query_param(PROMPT_PARAM)).await;
    log::info!("Chat widget ready: {:?}", startup);
}

fn mark_in_app_browser() {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .and_then(|b| b.dyn_into::<HtmlElement>().ok());

    match body {
        Some(body) => {
            if let Err(e) = body.class_list().add_1(IN_APP_BODY_CLASS) {
                log::warn!("Failed to tag body for in-app browser: {:?}", e);
            }
        }
        None => log::warn!("No document body to tag for in-app browser"),
    }
}
