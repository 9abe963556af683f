//! Reactive chat state shared by the widget's components

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::ports::ChatView;
use crate::state::transcript::{Sender, Transcript};
use crate::utils::constants::{CHAT_CONTAINER_ID, CHAT_HISTORY_ID};

/// Global chat context
#[derive(Clone, Copy)]
pub struct ChatContext {
    pub transcript: RwSignal<Transcript>,
    pub send_enabled: RwSignal<bool>,
    pub consent_visible: RwSignal<bool>,
    /// Bottom padding of `#chat-container`, in px
    pub keyboard_padding: RwSignal<u32>,
    /// Current value of `#user-input`
    pub input: RwSignal<String>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self {
            transcript: RwSignal::new(Transcript::new()),
            send_enabled: RwSignal::new(true),
            consent_visible: RwSignal::new(false),
            keyboard_padding: RwSignal::new(0),
            input: RwSignal::new(String::new()),
        }
    }

    pub fn clear_input(&self) {
        self.input.set(String::new());
    }
}

impl Default for ChatContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for ChatContext {
    fn append_message(&self, sender: Sender, text: &str) {
        self.transcript.update(|t| {
            t.push_message(sender, text);
        });
    }

    fn append_error(&self, text: &str) {
        self.transcript.update(|t| {
            t.push_error(text);
        });
    }

    fn show_loader(&self, cycle: u64) {
        self.transcript.update(|t| {
            t.show_loader(cycle);
        });
    }

    fn remove_loader(&self, cycle: u64) {
        self.transcript.update(|t| {
            if !t.remove_loader(cycle) {
                log::debug!("No loader for cycle {}", cycle);
            }
        });
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.send_enabled.set(enabled);
    }

    fn scroll_to_bottom(&self) {
        // Wait a tick so the entries just pushed are in the DOM
        leptos::task::spawn_local(async move {
            TimeoutFuture::new(0).await;
            if let Some(history) = element_by_id(CHAT_HISTORY_ID) {
                history.set_scroll_top(history.scroll_height());
            }
        });
    }

    fn set_consent_visible(&self, visible: bool) {
        self.consent_visible.set(visible);
    }

    fn set_keyboard_padding(&self, px: u32) {
        self.keyboard_padding.set(px);
    }

    fn reveal_container(&self) {
        leptos::task::spawn_local(async move {
            TimeoutFuture::new(0).await;
            if let Some(container) = element_by_id(CHAT_CONTAINER_ID) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::End);
                container.scroll_into_view_with_scroll_into_view_options(&options);
            }
        });
    }
}

fn element_by_id(id: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

pub fn provide_chat_context() -> ChatContext {
    let context = ChatContext::new();
    provide_context(context);
    context
}

pub fn use_chat_context() -> ChatContext {
    expect_context::<ChatContext>()
}
