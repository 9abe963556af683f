//! Samm chat widget
//!
//! Browser-side renovation assistant chat. The [`controller`] holds the send
//! cycle logic behind the traits in [`ports`]; everything touching the DOM,
//! `fetch` or `sessionStorage` lives in [`state`] and [`services`].

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod config;
mod controller;
mod error;
mod ports;
mod services;
mod state;
mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Samm chat widget starting");

    leptos::mount::mount_to_body(|| view! { <App/> });
}
