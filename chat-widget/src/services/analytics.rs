//! Meta pixel conversion tracking

use wasm_bindgen::prelude::*;

use crate::ports::Analytics;

#[wasm_bindgen(inline_js = "
export function trackPixelEvent(name) {
    if (typeof window.fbq === 'function') {
        window.fbq('track', name);
        return true;
    }
    return false;
}
")]
extern "C" {
    /// Fire `fbq('track', name)`; false when the pixel script isn't on the page
    fn trackPixelEvent(name: &str) -> bool;
}

/// Reports send-button activations as "Lead" conversions
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelAnalytics;

impl Analytics for PixelAnalytics {
    fn track_lead(&self) {
        if !trackPixelEvent("Lead") {
            log::debug!("fbq not loaded, Lead event skipped");
        }
    }
}
