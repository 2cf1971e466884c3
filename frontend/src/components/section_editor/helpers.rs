//! Utility functions for the section editor component.
//!
//! - **User feedback**: temporary toast notifications for save, publish and
//!   reset results.
//! - **Unsaved changes**: the `window.app_dirty` flag read by the page's
//!   `beforeunload` handler.
//! - **Files**: reading a picked image into a data URI the draft can hold
//!   until the backend stores it.

use common::draft::DraftState;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

/// Displays a temporary toast at the bottom center of the page. Removed
/// after three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Publishes whether the draft has unsaved changes as `window.app_dirty`.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

/// Asks the user to confirm a destructive action. Without a window there is
/// nobody to ask, so the answer is no.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Reads a picked file as a `data:` URI.
pub async fn read_data_uri(file: web_sys::File) -> Result<String, String> {
    let file = gloo_file::File::from(file);
    if !file.raw_mime_type().starts_with("image/") {
        return Err(format!("{} is not an image", file.name()));
    }
    gloo_file::futures::read_as_data_url(&file)
        .await
        .map_err(|err| err.to_string())
}

pub fn state_label(state: DraftState) -> (&'static str, &'static str) {
    match state {
        DraftState::Empty => ("New", "badge empty"),
        DraftState::Editing { dirty: true } => ("Unsaved changes", "badge dirty"),
        DraftState::Editing { dirty: false } => ("Saved", "badge saved"),
        DraftState::Published => ("Published", "badge published"),
    }
}
