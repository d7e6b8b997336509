//! Clipboard access for QR "copia e cola" strings.

/// Copy text via the async clipboard API.
#[cfg(target_arch = "wasm32")]
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or("No window")?;
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text))
        .await
        .map_err(|e| format!("{:?}", e))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn copy_to_clipboard(_text: &str) -> Result<(), String> {
    Err("Clipboard only available in browser".to_string())
}
