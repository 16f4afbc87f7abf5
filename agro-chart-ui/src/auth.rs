//! Browser sign-in through the OAuth implicit grant.
//!
//! The sign-in link sends the user to Google, which redirects back with
//! `#access_token=...` in the URL fragment. The token is moved to session
//! storage and the fragment is removed from the address bar.

use agro_ee::auth::SCOPES;
use reqwest::Url;

/// Cloud project billed for Earth Engine calls, fixed at build time.
pub const PROJECT: Option<&str> = option_env!("EE_PROJECT");
/// OAuth web client id, fixed at build time.
pub const CLIENT_ID: Option<&str> = option_env!("EE_OAUTH_CLIENT_ID");

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const STORAGE_KEY: &str = "agro.ee.access_token";

/// Extract `access_token` from a `#a=b&c=d` URL fragment.
pub fn token_from_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.trim_start_matches('#');
    Url::parse(&format!("http://localhost/?{fragment}"))
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Authorization URL for the implicit grant, returning to `redirect_uri`.
pub fn sign_in_url(client_id: &str, redirect_uri: &str) -> Option<String> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "token"),
            ("scope", SCOPES),
            ("include_granted_scopes", "true"),
        ],
    )
    .ok()
    .map(String::from)
}

/// Token from the current URL fragment, else from session storage.
pub fn capture_token() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let storage = window.session_storage().ok().flatten();

    if let Some(token) = location.hash().ok().as_deref().and_then(token_from_fragment) {
        if let Some(storage) = &storage {
            let _ = storage.set_item(STORAGE_KEY, &token);
        }
        if let (Ok(history), Ok(path)) = (window.history(), location.pathname()) {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
        }
        log::info!("Captured access token from sign-in redirect");
        return Some(token);
    }
    storage.and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
}

/// Forget the stored token, e.g. after the service rejected it.
pub fn clear_token() {
    if let Some(storage) = web_sys::window().and_then(|w| w.session_storage().ok().flatten()) {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

/// Sign-in link back to the current page, if a client id was configured.
pub fn current_sign_in_url() -> Option<String> {
    let client_id = CLIENT_ID?;
    let window = web_sys::window()?;
    let location = window.location();
    let redirect = format!("{}{}", location.origin().ok()?, location.pathname().ok()?);
    sign_in_url(client_id, &redirect)
}
