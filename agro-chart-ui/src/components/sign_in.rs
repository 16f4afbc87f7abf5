//! Sign-in prompt shown until an access token is available.

use crate::auth;
use dioxus::prelude::*;

#[component]
pub fn SignIn() -> Element {
    let url = auth::current_sign_in_url();

    rsx! {
        div {
            style: "padding: 16px; margin: 8px 0; background: #E3F2FD; border: 1px solid #90CAF9; border-radius: 4px;",
            p {
                style: "margin: 0 0 8px 0;",
                "Os dados são processados no Google Earth Engine. Entre com uma conta autorizada para continuar."
            }
            if let Some(url) = url {
                a {
                    href: "{url}",
                    style: "font-weight: bold;",
                    "Entrar com Google"
                }
            } else {
                p {
                    style: "margin: 0; color: #C62828;",
                    "Nenhum client id OAuth foi configurado nesta compilação (EE_OAUTH_CLIENT_ID)."
                }
            }
        }
    }
}
