use super::super::{Model, Msg};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_theme_toggle(theme: &str, link: &Scope<Model>) -> Html {
    let dark = theme == "dark";
    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            onclick={link.callback(|_| Msg::ToggleTheme)}
            title={ if dark { "Switch to Light Mode" } else { "Switch to Dark Mode" } }
        >
            <i class={ if dark { "fa-solid fa-moon" } else { "fa-solid fa-sun" } }></i>
        </button>
    }
}
