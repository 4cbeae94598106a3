use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-weight-scale"></i> {" Obesity Level Prediction"}</h1>
            <p class="subtitle">{"Fill in your physical data and habits to estimate your obesity category"}</p>
        </header>
    }
}
