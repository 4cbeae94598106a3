use super::super::Model;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut pending = timeout.borrow_mut();
        if let Some(old_timeout) = pending.take() {
            old_timeout.cancel();
        }
        let inner_callback = callback.clone();
        *pending = Some(Timeout::new(duration, move || inner_callback()));
    })
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}

/// Shown instead of the form while the model is unavailable.
pub fn render_config_error(model: &Model) -> Html {
    let (title, detail) = match (&model.status, &model.status_error) {
        (Some(status), _) => (
            "The prediction model could not be loaded.",
            status
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        ),
        (None, Some(e)) => ("The prediction service is unreachable.", e.clone()),
        (None, None) => {
            return html! {
                <div class="loading-message">
                    <i class="fa-solid fa-spinner fa-spin"></i>
                    <p>{"Checking model status..."}</p>
                </div>
            };
        }
    };

    html! {
        <div class="error-message config-error">
            <i class="fa-solid fa-circle-exclamation"></i>
            <div>
                <p><strong>{ title }</strong></p>
                <p>{ detail }</p>
                <p class="hint">{"Check the artifact directory and profile in config/app.yaml, then restart the server."}</p>
            </div>
        </div>
    }
}
