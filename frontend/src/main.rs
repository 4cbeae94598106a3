mod api;
mod components;

use components::form_section::render_form;
use components::header::render_header;
use components::results::render_results;
use components::theme_toggle::render_theme_toggle;
use components::utils::{render_config_error, render_error_message};
use gloo_storage::{LocalStorage, Storage};
use shared::form::{self, FormSchema};
use shared::{Feature, FeatureRecord, PredictionResponse, StatusResponse};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const THEME_KEY: &str = "obesity-dashboard-theme";

pub enum Msg {
    StatusLoaded(Result<StatusResponse, String>),

    // Form input
    NumericChanged(Feature, f64),
    ChoiceChanged(Feature, String),
    ResetForm,

    // Prediction
    Predict,
    PredictionResult(u64, PredictionResponse),

    // UI states
    SetError(Option<String>),
    ToggleTheme,
}

pub struct Model {
    pub status: Option<StatusResponse>,
    pub status_error: Option<String>,
    pub schema: FormSchema,
    pub record: FeatureRecord,
    pub result: Option<PredictionResponse>,
    /// Bumped on every edit so a reply for an older form state is dropped.
    pub form_version: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub theme: String,
}

impl Model {
    /// The model is usable only once the server says its artifacts loaded.
    pub fn ready(&self) -> bool {
        self.status.as_ref().is_some_and(|status| status.ready)
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let theme = LocalStorage::get::<String>(THEME_KEY).unwrap_or_else(|_| "light".to_string());
        apply_theme(&theme);

        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::StatusLoaded(api::fetch_status().await));
        });

        Self {
            status: None,
            status_error: None,
            schema: form::form_schema(),
            record: FeatureRecord::default(),
            result: None,
            form_version: 0,
            loading: false,
            error: None,
            theme,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StatusLoaded(Ok(status)) => {
                if !status.ready {
                    log::error!("Model is not available: {:?}", status.error);
                }
                self.status = Some(status);
                self.status_error = None;
                true
            }
            Msg::StatusLoaded(Err(e)) => {
                log::error!("Status check failed: {}", e);
                self.status_error = Some(e);
                true
            }

            Msg::NumericChanged(feature, value) => self.handle_numeric_changed(feature, value),
            Msg::ChoiceChanged(feature, value) => self.handle_choice_changed(feature, &value),
            Msg::ResetForm => {
                self.record = FeatureRecord::default();
                self.form_edited();
                true
            }

            Msg::Predict => self.handle_predict(ctx),
            Msg::PredictionResult(version, response) => self.handle_prediction(version, response),

            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::ToggleTheme => self.handle_toggle_theme(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = if self.ready() {
            html! {
                <>
                { render_form(self, ctx.link()) }
                { render_error_message(self) }
                { render_results(self) }
                </>
            }
        } else {
            render_config_error(self)
        };

        html! {
            <div class="container">
                { render_header() }
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>

                <main class="main-content">
                    { body }
                </main>

                <footer class="app-footer">
                    <p>{"Obesity Level Prediction | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn handle_numeric_changed(&mut self, feature: Feature, value: f64) -> bool {
        if let Err(e) = self.record.set_numeric(feature, value) {
            log::warn!("Ignoring input for {}: {}", feature, e);
            return false;
        }
        self.form_edited();
        true
    }

    fn handle_choice_changed(&mut self, feature: Feature, value: &str) -> bool {
        if let Err(e) = self.record.set_choice(feature, value) {
            log::warn!("Ignoring input for {}: {}", feature, e);
            return false;
        }
        self.form_edited();
        true
    }

    /// A shown result always belongs to the current inputs.
    fn form_edited(&mut self) {
        self.form_version += 1;
        self.result = None;
        self.error = None;
        self.loading = false;
    }

    fn handle_prediction(&mut self, version: u64, response: PredictionResponse) -> bool {
        if version != self.form_version {
            log::info!("Dropping prediction {} for an edited form", response.id);
            return false;
        }
        log::info!("Prediction {}: {}", response.id, response.label);
        self.result = Some(response);
        self.loading = false;
        true
    }

    fn handle_predict(&mut self, ctx: &Context<Self>) -> bool {
        if self.loading {
            return false;
        }
        if let Err(e) = self.record.validate() {
            self.error = Some(e.to_string());
            return true;
        }

        self.loading = true;
        self.error = None;
        let record = self.record.clone();
        let version = self.form_version;
        let link = ctx.link().clone();
        spawn_local(async move {
            match api::predict(&record).await {
                Ok(response) => link.send_message(Msg::PredictionResult(version, response)),
                Err(e) => link.send_message(Msg::SetError(Some(e))),
            }
        });
        true
    }

    fn handle_toggle_theme(&mut self) -> bool {
        self.theme = if self.theme == "light" { "dark" } else { "light" }.to_string();
        apply_theme(&self.theme);
        if let Err(e) = LocalStorage::set(THEME_KEY, &self.theme) {
            gloo_console::warn!(format!("Could not persist theme: {}", e));
        }
        true
    }
}

fn apply_theme(theme: &str) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };
    let classes = body.class_list();
    let result = if theme == "dark" {
        classes.add_1("dark-mode")
    } else {
        classes.remove_1("dark-mode")
    };
    if result.is_err() {
        log::warn!("Failed to apply {} theme", theme);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
