use super::super::{Model, Msg};
use super::utils::debounce;
use shared::FeatureValue;
use shared::form::{FieldDomain, FieldGroup, FieldSpec};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_form(model: &Model, link: &Scope<Model>) -> Html {
    let predict = {
        let link = link.clone();
        debounce(300, move || link.send_message(Msg::Predict))
    };

    html! {
        <section class="form-section">
            <div class="form-groups">
                { for model.schema.groups.iter().map(|group| render_group(model, link, group)) }
            </div>
            <div class="button-container">
                <button class="analyze-btn" onclick={predict} disabled={model.loading}>
                    if model.loading {
                        <><i class="fa-solid fa-spinner fa-spin"></i>{" Predicting..."}</>
                    } else {
                        <><i class="fa-solid fa-stethoscope"></i>{" Predict obesity level"}</>
                    }
                </button>
                <button
                    class="analyze-btn secondary"
                    onclick={link.callback(|_| Msg::ResetForm)}
                    disabled={model.loading}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Reset"}
                </button>
            </div>
        </section>
    }
}

fn render_group(model: &Model, link: &Scope<Model>, group: &FieldGroup) -> Html {
    html! {
        <fieldset class="form-group">
            <legend>{ &group.title }</legend>
            { for group.fields.iter().map(|field| render_field(model, link, field)) }
        </fieldset>
    }
}

fn render_field(model: &Model, link: &Scope<Model>, field: &FieldSpec) -> Html {
    let feature = field.feature;
    let id = format!("field-{}", feature.column());

    let control = match (&field.domain, model.record.value(feature)) {
        (FieldDomain::Slider { min, max, step, .. }, FeatureValue::Numeric(value)) => {
            let decimals = if *step >= 1.0 { 0 } else { 2 };
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::NumericChanged(feature, input.value_as_number())
            });
            html! {
                <div class="slider-row">
                    <input
                        type="range"
                        id={id.clone()}
                        min={min.to_string()}
                        max={max.to_string()}
                        step={step.to_string()}
                        value={value.to_string()}
                        {oninput}
                    />
                    <span class="slider-value">{ format!("{:.*}", decimals, value) }</span>
                </div>
            }
        }
        (FieldDomain::Select { options, .. }, FeatureValue::Categorical(current)) => {
            let onchange = link.callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                Msg::ChoiceChanged(feature, select.value())
            });
            html! {
                <select id={id.clone()} {onchange}>
                    { for options.iter().map(|option| html! {
                        <option value={option.clone()} selected={option.as_str() == current}>{ option }</option>
                    })}
                </select>
            }
        }
        _ => {
            log::error!("Form domain of {} does not match its value", feature);
            html! {}
        }
    };

    html! {
        <div class="form-field">
            <label for={id}>{ &field.label }</label>
            { control }
        </div>
    }
}
