use super::super::Model;
use super::utils::percent;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(result) = &model.result else {
        return html! {};
    };
    let tier = result.tier;

    html! {
        <div class={classes!("results-container", tier.css_class())}>
            <div class="result-header">
                <h2><i class={tier.icon()}></i>{" "}{ &result.headline }</h2>
                <p class="advisory">{ &result.advisory }</p>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {:.1}%", result.confidence * 100.0)}></div>
                    </div>
                    <div class="meter-value">{ percent(result.confidence) }</div>
                </div>
            </div>
            <div class="detailed-results">
                <h3>{"Class probabilities"}</h3>
                <div class="result-bars">
                    { for result.probabilities.iter().map(|class| {
                        let highlighted = class.label == result.label;
                        html! {
                            <div class={classes!("result-item", highlighted.then_some("predicted"))}>
                                <div class="result-label">{ class.label.as_str() }</div>
                                <div class="result-bar-container">
                                    <div class="result-bar" style={format!("width: {:.1}%", class.probability * 100.0)}></div>
                                </div>
                                <div class="result-value">{ percent(class.probability) }</div>
                            </div>
                        }
                    })}
                </div>
            </div>
            <p class="disclaimer"><i class="fa-solid fa-circle-info"></i>{" "}{ &result.disclaimer }</p>
        </div>
    }
}
