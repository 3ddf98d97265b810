use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::FieldClasses;
use crate::config::TERMS_FIELD;
use crate::form::use_payment_form;

#[derive(Properties, PartialEq)]
pub struct TermsProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub classes: FieldClasses,
    /// Rendered as the checkbox label, so hosts can link their actual
    /// terms document.
    pub children: Children,
}

/// Terms-acceptance checkbox. Submission is blocked while unchecked.
#[function_component(Terms)]
pub fn terms(props: &TermsProps) -> Html {
    let form = use_payment_form();
    let errors = form
        .errors()
        .map(|errors| errors.terms.clone())
        .unwrap_or_default();
    let has_error = !errors.is_empty();
    let message = errors
        .first()
        .map(|error| form.localization().message_for(error));

    let onchange = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set_terms(input.checked());
        })
    };

    html! {
        <div class={props.class.clone()} data-error={has_error.then_some("true")}>
            <input
                id={TERMS_FIELD}
                name={TERMS_FIELD}
                type="checkbox"
                class={props.classes.input.clone()}
                data-error={has_error.then_some("true")}
                aria-invalid={has_error.then_some("true")}
                checked={form.values().terms}
                {onchange}
            />
            <label
                class={props.classes.label.clone()}
                for={TERMS_FIELD}
                style="margin-left: 10px;"
            >
                { for props.children.iter() }
            </label>
            if let Some(message) = message {
                <p class={props.classes.error.clone()} style="color: red;">{ message }</p>
            }
        </div>
    }
}
