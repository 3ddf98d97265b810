use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::FieldClasses;
use crate::config::CVV_FIELD;
use crate::form::use_payment_form;

#[derive(Properties, PartialEq)]
pub struct CvvProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub classes: FieldClasses,
}

/// Security code input.
#[function_component(Cvv)]
pub fn cvv(props: &CvvProps) -> Html {
    let form = use_payment_form();
    let errors = form
        .errors()
        .map(|errors| errors.cvv.clone())
        .unwrap_or_default();
    let has_error = !errors.is_empty();
    let message = errors
        .first()
        .map(|error| form.localization().message_for(error));

    let oninput = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set_cvv(&input.value());
        })
    };

    html! {
        <div
            class={props.class.clone()}
            style="display: flex; flex-direction: column;"
            data-error={has_error.then_some("true")}
        >
            <label class={props.classes.label.clone()} for={CVV_FIELD}>
                { form.localization().labels.cvv.clone() }
            </label>
            <input
                id={CVV_FIELD}
                name={CVV_FIELD}
                type="text"
                inputmode="numeric"
                autocomplete="cc-csc"
                class={props.classes.input.clone()}
                style={has_error.then_some("border: 1px solid red;")}
                data-error={has_error.then_some("true")}
                aria-invalid={has_error.then_some("true")}
                value={form.values().cvv.clone()}
                {oninput}
            />
            if let Some(message) = message {
                <p class={props.classes.error.clone()} style="color: red;">{ message }</p>
            }
        </div>
    }
}
