use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::FieldClasses;
use crate::config::CARD_NUMBER_FIELD;
use crate::form::use_payment_form;

#[derive(Properties, PartialEq)]
pub struct CardNumberProps {
    /// Class for the wrapping element.
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub classes: FieldClasses,
}

/// Card number input. Spaces are stripped as the user types, so the stored
/// value is digits only.
#[function_component(CardNumber)]
pub fn card_number(props: &CardNumberProps) -> Html {
    let form = use_payment_form();
    let errors = form
        .errors()
        .map(|errors| errors.card_number.clone())
        .unwrap_or_default();
    let has_error = !errors.is_empty();
    let message = errors
        .first()
        .map(|error| form.localization().message_for(error));

    let oninput = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set_card_number(&input.value());
        })
    };

    html! {
        <div
            class={props.class.clone()}
            style="display: flex; flex-direction: column;"
            data-error={has_error.then_some("true")}
        >
            <label class={props.classes.label.clone()} for={CARD_NUMBER_FIELD}>
                { form.localization().labels.card_number.clone() }
            </label>
            <input
                id={CARD_NUMBER_FIELD}
                name={CARD_NUMBER_FIELD}
                type="text"
                inputmode="numeric"
                autocomplete="cc-number"
                class={props.classes.input.clone()}
                style={has_error.then_some("border: 1px solid red;")}
                data-error={has_error.then_some("true")}
                aria-invalid={has_error.then_some("true")}
                value={form.values().card_number.clone()}
                {oninput}
            />
            if let Some(message) = message {
                <p class={props.classes.error.clone()} style="color: red;">{ message }</p>
            }
        </div>
    }
}
