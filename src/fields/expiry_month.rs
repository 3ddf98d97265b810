use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::FieldClasses;
use crate::config::EXPIRY_MONTH_FIELD;
use crate::form::use_payment_form;

#[derive(Properties, PartialEq)]
pub struct ExpiryMonthProps {
    #[prop_or_default]
    pub class: Classes,
    /// Text of the disabled placeholder option. Defaults to `MM`.
    #[prop_or_default]
    pub placeholder: Option<String>,
    #[prop_or_default]
    pub classes: FieldClasses,
}

/// Expiry month select. Option values are the unpadded numbers `1` through
/// `12`; the visible labels are zero-padded. The combined expiry-in-the-past
/// error renders under this field.
#[function_component(ExpiryMonth)]
pub fn expiry_month(props: &ExpiryMonthProps) -> Html {
    let form = use_payment_form();
    let errors = form
        .errors()
        .map(|errors| errors.expiry_month.clone())
        .unwrap_or_default();
    let has_error = !errors.is_empty();
    let message = errors
        .first()
        .map(|error| form.localization().message_for(error));
    let selected = form.values().expiry_month.clone();

    let onchange = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            form.set_expiry_month(select.value());
        })
    };

    html! {
        <div
            class={props.class.clone()}
            style="display: flex; flex-direction: column;"
            data-error={has_error.then_some("true")}
        >
            <label class={props.classes.label.clone()} for={EXPIRY_MONTH_FIELD}>
                { form.localization().labels.expiry_month.clone() }
            </label>
            <select
                id={EXPIRY_MONTH_FIELD}
                name={EXPIRY_MONTH_FIELD}
                autocomplete="cc-exp-month"
                class={props.classes.input.clone()}
                style={has_error.then_some("border: 1px solid red;")}
                data-error={has_error.then_some("true")}
                aria-invalid={has_error.then_some("true")}
                {onchange}
            >
                <option value="" disabled={true} selected={selected.is_empty()}>
                    { props.placeholder.clone().unwrap_or_else(|| "MM".to_string()) }
                </option>
                {
                    for (1..=12).map(|month: i32| {
                        let value = month.to_string();
                        let is_selected = selected == value;
                        html! {
                            <option key={month} value={value} selected={is_selected}>
                                { format!("{:02}", month) }
                            </option>
                        }
                    })
                }
            </select>
            if let Some(message) = message {
                <p class={props.classes.error.clone()} style="color: red;">{ message }</p>
            }
        </div>
    }
}
