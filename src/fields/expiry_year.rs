use time::OffsetDateTime;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::FieldClasses;
use crate::config::EXPIRY_YEAR_FIELD;
use crate::form::use_payment_form;

#[derive(Properties, PartialEq)]
pub struct ExpiryYearProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub classes: FieldClasses,
}

/// Expiry year select, offering the current year and the nine after it.
/// Option values are two-digit years; the visible labels are full years.
#[function_component(ExpiryYear)]
pub fn expiry_year(props: &ExpiryYearProps) -> Html {
    let form = use_payment_form();
    let errors = form
        .errors()
        .map(|errors| errors.expiry_year.clone())
        .unwrap_or_default();
    let has_error = !errors.is_empty();
    let message = errors
        .first()
        .map(|error| form.localization().message_for(error));
    let selected = form.values().expiry_year.clone();
    let current_year = OffsetDateTime::now_utc().year();

    let onchange = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            form.set_expiry_year(select.value());
        })
    };

    html! {
        <div
            class={props.class.clone()}
            style="display: flex; flex-direction: column;"
            data-error={has_error.then_some("true")}
        >
            <label class={props.classes.label.clone()} for={EXPIRY_YEAR_FIELD}>
                { form.localization().labels.expiry_year.clone() }
            </label>
            <select
                id={EXPIRY_YEAR_FIELD}
                name={EXPIRY_YEAR_FIELD}
                autocomplete="cc-exp-year"
                class={props.classes.input.clone()}
                style={has_error.then_some("border: 1px solid red;")}
                data-error={has_error.then_some("true")}
                aria-invalid={has_error.then_some("true")}
                {onchange}
            >
                <option value="" disabled={true} selected={selected.is_empty()}>
                    { "YYYY" }
                </option>
                {
                    for (current_year..current_year + 10).map(|year| {
                        let value = format!("{:02}", year.rem_euclid(100));
                        let is_selected = selected == value;
                        html! {
                            <option key={year} value={value} selected={is_selected}>
                                { year }
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
