use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SubmitButtonProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub disabled: bool,
    pub children: Children,
}

/// Plain `type="submit"` button for the payment form.
#[function_component(SubmitButton)]
pub fn submit_button(props: &SubmitButtonProps) -> Html {
    html! {
        <button type="submit" class={props.class.clone()} disabled={props.disabled}>
            { for props.children.iter() }
        </button>
    }
}
