use leptos::prelude::*;

/// Label, optional help text and the control for one booking field.
#[component]
pub fn FormItem(
    #[prop(into)] name: String,
    #[prop(into)] label: String,
    #[prop(optional, into)] description: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form-item">
            <label class="form-item__label" for=name>{label}</label>
            {description.map(|text| view! {
                <div class="form-item__description">{text}</div>
            })}
            {children()}
        </div>
    }
}
