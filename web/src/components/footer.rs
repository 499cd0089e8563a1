use leptos::prelude::*;

pub const INSTAGRAM_URL: &str = "https://instagram.com/studio__absent";
pub const CONTACT_EMAIL: &str = "studioabsent.au@gmail.com";

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <a class="footer__link" href=INSTAGRAM_URL target="_blank" rel="noreferrer">
                "Instagram"
            </a>
            <a class="footer__link" href=format!("mailto:{}", CONTACT_EMAIL)>
                "Email"
            </a>
        </footer>
    }
}
