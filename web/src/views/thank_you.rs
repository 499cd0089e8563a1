use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use thaw::*;

use crate::components::footer::{Footer, CONTACT_EMAIL};

#[component]
pub fn ThankYouPage() -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <div class="booking-confirmation-container">
            <div class="booking-confirmation-header">
                <div class="booking-confirmation-success-icon">"✓"</div>
                <h1 class="booking-confirmation-title">"Thank you!"</h1>
                <p class="booking-confirmation-subtitle">
                    "Your booking request has been sent to the studio."
                </p>
            </div>

            <div class="booking-confirmation-next-steps">
                <h2 class="booking-confirmation-section-title">"What happens next?"</h2>
                <ol class="booking-confirmation-steps">
                    <li>"Your artist reviews the description, sizing and references you sent."</li>
                    <li>"We email you to confirm the time and the $100 deposit details."</li>
                    <li>"The spot is held for 24 hours while the deposit comes through."</li>
                </ol>
                <p>
                    "Questions? Email us at "
                    <a href=format!("mailto:{}", CONTACT_EMAIL)>{CONTACT_EMAIL}</a>
                </p>
            </div>

            <div class="booking-confirmation-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| {
                        navigate("/", Default::default());
                    }
                >
                    "Return Home"
                </Button>
            </div>

            <Footer/>
        </div>
    }
}
