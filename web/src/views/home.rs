use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::footer::Footer;

pub const STUDIO_NAME: &str = "Studio Absent";

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="homepage-container">
            <h1 class="homepage-title">{STUDIO_NAME}</h1>
            <A href="/bookings">
                <button class="btn-primary">"Booking"</button>
            </A>
            <Footer/>
            <address class="homepage-address">
                "Basement, 387 Flinders Lane,"
                <br/>
                "Melbourne, 3000"
            </address>
        </div>
    }
}
