use booking_core::{
    ArtistCatalog, AvailabilityRequest, BookingAction, BookingFields, BookingState, StudioClock,
    MAX_MONTH_OFFSET,
};
use chrono::Utc;
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use thaw::*;
use wasm_bindgen::JsCast;

use crate::components::calendar::Calendar;
use crate::components::form_item::FormItem;
use crate::components::status::ErrorBanner;
use crate::server::{fetch_available_times, get_artist_catalog, submit_booking};

const POLICY: [&str; 8] = [
    "To secure your booking a deposit of $100 per appointment will be required \
     (dependent on the size of your tattoo) via bank transfer or cash to the studio, \
     which will come out of the total cost of the tattoo. Within the transaction \
     description, please include your full name and the date and time of the appointment.",
    "Not arriving to your appointment will lead to the complete loss of that $100 deposit.",
    "BY MAKING A BOOKING THROUGH THIS WEBSITE YOU ACKNOWLEDGE THAT ALL DEPOSITS ARE NON-REFUNDABLE.",
    "Reschedules are not permitted within 24h prior to the appointment.",
    "Dates can be locked in for you but if a deposit is not received within 24h, \
     that spot will no longer be reserved.",
    "Designs are not sent via dm or email prior to the appointment.",
    "Thank you for your support, and for taking the time to read through and fill out \
     this booking form.",
    "We look forward to seeing you!",
];

/// Server functions only send visitor-safe text in `ServerError`; anything
/// else is a transport problem between the browser and this site.
fn visitor_message(e: &ServerFnError) -> String {
    match e {
        ServerFnError::ServerError(message) => message.clone(),
        _ => "the site could not be reached".to_string(),
    }
}

#[component]
pub fn BookingsPage() -> impl IntoView {
    let clock = StudioClock::default();
    let navigate = use_navigate();

    let state = RwSignal::new(BookingState::new(clock.today()));
    let catalog = RwSignal::new(ArtistCatalog::default());
    let fields = RwSignal::new(BookingFields::default());

    let select_artist = move |name: String| {
        let mut request = None;
        catalog.with_untracked(|catalog| {
            state.update(|booking| {
                request = booking.change_artist(catalog, &name, &clock, Utc::now());
            });
        });
        let Some(AvailabilityRequest { generation, query }) = request else {
            return;
        };

        spawn_local(async move {
            match fetch_available_times(query.calendar_id).await {
                Ok(availability) => state.update(|booking| {
                    booking.reduce(BookingAction::AvailabilityLoaded {
                        generation,
                        availability,
                    })
                }),
                Err(e) => {
                    error!("Failed to fetch available times: {}", e);
                    state.update(|booking| {
                        booking.reduce(BookingAction::AvailabilityFailed {
                            generation,
                            reason: visitor_message(&e),
                        })
                    });
                }
            }
        });
    };

    // Load the catalog once, then show the first artist's availability
    Effect::new(move |_| {
        spawn_local(async move {
            match get_artist_catalog().await {
                Ok(loaded) => {
                    let first = loaded.first().map(|artist| artist.name.clone());
                    catalog.set(loaded);
                    if let Some(name) = first {
                        select_artist(name);
                    }
                }
                Err(e) => {
                    error!("Failed to load artists: {}", e);
                    state.update(|booking| {
                        booking.error = Some("Could not load the list of artists.".to_string())
                    });
                }
            }
        });
    });

    Effect::new(move |_| {
        let current = fields.get();
        state.update(|booking| booking.reduce(BookingAction::FieldsChanged(current)));
    });

    let generation = Memo::new(move |_| state.with(|booking| booking.fetch_generation));
    let availability =
        Signal::derive(move || state.with(|booking| booking.displayed_availability().cloned()));
    let is_loading = Signal::derive(move || state.with(|booking| booking.is_loading));
    let is_saving = Signal::derive(move || state.with(|booking| booking.is_saving));
    let submit_disabled =
        Signal::derive(move || state.with(|booking| !booking.submit_enabled() || booking.is_saving));
    let error_message = Signal::derive(move || state.with(|booking| booking.error.clone()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let current = fields.get_untracked();
        let ticket = match state.with_untracked(|booking| booking.prepare_submission(&current, &clock)) {
            Ok(ticket) => ticket,
            Err(blocked) => {
                log!("Booking not submitted: {}", blocked);
                state.update(|booking| booking.reduce(BookingAction::SubmitBlocked(blocked)));
                return;
            }
        };

        let Some(form) = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlFormElement>().ok())
        else {
            error!("Submit event did not come from a form");
            return;
        };

        let form_data = match web_sys::FormData::new_with_form(&form) {
            Ok(form_data) => form_data,
            Err(e) => {
                error!("Failed to read booking form: {:?}", e);
                state.update(|booking| {
                    booking.reduce(BookingAction::SubmitFailed(
                        "the form could not be read".to_string(),
                    ))
                });
                return;
            }
        };
        if current.phone.trim().is_empty() {
            form_data.delete("phone");
        }
        let appended = form_data
            .append_with_str("date", &ticket.date)
            .and_then(|_| form_data.append_with_str("calendarId", &ticket.calendar_id));
        if let Err(e) = appended {
            error!("Failed to build booking form: {:?}", e);
            state.update(|booking| {
                booking.reduce(BookingAction::SubmitFailed(
                    "the form could not be prepared".to_string(),
                ))
            });
            return;
        }

        state.update(|booking| booking.reduce(BookingAction::SubmitRequested));
        let navigate = navigate.clone();
        spawn_local(async move {
            match submit_booking(form_data.into()).await {
                Ok(()) => {
                    state.update(|booking| booking.reduce(BookingAction::SubmitSucceeded));
                    navigate("/thankyou", Default::default());
                }
                Err(e) => {
                    error!("Failed to submit booking: {}", e);
                    state.update(|booking| booking.reduce(BookingAction::SubmitFailed(visitor_message(&e))));
                }
            }
        });
    };

    view! {
        <div class="bookings-container">
            <A href="/" attr:class="bookings-back">"‹ Back"</A>
            <h1>"Bookings"</h1>

            <form class="bookings-form" on:submit=on_submit>
                <FormItem name="artist" label="Artist*">
                    <select id="artist" on:change=move |ev| select_artist(event_target_value(&ev))>
                        {move || {
                            catalog.with(|catalog| {
                                catalog
                                    .artists()
                                    .iter()
                                    .map(|artist| {
                                        let name = artist.name.clone();
                                        view! { <option value=name.clone()>{name.clone()}</option> }
                                    })
                                    .collect::<Vec<_>>()
                            })
                        }}
                    </select>
                </FormItem>

                // Remounted per artist so paging starts again from this month
                {move || {
                    generation.track();
                    view! {
                        <Calendar
                            availability=availability
                            is_loading=is_loading
                            max_offset=MAX_MONTH_OFFSET
                            on_change_month=move |change| {
                                state.update(|booking| booking.reduce(BookingAction::MonthChanged(change)))
                            }
                            on_select_slot=move |slot| {
                                state.update(|booking| booking.reduce(BookingAction::SlotSelected(slot)))
                            }
                        />
                    }
                }}

                <h2>"Details"</h2>
                <FormItem name="first_name" label="First name*">
                    <input
                        id="first_name"
                        name="first_name"
                        required
                        on:input=move |ev| fields.update(|f| f.first_name = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem name="last_name" label="Last name*">
                    <input
                        id="last_name"
                        name="last_name"
                        required
                        on:input=move |ev| fields.update(|f| f.last_name = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem name="email" label="Email*">
                    <input
                        id="email"
                        name="email"
                        type="email"
                        required
                        on:input=move |ev| fields.update(|f| f.email = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem name="phone" label="Phone (optional)">
                    <input
                        id="phone"
                        name="phone"
                        type="tel"
                        on:input=move |ev| fields.update(|f| f.phone = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem
                    name="description"
                    label="Description*"
                    description="Start with a brief description of what you would like to have tattooed. \
                                 Be more specific if you would like a custom design. As much context and \
                                 reference as possible."
                >
                    <textarea
                        id="description"
                        name="description"
                        required
                        rows=6
                        maxlength=500
                        on:input=move |ev| fields.update(|f| f.description = event_target_value(&ev))
                    ></textarea>
                </FormItem>
                <FormItem
                    name="sizing"
                    label="Sizing*"
                    description="What size would you like? Roughly, in centimetres."
                >
                    <input
                        id="sizing"
                        name="sizing"
                        required
                        on:input=move |ev| fields.update(|f| f.sizing = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem
                    name="placement"
                    label="Placement*"
                    description="Where on your body do you want this tattoo? Be as precise as possible. \
                                 For example: Inner left forearm, front of right thigh."
                >
                    <input
                        id="placement"
                        name="placement"
                        required
                        on:input=move |ev| fields.update(|f| f.placement = event_target_value(&ev))
                    />
                </FormItem>
                <FormItem
                    name="references"
                    label="References*"
                    description="Attach up to five reference images related to your idea."
                >
                    <input
                        id="references"
                        name="references"
                        type="file"
                        accept="image/png, image/jpeg"
                        multiple
                        required
                        on:change=move |ev| {
                            let count = event_target::<web_sys::HtmlInputElement>(&ev)
                                .files()
                                .map(|files| files.length() as usize)
                                .unwrap_or(0);
                            fields.update(|f| f.reference_count = count);
                        }
                    />
                </FormItem>

                <div class="bookings-policy">
                    {POLICY.iter().map(|paragraph| view! { <p>{*paragraph}</p> }).collect::<Vec<_>>()}
                </div>

                <p class="bookings-agree">
                    <input
                        id="agree"
                        type="checkbox"
                        required
                        on:change=move |_| state.update(|booking| booking.reduce(BookingAction::AgreeToggled))
                    />
                    <label for="agree">"I agree to the above"</label>
                </p>

                <ErrorBanner message=error_message/>

                <Button
                    appearance=ButtonAppearance::Primary
                    button_type=ButtonType::Submit
                    disabled=submit_disabled
                    loading=is_saving
                >
                    "Submit"
                </Button>
            </form>
        </div>
    }
}
