use booking_core::{
    CalendarAction, CalendarState, CalendarView, DayCell, MonthAvailability, MonthChange,
    SelectedSlot, SlotOption, StudioClock,
};
use leptos::prelude::*;
use thaw::*;

use crate::components::status::LoadingView;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month grid that turns into a list of start times once a day is picked.
///
/// Month paging is reported through `on_change_month` before the grid
/// moves, so the parent can keep its month offset in step. Picking a time
/// only reports the resolved slot; submitting is left to the form.
#[component]
pub fn Calendar(
    #[prop(into)] availability: Signal<Option<MonthAvailability>>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(optional)] min_offset: i32,
    max_offset: i32,
    on_change_month: impl Fn(MonthChange) + 'static + Copy + Send + Sync,
    on_select_slot: impl Fn(SelectedSlot) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let clock = StudioClock::default();
    let today = clock.today();
    let state = RwSignal::new(CalendarState::new(clock.now_local(), min_offset, max_offset));

    let change_month = move |forward: bool| {
        let allowed = state.with_untracked(|calendar| {
            if forward {
                calendar.can_go_forward()
            } else {
                calendar.can_go_back()
            }
        });
        if !allowed {
            return;
        }

        on_change_month(state.with_untracked(|calendar| calendar.month_change(forward)));
        state.update(|calendar| {
            calendar.reduce(if forward {
                CalendarAction::MonthIncremented
            } else {
                CalendarAction::MonthDecremented
            })
        });
    };

    let select_slot = move |option: &SlotOption| {
        let slot = option.slot;
        let index = option.index;
        on_select_slot(state.with_untracked(|calendar| calendar.resolve(slot)));
        state.update(|calendar| {
            calendar.reduce(CalendarAction::SlotSelected {
                index,
                hour: slot.hour,
                minute: slot.minute,
            })
        });
    };

    // Paging buttons only show where a move is allowed
    let visibility = |allowed: bool| if allowed { "" } else { "visibility: hidden" };
    let back_style = move || visibility(state.with(CalendarState::can_go_back));
    let forward_style = move || visibility(state.with(CalendarState::can_go_forward));

    let month_grid = move || {
        let cells = availability.with(|month| {
            state.with(|calendar| calendar.day_cells(today, month.as_ref()))
        });

        view! {
            <div class="calendar-grid">
                {WEEKDAYS
                    .iter()
                    .map(|weekday| view! { <div class="calendar-weekday">{*weekday}</div> })
                    .collect::<Vec<_>>()}
                {cells
                    .into_iter()
                    .map(|cell| match cell {
                        DayCell::Blank => view! {
                            <div class="calendar-day calendar-day--blank"></div>
                        }.into_any(),
                        DayCell::Closed(day) => view! {
                            <div class="calendar-day calendar-day--closed">{day}</div>
                        }.into_any(),
                        DayCell::Open { day, slots } => view! {
                            <button
                                type="button"
                                class="calendar-day calendar-day--open"
                                on:click=move |_| {
                                    let slots = slots.clone();
                                    state.update(|calendar| {
                                        calendar.reduce(CalendarAction::DaySelected { day, slots })
                                    });
                                }
                            >
                                {day}
                            </button>
                        }.into_any(),
                    })
                    .collect::<Vec<_>>()}
            </div>
        }
    };

    let slot_list = move || {
        let options = state.with(CalendarState::slot_options);

        view! {
            <div class="calendar-slots">
                {options
                    .into_iter()
                    .map(|option| {
                        let class = if option.selected {
                            "calendar-slot calendar-slot--selected"
                        } else {
                            "calendar-slot"
                        };
                        let label = option.label.clone();
                        view! {
                            <button type="button" class=class on:click=move |_| select_slot(&option)>
                                {label}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
                <button
                    type="button"
                    class="calendar-slots__back"
                    on:click=move |_| {
                        state.update(|calendar| {
                            calendar.reduce(CalendarAction::SlotSelectionCancelled)
                        })
                    }
                >
                    "Back to calendar"
                </button>
            </div>
        }
    };

    view! {
        <div class="calendar">
            <div class="calendar-header">
                <div style=back_style>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        size=ButtonSize::Small
                        button_type=ButtonType::Button
                        on_click=move |_| change_month(false)
                    >
                        "←"
                    </Button>
                </div>

                <div class="calendar-heading">
                    {move || state.with(|calendar| calendar.heading().to_string())}
                </div>

                <div style=forward_style>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        size=ButtonSize::Small
                        button_type=ButtonType::Button
                        on_click=move |_| change_month(true)
                    >
                        "→"
                    </Button>
                </div>
            </div>

            {move || {
                if is_loading.get() {
                    view! { <LoadingView message="Checking availability..."/> }.into_any()
                } else if state.with(CalendarState::view) == CalendarView::SlotList {
                    slot_list().into_any()
                } else {
                    month_grid().into_any()
                }
            }}
        </div>
    }
}
