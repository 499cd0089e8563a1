//! Month grid and time-slot picker state.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::availability::{MonthAvailability, TimeSlot};
use crate::booking::SelectedSlot;
use crate::clock;

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarAction {
    MonthIncremented,
    MonthDecremented,
    DaySelected { day: u32, slots: Vec<TimeSlot> },
    SlotSelected { index: usize, hour: u32, minute: u32 },
    SlotSelectionCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    MonthGrid,
    SlotList,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCell {
    /// Padding before the 1st or after the last day.
    Blank,
    /// A day that can't be picked: already past or nothing free.
    Closed(u32),
    Open { day: u32, slots: Vec<TimeSlot> },
}

/// Reported to the parent before the displayed month moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthChange {
    pub month0: u32,
    pub previous_month0: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOption {
    pub index: usize,
    pub slot: TimeSlot,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    current: NaiveDateTime,
    offset: i32,
    min_offset: i32,
    max_offset: i32,
    selected_slot_index: Option<usize>,
    time_slots: Option<Vec<TimeSlot>>,
    heading: String,
}

impl CalendarState {
    /// Fresh calendar on the current month with nothing selected.
    pub fn new(now: NaiveDateTime, min_offset: i32, max_offset: i32) -> Self {
        Self {
            current: now,
            offset: 0,
            min_offset,
            max_offset,
            selected_slot_index: None,
            time_slots: None,
            heading: clock::month_heading(now.date()),
        }
    }

    pub fn current(&self) -> NaiveDateTime {
        self.current
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn selected_slot_index(&self) -> Option<usize> {
        self.selected_slot_index
    }

    pub fn time_slots(&self) -> Option<&[TimeSlot]> {
        self.time_slots.as_deref()
    }

    pub fn view(&self) -> CalendarView {
        if self.time_slots.is_some() {
            CalendarView::SlotList
        } else {
            CalendarView::MonthGrid
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.view() == CalendarView::MonthGrid && self.offset > self.min_offset
    }

    pub fn can_go_forward(&self) -> bool {
        self.view() == CalendarView::MonthGrid && self.offset < self.max_offset
    }

    pub fn month_change(&self, forward: bool) -> MonthChange {
        let previous_month0 = self.current.month0();
        let month0 = if forward {
            (previous_month0 + 1) % 12
        } else {
            (previous_month0 + 11) % 12
        };
        MonthChange {
            month0,
            previous_month0,
        }
    }

    pub fn reduce(&mut self, action: CalendarAction) {
        match action {
            CalendarAction::MonthIncremented => {
                if self.can_go_forward() {
                    self.step_month(1);
                }
            }
            CalendarAction::MonthDecremented => {
                if self.can_go_back() {
                    self.step_month(-1);
                }
            }
            CalendarAction::DaySelected { day, slots } => self.select_day(day, slots),
            CalendarAction::SlotSelected {
                index,
                hour,
                minute,
            } => self.select_slot(index, hour, minute),
            CalendarAction::SlotSelectionCancelled => {
                self.selected_slot_index = None;
                self.time_slots = None;
                self.heading = clock::month_heading(self.current.date());
            }
        }
    }

    fn step_month(&mut self, delta: i32) {
        self.current = clock::shift_months(self.current, delta);
        self.offset += delta;
        self.heading = clock::month_heading(self.current.date());
    }

    fn select_day(&mut self, day: u32, slots: Vec<TimeSlot>) {
        if slots.is_empty() || self.view() == CalendarView::SlotList {
            return;
        }
        let first = clock::first_of_month(self.current.date());
        if day == 0 || day > clock::days_in_month(first.year(), first.month()) {
            return;
        }

        let date = first + TimeDelta::days(i64::from(day - 1));
        self.current = date.and_time(NaiveTime::MIN);
        self.heading = clock::day_heading(date);
        self.time_slots = Some(slots);
    }

    fn select_slot(&mut self, index: usize, hour: u32, minute: u32) {
        let in_range = self
            .time_slots
            .as_ref()
            .is_some_and(|slots| index < slots.len());
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0).filter(|_| in_range) else {
            return;
        };

        self.current = self.current.date().and_time(time);
        self.selected_slot_index = Some(index);
        self.heading = clock::slot_heading(self.current);
    }

    /// The 42 cells of the displayed month, Sunday first.
    ///
    /// Days before `today` are closed while the current real-world month is
    /// displayed, as are days without any slots.
    pub fn day_cells(&self, today: NaiveDate, availability: Option<&MonthAvailability>) -> Vec<DayCell> {
        let first = clock::first_of_month(self.current.date());
        let day_offset = i64::from(clock::sunday_offset(first)) - 1;
        let days_in_month = i64::from(clock::days_in_month(first.year(), first.month()));
        let is_this_month = today.year() == first.year() && today.month() == first.month();

        (0..GRID_CELLS as i64)
            .map(|i| {
                let day = i - day_offset;
                if day <= 0 || day > days_in_month {
                    return DayCell::Blank;
                }
                let day = day as u32;
                if is_this_month && day < today.day() {
                    return DayCell::Closed(day);
                }
                match availability.map(|month| month.slots_for(day)) {
                    Some(slots) if !slots.is_empty() => DayCell::Open {
                        day,
                        slots: slots.to_vec(),
                    },
                    _ => DayCell::Closed(day),
                }
            })
            .collect()
    }

    pub fn slot_options(&self) -> Vec<SlotOption> {
        self.time_slots
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, slot)| SlotOption {
                index,
                slot: *slot,
                label: slot.label(),
                selected: self.selected_slot_index == Some(index),
            })
            .collect()
    }

    /// The fully resolved booking time for `slot` on the selected day.
    pub fn resolve(&self, slot: TimeSlot) -> SelectedSlot {
        let date = self.current.date();
        SelectedSlot {
            year: date.year(),
            month0: date.month0(),
            day: date.day(),
            hour: slot.hour,
            minute: slot.minute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap()
    }

    fn today() -> NaiveDate {
        now().date()
    }

    fn october() -> MonthAvailability {
        [
            (3, vec![TimeSlot::new(10, 0)]),
            (20, vec![TimeSlot::new(14, 30).with_duration(60), TimeSlot::new(11, 0)]),
            (22, vec![]),
        ]
        .into_iter()
        .collect()
    }

    fn calendar() -> CalendarState {
        CalendarState::new(now(), 0, 5)
    }

    #[test]
    fn starts_on_current_month_grid() {
        let calendar = calendar();
        assert_eq!(calendar.heading(), "October 2026");
        assert_eq!(calendar.view(), CalendarView::MonthGrid);
        assert!(!calendar.can_go_back());
        assert!(calendar.can_go_forward());
        assert_eq!(calendar.selected_slot_index(), None);
    }

    #[test]
    fn increment_then_decrement_round_trips() {
        let mut calendar = calendar();
        for steps in 0..=5 {
            let before = calendar.clone();
            for _ in 0..steps {
                calendar.reduce(CalendarAction::MonthIncremented);
            }
            for _ in 0..steps {
                calendar.reduce(CalendarAction::MonthDecremented);
            }
            assert_eq!(calendar.heading(), before.heading());
            assert_eq!(calendar.offset(), before.offset());
            assert_eq!(calendar.current().date(), before.current().date());
        }
    }

    #[test]
    fn navigation_stops_at_the_bounds() {
        let mut calendar = calendar();
        calendar.reduce(CalendarAction::MonthDecremented);
        assert_eq!(calendar.offset(), 0);

        for _ in 0..8 {
            calendar.reduce(CalendarAction::MonthIncremented);
        }
        assert_eq!(calendar.offset(), 5);
        assert_eq!(calendar.heading(), "March 2027");
        assert!(!calendar.can_go_forward());
        assert!(calendar.can_go_back());
    }

    #[test]
    fn month_change_wraps_at_year_end() {
        let mut calendar = calendar();
        calendar.reduce(CalendarAction::MonthIncremented);
        calendar.reduce(CalendarAction::MonthIncremented);
        assert_eq!(calendar.heading(), "December 2026");
        assert_eq!(
            calendar.month_change(true),
            MonthChange {
                month0: 0,
                previous_month0: 11
            }
        );

        calendar.reduce(CalendarAction::MonthIncremented);
        assert_eq!(calendar.heading(), "January 2027");
        assert_eq!(
            calendar.month_change(false),
            MonthChange {
                month0: 11,
                previous_month0: 0
            }
        );
    }

    #[test]
    fn grid_places_first_day_on_its_weekday() {
        let october = october();
        let cells = calendar().day_cells(today(), Some(&october));
        assert_eq!(cells.len(), GRID_CELLS);

        // 1 October 2026 is a Thursday.
        assert!(cells[..4].iter().all(|cell| *cell == DayCell::Blank));
        assert_eq!(cells[4], DayCell::Closed(1));
        assert_eq!(cells[4 + 30], DayCell::Closed(31));
        assert!(cells[35..].iter().all(|cell| *cell == DayCell::Blank));
    }

    #[test]
    fn past_empty_and_free_days() {
        let october = october();
        let cells = calendar().day_cells(today(), Some(&october));
        let cell = |day: usize| cells[day + 3].clone();

        // Past, even with slots.
        assert_eq!(cell(3), DayCell::Closed(3));
        // Today without slots.
        assert_eq!(cell(19), DayCell::Closed(19));
        assert_eq!(
            cell(20),
            DayCell::Open {
                day: 20,
                slots: october.slots_for(20).to_vec()
            }
        );
        assert_eq!(cell(22), DayCell::Closed(22));

        let no_data = calendar().day_cells(today(), None);
        assert!(!no_data.iter().any(|cell| matches!(cell, DayCell::Open { .. })));
    }

    #[test]
    fn past_rule_only_applies_to_the_current_month() {
        let mut calendar = calendar();
        calendar.reduce(CalendarAction::MonthIncremented);
        let november: MonthAvailability = [(2, vec![TimeSlot::new(9, 0)])].into_iter().collect();

        let cells = calendar.day_cells(today(), Some(&november));
        // 1 November 2026 is a Sunday.
        assert_eq!(cells[0], DayCell::Closed(1));
        assert!(matches!(cells[1], DayCell::Open { day: 2, .. }));
    }

    #[test]
    fn selecting_an_empty_day_changes_nothing() {
        let mut calendar = calendar();
        let before = calendar.clone();
        calendar.reduce(CalendarAction::DaySelected {
            day: 22,
            slots: vec![],
        });
        assert_eq!(calendar, before);
    }

    #[test]
    fn day_then_slot_then_cancel() {
        let october = october();
        let mut calendar = calendar();

        calendar.reduce(CalendarAction::DaySelected {
            day: 20,
            slots: october.slots_for(20).to_vec(),
        });
        assert_eq!(calendar.view(), CalendarView::SlotList);
        assert_eq!(calendar.heading(), "20 October 2026");
        assert!(!calendar.can_go_back());
        assert!(!calendar.can_go_forward());

        let labels: Vec<_> = calendar
            .slot_options()
            .into_iter()
            .map(|option| option.label)
            .collect();
        assert_eq!(labels, ["02:30 PM", "11:00 AM"]);

        calendar.reduce(CalendarAction::SlotSelected {
            index: 0,
            hour: 14,
            minute: 30,
        });
        assert_eq!(calendar.selected_slot_index(), Some(0));
        assert_eq!(calendar.heading(), "20 October 2026 02:30 PM");
        assert!(calendar.slot_options()[0].selected);
        assert_eq!(
            calendar.resolve(TimeSlot::new(14, 30)),
            SelectedSlot {
                year: 2026,
                month0: 9,
                day: 20,
                hour: 14,
                minute: 30
            }
        );

        calendar.reduce(CalendarAction::SlotSelectionCancelled);
        assert_eq!(calendar.view(), CalendarView::MonthGrid);
        assert_eq!(calendar.heading(), "October 2026");
        assert_eq!(calendar.selected_slot_index(), None);
        assert!(calendar.slot_options().is_empty());
    }

    #[test]
    fn cancelling_restores_a_later_month_heading() {
        let mut calendar = calendar();
        calendar.reduce(CalendarAction::MonthIncremented);
        calendar.reduce(CalendarAction::MonthIncremented);
        let heading = calendar.heading().to_string();

        calendar.reduce(CalendarAction::DaySelected {
            day: 31,
            slots: vec![TimeSlot::new(12, 0)],
        });
        assert_eq!(calendar.heading(), "31 December 2026");
        calendar.reduce(CalendarAction::SlotSelectionCancelled);
        assert_eq!(calendar.heading(), heading);
    }

    #[test]
    fn ignores_slot_index_outside_the_list() {
        let mut calendar = calendar();
        calendar.reduce(CalendarAction::DaySelected {
            day: 20,
            slots: vec![TimeSlot::new(9, 0)],
        });
        let before = calendar.clone();
        calendar.reduce(CalendarAction::SlotSelected {
            index: 3,
            hour: 9,
            minute: 0,
        });
        assert_eq!(calendar, before);
    }
}
