// libs/scheduling-cell/src/store.rs
use chrono::{Duration, NaiveDateTime};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{Appointment, Category, NewAppointment, ScheduleError, ShiftOffsets};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Boundary-inclusive overlap test on closed intervals: two appointments
/// conflict even when they merely touch at an endpoint.
pub fn intervals_overlap(
    start1: NaiveDateTime,
    end1: NaiveDateTime,
    start2: NaiveDateTime,
    end2: NaiveDateTime,
) -> bool {
    end1 >= start2 && start1 <= end2
}

/// Converts a signed fractional day count into an exact sub-day duration,
/// rounded to whole seconds. `None` when the offset exceeds what a
/// `Duration` can represent; the float-to-int cast saturates first.
fn day_offset(days: f64) -> Option<Duration> {
    Duration::try_seconds((days * SECONDS_PER_DAY).round() as i64)
}

#[derive(Debug)]
struct StoreState {
    appointments: Vec<Appointment>,
    next_id: i64,
}

/// Owner of the appointment collection. Enforces id uniqueness, `start <= end`
/// and the no-overlap invariant; every mutating operation validates against a
/// consistent view and commits under the same write lock, so a failed call
/// leaves the collection and the id counter untouched.
#[derive(Debug)]
pub struct AppointmentStore {
    state: RwLock<StoreState>,
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                appointments: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of the collection, optionally restricted to one category.
    ///
    /// An unfiltered empty store lists successfully as an empty sequence; a
    /// filter matching nothing is `NotFound`.
    pub async fn list(&self, filter: Option<Category>) -> Result<Vec<Appointment>, ScheduleError> {
        let state = self.state.read().await;

        match filter {
            None => Ok(state.appointments.clone()),
            Some(category) => {
                let matches: Vec<Appointment> = state
                    .appointments
                    .iter()
                    .filter(|appt| appt.category == category)
                    .cloned()
                    .collect();

                if matches.is_empty() {
                    return Err(ScheduleError::no_appointments_for_category());
                }
                Ok(matches)
            }
        }
    }

    /// Inserts a new appointment, assigning the next monotonic id. Ids are
    /// never reused, even after deletes.
    pub async fn insert(&self, new: NewAppointment) -> Result<Appointment, ScheduleError> {
        let mut state = self.state.write().await;

        validate_range(new.start, new.end)?;

        if let Some(existing) = find_overlap(&state.appointments, new.start, new.end, None) {
            warn!(
                "Insert of '{}' conflicts with appointment {}",
                new.title, existing.id
            );
            return Err(ScheduleError::Conflict);
        }

        let appointment = Appointment {
            id: state.next_id,
            title: new.title,
            start: new.start,
            end: new.end,
            category: new.category,
        };
        state.next_id += 1;
        state.appointments.push(appointment.clone());

        debug!("Inserted appointment {}", appointment.id);
        Ok(appointment)
    }

    /// Full replace of title/start/end/category, keeping the id. The overlap
    /// scan skips the target's own slot.
    pub async fn update(
        &self,
        id: i64,
        new: NewAppointment,
    ) -> Result<Appointment, ScheduleError> {
        let mut state = self.state.write().await;

        let target_index = state
            .appointments
            .iter()
            .position(|appt| appt.id == id)
            .ok_or_else(ScheduleError::appointment_not_found)?;

        validate_range(new.start, new.end)?;

        if let Some(existing) = find_overlap(&state.appointments, new.start, new.end, Some(id)) {
            warn!(
                "Update of appointment {} conflicts with appointment {}",
                id, existing.id
            );
            return Err(ScheduleError::Conflict);
        }

        let target = &mut state.appointments[target_index];
        target.title = new.title;
        target.start = new.start;
        target.end = new.end;
        target.category = new.category;

        debug!("Updated appointment {}", id);
        Ok(target.clone())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;

        let index = state
            .appointments
            .iter()
            .position(|appt| appt.id == id)
            .ok_or_else(ScheduleError::appointment_not_found)?;
        state.appointments.remove(index);

        debug!("Deleted appointment {}", id);
        Ok(())
    }

    /// Translates the target's start and end by independent signed day
    /// offsets, validating the candidate interval before committing.
    ///
    /// Failure order is fixed: unknown id, then malformed offsets, then an
    /// inverted candidate range, then a conflict with another appointment.
    pub async fn shift(
        &self,
        id: i64,
        offsets: ShiftOffsets,
    ) -> Result<Appointment, ScheduleError> {
        let mut state = self.state.write().await;

        let target_index = state
            .appointments
            .iter()
            .position(|appt| appt.id == id)
            .ok_or_else(ScheduleError::appointment_not_found)?;

        let (start_days, end_days) = match (offsets.start_days, offsets.end_days) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ScheduleError::InvalidInput(
                    "Invalid amount. Must be a number.".to_string(),
                ))
            }
        };

        let target = &state.appointments[target_index];
        let new_start = day_offset(start_days)
            .and_then(|offset| target.start.checked_add_signed(offset))
            .ok_or_else(shift_out_of_range)?;
        let new_end = day_offset(end_days)
            .and_then(|offset| target.end.checked_add_signed(offset))
            .ok_or_else(shift_out_of_range)?;

        if new_start > new_end {
            return Err(ScheduleError::InvalidRange);
        }

        if let Some(existing) = find_overlap(&state.appointments, new_start, new_end, Some(id)) {
            warn!(
                "Shift of appointment {} conflicts with appointment {}",
                id, existing.id
            );
            return Err(ScheduleError::Conflict);
        }

        let target = &mut state.appointments[target_index];
        target.start = new_start;
        target.end = new_end;

        debug!("Shifted appointment {} to {} .. {}", id, new_start, new_end);
        Ok(target.clone())
    }
}

fn shift_out_of_range() -> ScheduleError {
    ScheduleError::InvalidInput("Shift amount out of range".to_string())
}

fn validate_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ScheduleError> {
    if start > end {
        return Err(ScheduleError::InvalidInput(
            "Appointment start must not be after end".to_string(),
        ));
    }
    Ok(())
}

/// Scans for the first stored appointment whose closed interval intersects
/// `[start, end]`, skipping `exclude_id` so update/shift never compare the
/// target against itself.
fn find_overlap(
    appointments: &[Appointment],
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_id: Option<i64>,
) -> Option<&Appointment> {
    appointments
        .iter()
        .filter(|appt| Some(appt.id) != exclude_id)
        .find(|appt| intervals_overlap(start, end, appt.start, appt.end))
}
