use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use std::sync::Arc;

use super::{Station, TrainDirection, TrainSchedule};

#[derive(Debug)]
struct TimetableEntry {
    station: Arc<Station>,
    schedule: Option<TrainSchedule>,
}

/// A train's encounter-ordered view of the section: every station in the
/// order the train meets it, carrying a stop schedule where the train halts
/// and nothing where it passes through.
#[derive(Debug)]
pub struct Timetable {
    direction: TrainDirection,
    entries: IndexMap<String, TimetableEntry>,
}

impl Timetable {
    /// Entries are ordered by distance from home, ascending for trains
    /// heading away and descending for trains heading home.
    #[must_use]
    pub fn new(stations: &[Arc<Station>], direction: TrainDirection) -> Self {
        let mut ordered = stations.to_vec();
        ordered.sort_by_key(|station| station.distance_from_home());
        if direction == TrainDirection::TowardsHome {
            ordered.reverse();
        }
        let entries = ordered
            .into_iter()
            .map(|station| {
                (
                    station.code().to_string(),
                    TimetableEntry {
                        station,
                        schedule: None,
                    },
                )
            })
            .collect();
        Self { direction, entries }
    }

    #[must_use]
    pub const fn direction(&self) -> TrainDirection {
        self.direction
    }

    /// Insert or replace the stop schedule for `station`, correcting calendar
    /// dates for runs that cross midnight:
    ///
    /// 1. a departure before its own arrival belongs to the next day;
    /// 2. an arrival before the departure of the nearest earlier stop means
    ///    midnight passed before this stop was reached, so both its times
    ///    move a day forward.
    ///
    /// Stops must be inserted in the order the train encounters them; rule 2
    /// only consults stops already inserted.
    ///
    /// # Panics
    ///
    /// Panics if `station` is not part of this timetable.
    pub fn update(&mut self, station: &Station, arrival: NaiveDateTime, departure: NaiveDateTime) {
        let Some(index) = self.entries.get_index_of(station.code()) else {
            panic!("station '{}' is not on this timetable", station.code());
        };

        let mut arrival = arrival;
        let mut departure = departure;
        if departure < arrival {
            departure += Duration::days(1);
        }
        if let Some(previous) = self.last_scheduled_before(index) {
            if previous.departure > arrival {
                arrival += Duration::days(1);
                departure += Duration::days(1);
            }
        }

        let entry = &mut self.entries[index];
        entry.schedule = Some(TrainSchedule {
            station_code: entry.station.code().to_string(),
            arrival,
            departure,
            distance_from_home: entry.station.distance_from_home(),
        });
    }

    fn last_scheduled_before(&self, index: usize) -> Option<&TrainSchedule> {
        (0..index).rev().find_map(|earlier| {
            self.entries
                .get_index(earlier)
                .and_then(|(_, entry)| entry.schedule.as_ref())
        })
    }

    /// Arrival time at the first station of the run.
    ///
    /// # Panics
    ///
    /// Panics when the first station carries no schedule; a fully built train
    /// always stops at both boundary stations.
    #[must_use]
    pub fn section_entry_time(&self) -> NaiveDateTime {
        match self.entries.first().and_then(|(_, entry)| entry.schedule.as_ref()) {
            Some(schedule) => schedule.arrival,
            None => panic!("timetable has no schedule at its first station"),
        }
    }

    /// Departure time from the last station of the run.
    ///
    /// # Panics
    ///
    /// Panics when the last station carries no schedule.
    #[must_use]
    pub fn section_exit_time(&self) -> NaiveDateTime {
        match self.entries.last().and_then(|(_, entry)| entry.schedule.as_ref()) {
            Some(schedule) => schedule.departure,
            None => panic!("timetable has no schedule at its last station"),
        }
    }

    /// Station whose stop interval contains `at`, inclusive at both ends.
    #[must_use]
    pub fn station_halted_at(&self, at: NaiveDateTime) -> Option<&Arc<Station>> {
        self.entries.values().find_map(|entry| {
            let schedule = entry.schedule.as_ref()?;
            (schedule.arrival <= at && at <= schedule.departure).then_some(&entry.station)
        })
    }

    /// The consecutive pair of stops the train is between at `at`, exclusive
    /// at both ends. Pass-through stations do not break a crossing.
    #[must_use]
    pub fn stations_travelling_between(
        &self,
        at: NaiveDateTime,
    ) -> Option<(&Arc<Station>, &Arc<Station>)> {
        let stops: Vec<&TimetableEntry> = self
            .entries
            .values()
            .filter(|entry| entry.schedule.is_some())
            .collect();
        stops.windows(2).find_map(|pair| {
            let departed = pair[0].schedule.as_ref()?.departure;
            let arriving = pair[1].schedule.as_ref()?.arrival;
            (departed < at && at < arriving).then_some((&pair[0].station, &pair[1].station))
        })
    }

    /// Stop schedule at `station`, `None` where the train passes through.
    #[must_use]
    pub fn schedule_for(&self, station: &Station) -> Option<&TrainSchedule> {
        self.entries.get(station.code())?.schedule.as_ref()
    }

    /// Stations in encounter order with their stop schedules.
    pub fn entries(&self) -> impl Iterator<Item = (&Arc<Station>, Option<&TrainSchedule>)> {
        self.entries
            .values()
            .map(|entry| (&entry.station, entry.schedule.as_ref()))
    }
}
