use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

use crate::clock::Clock;
use crate::constants::NOMINAL_SPEED;
use crate::error::LoadError;
use crate::models::{
    RunningStatus, Section, Station, Timetable, Train, TrainDirection, TrainPosition,
};
use crate::records::TrainServiceRecord;
use crate::source::TimetableSource;
use crate::time::{minutes_between, minutes_to_hours, parse_time_hm};

/// One resolved stop record: the station it belongs to and its times anchored
/// to the service date, before any midnight correction.
#[derive(Debug)]
pub struct RawStop {
    pub station: Arc<Station>,
    pub arrival: NaiveDateTime,
    pub departure: NaiveDateTime,
}

/// Loader output: the schedule-less timetable skeleton plus the train's raw
/// stops in encounter order.
#[derive(Debug)]
pub struct RawSchedule {
    pub timetable: Timetable,
    pub stops: Vec<RawStop>,
}

/// Resolves a train's stop records against the section and anchors the bare
/// HH:MM times to the service date.
pub struct ScheduleLoader<'a> {
    source: &'a dyn TimetableSource,
    section: &'a Section,
}

impl<'a> ScheduleLoader<'a> {
    #[must_use]
    pub fn new(source: &'a dyn TimetableSource, section: &'a Section) -> Self {
        Self { source, section }
    }

    /// # Errors
    ///
    /// Fails when the train has no stop records, a stop names a station that
    /// is not on the section, or a time field does not parse.
    pub fn load(
        &self,
        train_number: &str,
        direction: TrainDirection,
        service_date: NaiveDate,
    ) -> Result<RawSchedule, LoadError> {
        let records = self.source.stops(train_number)?;
        if records.is_empty() {
            return Err(LoadError::NoStops(train_number.to_string()));
        }
        let stops = records
            .iter()
            .map(|record| {
                let station = self
                    .section
                    .station(&record.code)
                    .ok_or_else(|| LoadError::UnknownStation(record.code.clone()))?;
                Ok(RawStop {
                    station: Arc::clone(station),
                    arrival: service_date.and_time(parse_hm(&record.arrival_time)?),
                    departure: service_date.and_time(parse_hm(&record.departure_time)?),
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        Ok(RawSchedule {
            timetable: Timetable::new(self.section.stations(), direction),
            stops,
        })
    }
}

fn parse_hm(value: &str) -> Result<NaiveTime, LoadError> {
    parse_time_hm(value).map_err(|source| LoadError::InvalidTime {
        value: value.to_string(),
        source,
    })
}

/// Wraps the loader and replays its raw stops through the timetable in
/// encounter order, which applies the midnight date corrections.
pub struct OvernightCorrector<'a> {
    loader: ScheduleLoader<'a>,
}

impl<'a> OvernightCorrector<'a> {
    #[must_use]
    pub fn new(loader: ScheduleLoader<'a>) -> Self {
        Self { loader }
    }

    /// # Errors
    ///
    /// Propagates the loader's errors.
    pub fn load(
        &self,
        train_number: &str,
        direction: TrainDirection,
        service_date: NaiveDate,
    ) -> Result<Timetable, LoadError> {
        let RawSchedule {
            mut timetable,
            stops,
        } = self.loader.load(train_number, direction, service_date)?;
        for stop in stops {
            timetable.update(&stop.station, stop.arrival, stop.departure);
        }
        Ok(timetable)
    }
}

/// Builds ready-to-run trains: loads and corrects the timetable, checks the
/// boundary stops, and works out where the train is right now.
pub struct TrainFactory<'a> {
    source: &'a dyn TimetableSource,
    section: &'a Section,
    clock: &'a dyn Clock,
}

impl<'a> TrainFactory<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn TimetableSource,
        section: &'a Section,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            source,
            section,
            clock,
        }
    }

    /// Build the train described by a section-file service line.
    ///
    /// # Errors
    ///
    /// Fails on an unknown direction string, missing or malformed stop data,
    /// or a train that does not stop at both boundary stations.
    pub fn create(&self, record: &TrainServiceRecord) -> Result<Train, LoadError> {
        let direction: TrainDirection = record.direction.parse()?;
        let now = self.clock.now();
        log::debug!("loading data for train {}", record.number);
        let corrector = OvernightCorrector::new(ScheduleLoader::new(self.source, self.section));
        let timetable = corrector.load(&record.number, direction, now.date())?;
        check_boundary_stops(&record.number, &timetable)?;
        let position = initial_position(&timetable, direction, self.section.length(), now);
        Ok(Train::new(
            record.number.clone(),
            record.name.clone(),
            direction,
            Arc::new(timetable),
            position,
        ))
    }
}

fn check_boundary_stops(train_number: &str, timetable: &Timetable) -> Result<(), LoadError> {
    let boundaries = [timetable.entries().next(), timetable.entries().last()];
    for (station, schedule) in boundaries.into_iter().flatten() {
        if schedule.is_none() {
            return Err(LoadError::MissingBoundaryStop {
                train: train_number.to_string(),
                station: station.code().to_string(),
            });
        }
    }
    Ok(())
}

/// Where a train is at `now`, judged from its corrected timetable.
///
/// In priority order: short of the section, already past it, halted at a
/// stop, or crossing between two stops. A crossing uses the expected speed
/// between the surrounding stops; a train heading home counts its distance
/// down from the far end of the section. Elapsed times are taken in whole
/// minutes.
///
/// # Panics
///
/// Panics when `now` fits none of the cases, which cannot happen for a
/// timetable whose boundary stations are scheduled stops.
#[must_use]
pub fn initial_position(
    timetable: &Timetable,
    direction: TrainDirection,
    section_length: u32,
    now: NaiveDateTime,
) -> TrainPosition {
    let entry = timetable.section_entry_time();
    if now < entry {
        return TrainPosition {
            status: RunningStatus::RunningBetween,
            distance_from_home: nominal_distance(minutes_between(now, entry)),
        };
    }
    let exit = timetable.section_exit_time();
    if now > exit {
        return TrainPosition {
            status: RunningStatus::RunningBetween,
            distance_from_home: nominal_distance(minutes_between(exit, now)),
        };
    }
    if let Some(station) = timetable.station_halted_at(now) {
        return TrainPosition {
            status: RunningStatus::ScheduledStop,
            distance_from_home: f64::from(station.distance_from_home()),
        };
    }
    if let Some((previous, next)) = timetable.stations_travelling_between(now) {
        if let (Some(departed), Some(arriving)) = (
            timetable.schedule_for(previous),
            timetable.schedule_for(next),
        ) {
            let crossing_length = f64::from(
                arriving
                    .distance_from_home
                    .abs_diff(departed.distance_from_home),
            );
            let scheduled_hours =
                minutes_to_hours(minutes_between(departed.departure, arriving.arrival));
            let expected_speed = crossing_length / scheduled_hours;
            let travelled =
                expected_speed * minutes_to_hours(minutes_between(departed.departure, now));
            let distance_from_home = match direction {
                TrainDirection::AwayFromHome => travelled,
                TrainDirection::TowardsHome => f64::from(section_length) - travelled,
            };
            return TrainPosition {
                status: RunningStatus::RunningBetween,
                distance_from_home,
            };
        }
    }
    panic!("time {now} does not fall in any position case of the timetable");
}

fn nominal_distance(minutes: i64) -> f64 {
    NOMINAL_SPEED * minutes_to_hours(minutes)
}
