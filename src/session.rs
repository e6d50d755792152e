use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::sync::Arc;

use crate::clock::Clock;
use crate::constants::{OVERNIGHT_ENTRY_HOUR, OVERNIGHT_EXIT_HOUR, TICK_PERIOD};
use crate::error::LoadError;
use crate::factory::TrainFactory;
use crate::models::{
    OperatingDays, Section, SignalAspect, Station, SubscriptionId, Train, TrainDirection,
};
use crate::records::{SectionRecord, TrainServiceRecord};
use crate::runner::TrainRunner;
use crate::scheduler::TickScheduler;
use crate::snapshot::{StationSnapshot, TrainSnapshot};
use crate::source::TimetableSource;
use crate::time::parse_time_hm;

/// A running game: the section under control, the trains active right now
/// and the background task keeping their positions fresh.
pub struct GameSession {
    section: Section,
    trains: Vec<Arc<Train>>,
    subscriptions: Vec<(Arc<Station>, TrainDirection, SubscriptionId)>,
    scheduler: TickScheduler,
}

impl GameSession {
    /// Load the section, pick the trains active at the clock's current time
    /// and start their position tasks.
    ///
    /// Section problems are fatal. A listed train that cannot be built is
    /// logged and left out.
    ///
    /// # Errors
    ///
    /// Returns the error for an unreadable or invalid section definition.
    pub fn start(source: &dyn TimetableSource, clock: Arc<dyn Clock>) -> Result<Self, LoadError> {
        let record = source.section()?;
        let section = build_section(&record)?;
        log::info!(
            "starting session on section {} with {} stations",
            section.name(),
            section.stations().len()
        );

        let now = clock.now();
        let factory = TrainFactory::new(source, &section, clock.as_ref());
        let mut trains = Vec::new();
        for service in &record.trains {
            match select_train(&factory, service, now) {
                Ok(Some(train)) => trains.push(Arc::new(train)),
                Ok(None) => {}
                Err(error) => log::warn!("skipping train {}: {error}", service.number),
            }
        }
        log::info!(
            "{} of {} listed trains are active now",
            trains.len(),
            record.trains.len()
        );

        let mut subscriptions = Vec::new();
        for train in &trains {
            for station in section.stations() {
                let id = station.subscribe(train.direction(), train);
                subscriptions.push((Arc::clone(station), train.direction(), id));
            }
        }

        let scheduler = TickScheduler::new();
        for train in &trains {
            let runner = TrainRunner::new(
                train.number().to_string(),
                Arc::clone(train.timetable()),
                train.shared_position(),
                Arc::clone(&clock),
            );
            let label = format!("train {}", train.number());
            let _ = scheduler.schedule(label, TICK_PERIOD, move || runner.tick());
        }

        Ok(Self {
            section,
            trains,
            subscriptions,
            scheduler,
        })
    }

    #[must_use]
    pub fn section(&self) -> &Section {
        &self.section
    }

    #[must_use]
    pub fn trains(&self) -> &[Arc<Train>] {
        &self.trains
    }

    #[must_use]
    pub fn train_snapshots(&self) -> Vec<TrainSnapshot> {
        self.trains
            .iter()
            .map(|train| TrainSnapshot::of(train))
            .collect()
    }

    #[must_use]
    pub fn station_snapshots(&self) -> Vec<StationSnapshot> {
        self.section
            .stations()
            .iter()
            .map(|station| StationSnapshot::of(station))
            .collect()
    }

    /// Set both directional aspects at the station called `station_name`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnknownStation` when no station has that name.
    pub fn set_station_aspect(
        &self,
        station_name: &str,
        towards_home: SignalAspect,
        away_from_home: SignalAspect,
    ) -> Result<(), LoadError> {
        let station = self
            .section
            .station_by_name(station_name)
            .ok_or_else(|| LoadError::UnknownStation(station_name.to_string()))?;
        station.set_aspect(TrainDirection::TowardsHome, towards_home);
        station.set_aspect(TrainDirection::AwayFromHome, away_from_home);
        Ok(())
    }

    /// Stop the position tasks and detach the trains from the signals. Safe
    /// to call more than once.
    pub fn stop(&mut self) {
        self.scheduler.shutdown();
        for (station, direction, id) in self.subscriptions.drain(..) {
            station.unsubscribe(direction, id);
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn build_section(record: &SectionRecord) -> Result<Section, LoadError> {
    let stations = record
        .stations
        .iter()
        .map(|station| {
            Station::new(
                station.code.clone(),
                station.name.clone(),
                station.distance_from_home,
                station.no_of_tracks,
            )
        })
        .collect::<Result<Vec<_>, LoadError>>()?;
    Section::new(record.name.clone(), stations)
}

fn select_train(
    factory: &TrainFactory<'_>,
    service: &TrainServiceRecord,
    now: NaiveDateTime,
) -> Result<Option<Train>, LoadError> {
    let days = OperatingDays::parse(&service.day_of_arrival)?;
    if !days.runs_on(now.date().weekday()) {
        log::debug!("train {} does not run today", service.number);
        return Ok(None);
    }
    let (entry, leave) = active_window(service, now.date())?;
    let inside_window = entry < now && now < leave;
    if !inside_window {
        log::debug!("train {} is outside its active window", service.number);
        return Ok(None);
    }
    factory.create(service).map(Some)
}

/// The service's advertised span in the section today, exclusive at both
/// ends. A window that opens late in the evening and closes in the small
/// hours runs past midnight, so its close moves to the next day.
fn active_window(
    service: &TrainServiceRecord,
    today: NaiveDate,
) -> Result<(NaiveDateTime, NaiveDateTime), LoadError> {
    let entry = today.and_time(parse_field(&service.section_entry_time)?);
    let mut leave = today.and_time(parse_field(&service.section_leaving_time)?);
    if entry.hour() >= OVERNIGHT_ENTRY_HOUR && leave.hour() <= OVERNIGHT_EXIT_HOUR {
        leave += Duration::days(1);
    }
    Ok((entry, leave))
}

fn parse_field(value: &str) -> Result<NaiveTime, LoadError> {
    parse_time_hm(value).map_err(|source| LoadError::InvalidTime {
        value: value.to_string(),
        source,
    })
}
