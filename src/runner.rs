use std::sync::{Arc, PoisonError};

use crate::clock::Clock;
use crate::constants::NOMINAL_SPEED;
use crate::models::{SharedPosition, Timetable};

/// Advances one train's position from the clock.
///
/// Movement is nominal: distance grows at `NOMINAL_SPEED` from the moment
/// the train enters the section, ignoring stops and direction. The running
/// status set at creation is left alone.
pub struct TrainRunner {
    number: String,
    timetable: Arc<Timetable>,
    position: SharedPosition,
    clock: Arc<dyn Clock>,
}

impl TrainRunner {
    #[must_use]
    pub fn new(
        number: String,
        timetable: Arc<Timetable>,
        position: SharedPosition,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            number,
            timetable,
            position,
            clock,
        }
    }

    /// One movement step. Does nothing until the train has entered the
    /// section.
    pub fn tick(&self) {
        let now = self.clock.now();
        let entry = self.timetable.section_entry_time();
        if now <= entry {
            return;
        }
        let elapsed_seconds = (now - entry).num_seconds();
        #[allow(clippy::cast_precision_loss)]
        let distance = NOMINAL_SPEED * elapsed_seconds as f64 / 3600.0;
        {
            let mut position = self
                .position
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            position.distance_from_home = distance;
        }
        log::trace!("train {} moved to {distance:.3}", self.number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{RunningStatus, Station, TrainDirection, TrainPosition};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::RwLock;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    fn runner_at(now: NaiveDateTime, initial: TrainPosition) -> (TrainRunner, SharedPosition) {
        let stations = vec![
            Arc::new(Station::new("CAL", "Calicut", 0, 3).expect("valid station")),
            Arc::new(Station::new("SRR", "Shoranur", 86, 3).expect("valid station")),
        ];
        let mut timetable = Timetable::new(&stations, TrainDirection::AwayFromHome);
        timetable.update(&stations[0], at(5, 0), at(5, 5));
        timetable.update(&stations[1], at(6, 0), at(6, 5));

        let position: SharedPosition = Arc::new(RwLock::new(initial));
        let runner = TrainRunner::new(
            "2653".to_string(),
            Arc::new(timetable),
            Arc::clone(&position),
            Arc::new(FixedClock::new(now)),
        );
        (runner, position)
    }

    fn read(position: &SharedPosition) -> TrainPosition {
        *position.read().expect("position lock")
    }

    #[test]
    fn test_no_movement_before_entry() {
        let initial = TrainPosition {
            status: RunningStatus::RunningBetween,
            distance_from_home: 10.0,
        };
        let (runner, position) = runner_at(at(4, 50), initial);
        runner.tick();
        assert!((read(&position).distance_from_home - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_movement_at_exact_entry() {
        let initial = TrainPosition {
            status: RunningStatus::RunningBetween,
            distance_from_home: 0.0,
        };
        let (runner, position) = runner_at(at(5, 0), initial);
        runner.tick();
        assert!((read(&position).distance_from_home - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_follows_elapsed_time() {
        let initial = TrainPosition {
            status: RunningStatus::RunningBetween,
            distance_from_home: 0.0,
        };
        let (runner, position) = runner_at(at(5, 25), initial);
        runner.tick();
        // 1500 seconds past entry at 60 units per hour.
        assert!((read(&position).distance_from_home - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_is_left_alone() {
        let initial = TrainPosition {
            status: RunningStatus::ScheduledStop,
            distance_from_home: 0.0,
        };
        let (runner, position) = runner_at(at(5, 25), initial);
        runner.tick();
        assert_eq!(read(&position).status, RunningStatus::ScheduledStop);
    }
}
