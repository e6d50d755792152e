use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One scheduled stop: when a train arrives at and departs from a station,
/// and how far along the section that station sits.
///
/// The distance is copied from the station at load time so the schedule can
/// be read without going back to the section model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSchedule {
    pub station_code: String,
    pub arrival: NaiveDateTime,
    pub departure: NaiveDateTime,
    pub distance_from_home: u32,
}
