use serde::Serialize;

use crate::models::{RunningStatus, SignalAspect, Station, Train, TrainDirection};

/// Point-in-time view of one train, safe to hand to a display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainSnapshot {
    pub number: String,
    pub name: String,
    pub direction: TrainDirection,
    pub status: RunningStatus,
    pub distance_from_home: f64,
}

impl TrainSnapshot {
    #[must_use]
    pub fn of(train: &Train) -> Self {
        let position = train.position();
        Self {
            number: train.number().to_string(),
            name: train.name().to_string(),
            direction: train.direction(),
            status: position.status,
            distance_from_home: position.distance_from_home,
        }
    }
}

/// Point-in-time view of one station and its signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationSnapshot {
    pub code: String,
    pub name: String,
    pub distance_from_home: u32,
    pub towards_home_aspect: SignalAspect,
    pub away_from_home_aspect: SignalAspect,
}

impl StationSnapshot {
    #[must_use]
    pub fn of(station: &Station) -> Self {
        let [towards_home_aspect, away_from_home_aspect] = station.aspects();
        Self {
            code: station.code().to_string(),
            name: station.name().to_string(),
            distance_from_home: station.distance_from_home(),
            towards_home_aspect,
            away_from_home_aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Timetable, TrainPosition};
    use std::sync::Arc;

    #[test]
    fn test_train_snapshot_reflects_the_live_position() {
        let stations = vec![
            Arc::new(Station::new("CAL", "Calicut", 0, 3).expect("valid station")),
            Arc::new(Station::new("SRR", "Shoranur", 86, 3).expect("valid station")),
        ];
        let timetable = Arc::new(Timetable::new(&stations, TrainDirection::AwayFromHome));
        let train = Train::new(
            "2653",
            "Mangala Lakshadweep Express",
            TrainDirection::AwayFromHome,
            timetable,
            TrainPosition {
                status: RunningStatus::RunningBetween,
                distance_from_home: 7.5,
            },
        );
        train.shared_position().write().expect("position lock").distance_from_home = 12.0;

        let snapshot = TrainSnapshot::of(&train);
        assert_eq!(snapshot.number, "2653");
        assert_eq!(snapshot.direction, TrainDirection::AwayFromHome);
        assert_eq!(snapshot.status, RunningStatus::RunningBetween);
        assert_eq!(snapshot.distance_from_home, 12.0);
    }

    #[test]
    fn test_station_snapshot_carries_current_aspects() {
        let station = Station::new("TIR", "Tirur", 41, 2).expect("valid station");
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Proceed);

        let snapshot = StationSnapshot::of(&station);
        assert_eq!(snapshot.code, "TIR");
        assert_eq!(snapshot.distance_from_home, 41);
        assert_eq!(snapshot.towards_home_aspect, SignalAspect::Stop);
        assert_eq!(snapshot.away_from_home_aspect, SignalAspect::Proceed);
    }
}
