use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use super::{
    AspectChange, SignalAspect, SignalObserver, SubscriptionId, Track, TrainDirection,
};
use crate::error::LoadError;

type Subscriber = (SubscriptionId, Weak<dyn SignalObserver>);

/// A station on the section: fixed identity plus the live signalling state
/// shown to each direction of travel.
///
/// Aspects are modelled per track but set station-wide, and every aspect
/// defaults to Stop. The aspect state and the observer registry sit behind
/// interior mutability so a shared `&Station` can be driven from the control
/// panel while snapshot readers and observers run elsewhere; notifications
/// are delivered under the registry lock, so a callback never races a
/// concurrent `set_aspect`.
#[derive(Debug)]
pub struct Station {
    code: String,
    name: String,
    distance_from_home: u32,
    tracks: RwLock<Vec<Track>>,
    observers: Mutex<[Vec<Subscriber>; 2]>,
}

impl Station {
    /// Build a station with the standard track layout for `track_count`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidTrackCount` when `track_count` is outside
    /// 1..=3.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        distance_from_home: u32,
        track_count: u32,
    ) -> Result<Self, LoadError> {
        let code = code.into();
        let tracks = Track::layout(track_count).ok_or(LoadError::InvalidTrackCount {
            code: code.clone(),
            count: track_count,
        })?;
        Ok(Self {
            code,
            name: name.into(),
            distance_from_home,
            tracks: RwLock::new(tracks),
            observers: Mutex::new([Vec::new(), Vec::new()]),
        })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn distance_from_home(&self) -> u32 {
        self.distance_from_home
    }

    /// Snapshot of the station's tracks.
    #[must_use]
    pub fn tracks(&self) -> Vec<Track> {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current aspects as `[towards home, away from home]`.
    #[must_use]
    pub fn aspects(&self) -> [SignalAspect; 2] {
        let tracks = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        let pair = tracks[0].aspects;
        [pair.towards_home, pair.away_from_home]
    }

    /// Set the aspect shown to `direction` on every track, then notify that
    /// direction's subscribers. Setting the value already shown notifies
    /// nobody.
    pub fn set_aspect(&self, direction: TrainDirection, aspect: SignalAspect) {
        let previous = {
            let mut tracks = self.tracks.write().unwrap_or_else(PoisonError::into_inner);
            let previous = tracks[0].aspects.get(direction);
            if previous == aspect {
                return;
            }
            for track in tracks.iter_mut() {
                track.aspects.set(direction, aspect);
            }
            previous
        };
        self.notify(&AspectChange {
            station: self.code.clone(),
            direction,
            previous,
            current: aspect,
        });
    }

    /// Register `observer` for aspect changes in `direction` only.
    ///
    /// The registry holds a weak reference; observers dropped elsewhere are
    /// pruned on the next notification.
    pub fn subscribe<T>(&self, direction: TrainDirection, observer: &Arc<T>) -> SubscriptionId
    where
        T: SignalObserver + 'static,
    {
        let id = SubscriptionId::new();
        let weak = Arc::downgrade(observer);
        let weak: Weak<dyn SignalObserver> = weak;
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers[direction.index()].push((id, weak));
        id
    }

    /// Remove a subscription; unknown ids are ignored.
    pub fn unsubscribe(&self, direction: TrainDirection, id: SubscriptionId) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers[direction.index()].retain(|(subscription, _)| *subscription != id);
    }

    fn notify(&self, change: &AspectChange) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers[change.direction.index()].retain(|(_, weak)| match weak.upgrade() {
            Some(observer) => {
                observer.aspect_changed(change);
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackKind;

    struct Recorder {
        changes: Mutex<Vec<AspectChange>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                changes: Mutex::new(Vec::new()),
            })
        }

        fn changes(&self) -> Vec<AspectChange> {
            self.changes.lock().expect("recorder lock").clone()
        }
    }

    impl SignalObserver for Recorder {
        fn aspect_changed(&self, change: &AspectChange) {
            self.changes.lock().expect("recorder lock").push(change.clone());
        }
    }

    fn station() -> Station {
        Station::new("TIR", "Tirur", 41, 3).expect("valid station")
    }

    #[test]
    fn test_new_station_shows_stop_everywhere() {
        let station = station();
        assert_eq!(station.aspects(), [SignalAspect::Stop, SignalAspect::Stop]);
        let tracks = station.tracks();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].kind, TrackKind::Main);
    }

    #[test]
    fn test_invalid_track_count_is_rejected() {
        let err = Station::new("BIG", "Too Big", 10, 4);
        assert!(matches!(
            err,
            Err(LoadError::InvalidTrackCount { count: 4, .. })
        ));
    }

    #[test]
    fn test_set_aspect_is_scoped_to_direction() {
        let station = station();
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Caution);
        assert_eq!(
            station.aspects(),
            [SignalAspect::Stop, SignalAspect::Caution]
        );
        station.set_aspect(TrainDirection::TowardsHome, SignalAspect::Proceed);
        assert_eq!(
            station.aspects(),
            [SignalAspect::Proceed, SignalAspect::Caution]
        );
    }

    #[test]
    fn test_set_aspect_applies_to_every_track() {
        let station = station();
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Proceed);
        for track in station.tracks() {
            assert_eq!(track.aspects.away_from_home, SignalAspect::Proceed);
            assert_eq!(track.aspects.towards_home, SignalAspect::Stop);
        }
    }

    #[test]
    fn test_observer_sees_old_and_new_aspect() {
        let station = station();
        let recorder = Recorder::new();
        station.subscribe(TrainDirection::TowardsHome, &recorder);

        station.set_aspect(TrainDirection::TowardsHome, SignalAspect::Caution);

        let changes = recorder.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].station, "TIR");
        assert_eq!(changes[0].direction, TrainDirection::TowardsHome);
        assert_eq!(changes[0].previous, SignalAspect::Stop);
        assert_eq!(changes[0].current, SignalAspect::Caution);
    }

    #[test]
    fn test_observer_never_sees_other_direction() {
        let station = station();
        let recorder = Recorder::new();
        station.subscribe(TrainDirection::TowardsHome, &recorder);

        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Proceed);

        assert!(recorder.changes().is_empty());
    }

    #[test]
    fn test_unchanged_aspect_notifies_nobody() {
        let station = station();
        let recorder = Recorder::new();
        station.subscribe(TrainDirection::AwayFromHome, &recorder);

        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Stop);

        assert!(recorder.changes().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_deliveries() {
        let station = station();
        let recorder = Recorder::new();
        let id = station.subscribe(TrainDirection::AwayFromHome, &recorder);

        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Caution);
        station.unsubscribe(TrainDirection::AwayFromHome, id);
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Proceed);

        assert_eq!(recorder.changes().len(), 1);
    }

    #[test]
    fn test_dropped_observer_is_pruned() {
        let station = station();
        let recorder = Recorder::new();
        station.subscribe(TrainDirection::AwayFromHome, &recorder);
        drop(recorder);

        // Must not panic, and the dead entry goes away.
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Caution);

        let survivor = Recorder::new();
        station.subscribe(TrainDirection::AwayFromHome, &survivor);
        station.set_aspect(TrainDirection::AwayFromHome, SignalAspect::Proceed);
        assert_eq!(survivor.changes().len(), 1);
    }
}
