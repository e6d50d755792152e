use std::sync::{Arc, PoisonError, RwLock};

use super::{
    AspectChange, SharedPosition, SignalObserver, Timetable, TrainDirection, TrainPosition,
};

/// A service running on the section today: immutable identity plus handles to
/// its timetable and its live position.
#[derive(Debug)]
pub struct Train {
    number: String,
    name: String,
    direction: TrainDirection,
    timetable: Arc<Timetable>,
    position: SharedPosition,
}

impl Train {
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        direction: TrainDirection,
        timetable: Arc<Timetable>,
        initial: TrainPosition,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            direction,
            timetable,
            position: Arc::new(RwLock::new(initial)),
        }
    }

    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn direction(&self) -> TrainDirection {
        self.direction
    }

    #[must_use]
    pub fn timetable(&self) -> &Arc<Timetable> {
        &self.timetable
    }

    /// Current position, copied out of the shared cell.
    #[must_use]
    pub fn position(&self) -> TrainPosition {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle to the live position cell for the recompute task.
    #[must_use]
    pub fn shared_position(&self) -> SharedPosition {
        Arc::clone(&self.position)
    }
}

impl SignalObserver for Train {
    fn aspect_changed(&self, change: &AspectChange) {
        log::debug!(
            "train {} sighted {} signal at {} change {:?} -> {:?}",
            self.number,
            change.direction,
            change.station,
            change.previous,
            change.current
        );
    }
}
