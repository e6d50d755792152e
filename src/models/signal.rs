use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TrainDirection;

/// Signal aspect shown to approaching trains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAspect {
    Stop,
    Caution,
    Proceed,
}

impl Default for SignalAspect {
    fn default() -> Self {
        Self::Stop
    }
}

/// The pair of directional aspects a track carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectPair {
    pub towards_home: SignalAspect,
    pub away_from_home: SignalAspect,
}

impl AspectPair {
    #[must_use]
    pub const fn get(self, direction: TrainDirection) -> SignalAspect {
        match direction {
            TrainDirection::TowardsHome => self.towards_home,
            TrainDirection::AwayFromHome => self.away_from_home,
        }
    }

    pub fn set(&mut self, direction: TrainDirection, aspect: SignalAspect) {
        match direction {
            TrainDirection::TowardsHome => self.towards_home = aspect,
            TrainDirection::AwayFromHome => self.away_from_home = aspect,
        }
    }
}

/// A single aspect transition at a station, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectChange {
    pub station: String,
    pub direction: TrainDirection,
    pub previous: SignalAspect,
    pub current: SignalAspect,
}

/// Receiver of aspect changes for one direction of travel.
pub trait SignalObserver: Send + Sync {
    fn aspect_changed(&self, change: &AspectChange);
}

/// Token returned by `Station::subscribe`, needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
