use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Whether a train is halted at a scheduled stop or moving between stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunningStatus {
    ScheduledStop,
    RunningBetween,
}

/// A train's current whereabouts on the section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainPosition {
    pub status: RunningStatus,
    pub distance_from_home: f64,
}

/// Position cell shared between the recompute task and snapshot readers.
pub type SharedPosition = Arc<RwLock<TrainPosition>>;
