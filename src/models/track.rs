use serde::{Deserialize, Serialize};

use super::AspectPair;

/// Physical role of a track within a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Main,
    Loop,
}

/// One track inside a station, carrying the signal aspect shown for each
/// direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub kind: TrackKind,
    pub aspects: AspectPair,
}

impl Track {
    #[must_use]
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            aspects: AspectPair::default(),
        }
    }

    /// Standard station layout for a track count: one main track followed by
    /// up to two loop tracks. `None` outside 1..=3.
    pub(crate) fn layout(count: u32) -> Option<Vec<Self>> {
        match count {
            1 => Some(vec![Self::new(TrackKind::Main)]),
            2 => Some(vec![Self::new(TrackKind::Main), Self::new(TrackKind::Loop)]),
            3 => Some(vec![
                Self::new(TrackKind::Main),
                Self::new(TrackKind::Loop),
                Self::new(TrackKind::Loop),
            ]),
            _ => None,
        }
    }
}
