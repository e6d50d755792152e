use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading section or train data.
///
/// A failed section load aborts session startup; a failed train load is
/// reported and the train skipped so the rest of the day's services still run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("invalid time '{value}', expected HH:MM")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown direction '{0}', expected TowardsHome or AwayFromHome")]
    UnknownDirection(String),

    #[error("unknown operating-day code '{0}'")]
    UnknownDayCode(String),

    #[error("station '{0}' is not on the section")]
    UnknownStation(String),

    #[error("section '{0}' has no stations")]
    EmptySection(String),

    #[error("duplicate station code '{0}'")]
    DuplicateStation(String),

    #[error("stations '{first}' and '{second}' are both {distance} units from home")]
    DuplicateDistance {
        distance: u32,
        first: String,
        second: String,
    },

    #[error("station '{code}' has {count} tracks, expected 1 to 3")]
    InvalidTrackCount { code: String, count: u32 },

    #[error("train {0} has no scheduled stops")]
    NoStops(String),

    #[error("train {train} does not stop at boundary station '{station}'")]
    MissingBoundaryStop { train: String, station: String },
}
