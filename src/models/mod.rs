mod direction;
mod operating_days;
mod position;
mod schedule;
mod section;
mod signal;
mod station;
mod timetable;
mod track;
mod train;

pub use direction::TrainDirection;
pub use operating_days::OperatingDays;
pub use position::{RunningStatus, SharedPosition, TrainPosition};
pub use schedule::TrainSchedule;
pub use section::Section;
pub use signal::{AspectChange, AspectPair, SignalAspect, SignalObserver, SubscriptionId};
pub use station::Station;
pub use timetable::Timetable;
pub use track::{Track, TrackKind};
pub use train::Train;
