use std::sync::Arc;

use super::Station;
use crate::error::LoadError;

/// The modelled stretch of railway: an ordered run of stations outward from
/// the home station.
#[derive(Debug)]
pub struct Section {
    name: String,
    stations: Vec<Arc<Station>>,
}

impl Section {
    /// Validate and order the station list by distance from home.
    ///
    /// # Errors
    ///
    /// Rejects empty sections, duplicate station codes and duplicate
    /// distances.
    pub fn new(name: impl Into<String>, stations: Vec<Station>) -> Result<Self, LoadError> {
        let name = name.into();
        if stations.is_empty() {
            return Err(LoadError::EmptySection(name));
        }
        let mut stations: Vec<Arc<Station>> = stations.into_iter().map(Arc::new).collect();
        for (position, station) in stations.iter().enumerate() {
            if stations[..position]
                .iter()
                .any(|earlier| earlier.code().eq_ignore_ascii_case(station.code()))
            {
                return Err(LoadError::DuplicateStation(station.code().to_string()));
            }
        }
        stations.sort_by_key(|station| station.distance_from_home());
        for pair in stations.windows(2) {
            if pair[0].distance_from_home() == pair[1].distance_from_home() {
                return Err(LoadError::DuplicateDistance {
                    distance: pair[0].distance_from_home(),
                    first: pair[0].code().to_string(),
                    second: pair[1].code().to_string(),
                });
            }
        }
        Ok(Self { name, stations })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stations ordered by distance from home.
    #[must_use]
    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    /// Signalled length of the section: the distance of the station farthest
    /// from home.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.stations
            .last()
            .map_or(0, |station| station.distance_from_home())
    }

    /// Look up a station by code, case-insensitively.
    #[must_use]
    pub fn station(&self, code: &str) -> Option<&Arc<Station>> {
        self.stations
            .iter()
            .find(|station| station.code().eq_ignore_ascii_case(code))
    }

    /// Look up a station by display name.
    #[must_use]
    pub fn station_by_name(&self, name: &str) -> Option<&Arc<Station>> {
        self.stations.iter().find(|station| station.name() == name)
    }
}
