use serde::Deserialize;

/// Section definition as stored in the section file: the stations along the
/// section and the services that run over it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename = "section")]
pub struct SectionRecord {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "station", default)]
    pub stations: Vec<StationRecord>,
    #[serde(rename = "train", default)]
    pub trains: Vec<TrainServiceRecord>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StationRecord {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@no-of-tracks")]
    pub no_of_tracks: u32,
    #[serde(rename = "@distance-from-home")]
    pub distance_from_home: u32,
}

/// One service line of the section file. Times are bare HH:MM; the day and
/// direction fields are parsed when the train is built.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrainServiceRecord {
    #[serde(rename = "@number")]
    pub number: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@direction")]
    pub direction: String,
    #[serde(rename = "@day-of-arrival")]
    pub day_of_arrival: String,
    #[serde(rename = "@section-entry-time")]
    pub section_entry_time: String,
    #[serde(rename = "@section-leaving-time")]
    pub section_leaving_time: String,
}

/// Per-train stop list, one file per train, stops in travel order.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename = "timetable")]
pub struct TimetableRecord {
    #[serde(rename = "@train")]
    pub train: String,
    #[serde(rename = "stop", default)]
    pub stops: Vec<StopRecord>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StopRecord {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@arrival-time")]
    pub arrival_time: String,
    #[serde(rename = "@departure-time")]
    pub departure_time: String,
}

/// Parse a section file
///
/// # Errors
/// Returns error if XML parsing fails
pub fn parse_section(xml: &str) -> Result<SectionRecord, quick_xml::DeError> {
    quick_xml::de::from_str(xml)
}

/// Parse a per-train timetable file
///
/// # Errors
/// Returns error if XML parsing fails
pub fn parse_timetable(xml: &str) -> Result<TimetableRecord, quick_xml::DeError> {
    quick_xml::de::from_str(xml)
}
