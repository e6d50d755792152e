use std::env;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;

use section_controller::clock::{Clock, SimulationClock};
use section_controller::constants::TICK_PERIOD;
use section_controller::error::LoadError;
use section_controller::models::SignalAspect;
use section_controller::source::XmlTimetableSource;
use section_controller::GameSession;

fn main() -> Result<(), LoadError> {
    env_logger::init();

    let data_dir = env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let source = XmlTimetableSource::new(&data_dir, "CAL-SRR.xml");

    // A fixed morning start so the bundled trains are on the move.
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(5, 8, 0))
        .expect("valid demo start time");
    let clock: Arc<dyn Clock> = Arc::new(SimulationClock::starting_at(origin));

    let mut session = GameSession::start(&source, Arc::clone(&clock))?;

    println!("section {} under control", session.section().name());
    for station in session.station_snapshots() {
        println!(
            "  {} ({}) at {} from home",
            station.name, station.code, station.distance_from_home
        );
    }

    for round in 0..5 {
        thread::sleep(TICK_PERIOD);
        println!("\n{}", clock.now().format("%H:%M:%S"));
        for train in session.train_snapshots() {
            println!(
                "  {} {} [{}] {:?} at {:.2}",
                train.number, train.name, train.direction, train.status, train.distance_from_home
            );
        }
        if round == 2 {
            session.set_station_aspect("Tirur", SignalAspect::Proceed, SignalAspect::Proceed)?;
            println!("  signals at Tirur pulled off");
        }
    }

    session.stop();
    Ok(())
}
