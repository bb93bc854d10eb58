pub mod f1_models;
pub mod f1_service;
pub mod status_map;

pub use f1_models::{
    CalendarRace, Classification, DriverStanding, F1DataSource, F1Error, RaceResult,
};
pub use f1_service::F1Service;
