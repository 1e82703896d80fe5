pub mod correlation;
pub mod daily;
pub mod day_night;
pub mod hourly_profile;
pub mod monthly;
pub mod station;
