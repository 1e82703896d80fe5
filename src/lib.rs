mod airstat;
mod dataset;
mod error;
mod summary;
mod types;
mod utils;
mod views;

pub use error::AirstatError;

pub use airstat::*;

pub use dataset::error::DatasetError;
pub use dataset::loader::with_datetime_column;
pub use dataset::schema::*;

pub use summary::{highest_mean_station, lowest_mean_station, RangeSummary};

pub use types::observation::Observation;
pub use types::observations_frame::ObservationsLazyFrame;

pub use views::correlation::{CorrelationMatrix, CorrelationPair};
pub use views::daily::*;
pub use views::day_night::*;
pub use views::hourly_profile::*;
pub use views::monthly::*;
pub use views::station::*;
