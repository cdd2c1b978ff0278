pub mod access;
pub mod calendar;
pub mod error;
pub mod mode;
pub mod network;
pub mod pattern;
pub mod schedule;
pub mod transfers;

pub use access::AccessTable;
pub use calendar::{ServiceCalendar, ServicePeriod};
pub use error::NetworkError;
pub use mode::TransitMode;
pub use network::{RouteInfo, TransitNetwork};
pub use pattern::TripPattern;
pub use schedule::{FrequencyEntry, TripSchedule};
pub use transfers::{Transfer, TransferTable};
