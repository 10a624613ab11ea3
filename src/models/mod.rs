// Domain records, request payloads and derived analytics shapes

pub mod activity;
pub mod asset;
pub mod goal;
pub mod progress;
pub mod user;
pub mod validation;

pub use activity::*;
pub use asset::*;
pub use goal::*;
pub use progress::*;
pub use user::*;
pub use validation::*;
