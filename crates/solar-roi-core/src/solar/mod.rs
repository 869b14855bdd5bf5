pub mod presentation;
pub mod resource;
pub mod roi;

pub use resource::{RoofOrientation, SolarResource, TIME_FRAME_OPTIONS};
pub use roi::{calculate_solar_roi, compute, RoiProjection, RoiYear, SolarRoiInput};
