pub mod bounding_box;
pub mod gradient;
pub mod luminance;
pub mod utils;
