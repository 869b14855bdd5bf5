pub mod lead;
pub mod roi;
