pub mod dataset;
pub mod features;
pub mod output;
pub mod report;
