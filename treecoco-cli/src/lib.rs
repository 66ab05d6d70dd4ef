pub mod dataset;
pub mod run;
pub mod stage;
