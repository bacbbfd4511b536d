pub mod answer;
pub mod delete;
pub mod due;
pub mod import;
pub mod review;
pub mod show;
pub mod stats;
