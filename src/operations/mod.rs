pub mod offset;
pub mod similarity;
pub mod topology;
