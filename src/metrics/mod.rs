pub mod absolute;
pub mod dtw;
pub mod edr;
pub mod erp;
pub mod euclidean;
pub mod lcss;
pub mod squared;
pub mod wdtw;
