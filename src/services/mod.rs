pub mod crowd;
