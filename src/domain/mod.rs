pub mod node;
pub mod node_selector;
pub mod rackhd;
pub mod utils;
pub mod workflow_run;
