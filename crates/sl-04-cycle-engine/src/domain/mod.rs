pub mod errors;
pub mod scan;
pub mod state;
