pub mod brain;
pub mod config;
pub mod coord;
pub mod execute;
pub mod perception;
pub mod sim;
pub mod stats;
pub mod view;
pub mod world;
