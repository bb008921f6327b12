pub mod config;
pub mod decrypt;
pub mod keygen;
pub mod run;
