#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod config;
pub mod console;
pub mod shop;
pub mod sync;
pub mod watchdog;
