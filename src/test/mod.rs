pub mod utils;

mod games;
mod learning;
mod site;
mod social;
