mod bootstrap;
mod config;
mod explore;
mod loop_runner;
mod presenter;
mod scene;
mod scenery;
mod world_map;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
