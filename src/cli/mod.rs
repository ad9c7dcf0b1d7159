//! CLI argument parsing.

mod args;

pub use args::{
    AggregateArgs, Cli, Command, ConfigAction, GlobalArgs, PredictArgs, TrainArgs,
};
