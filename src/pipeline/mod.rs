//! The three pipeline stages: train, predict, aggregate.

mod aggregator;
mod predictor;
mod progress;
mod trainer;

pub use aggregator::{AggregateOptions, AggregateReport, run_aggregate};
pub use predictor::{
    PredictOptions, PredictReport, collect_card_audio, discover_cards, run_predict,
    score_path_for,
};
pub use trainer::{TrainOptions, run_train};
