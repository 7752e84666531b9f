mod corpus_tests;
mod expansion_tests;

use std::path::PathBuf;

use skill_eval::model::InteractionModel;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn shop_model() -> InteractionModel {
    InteractionModel::from_file(fixture_path("en-US.json")).expect("fixture model must parse")
}
