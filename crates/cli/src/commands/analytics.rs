use anyhow::Result;
use termsift_service::Engine;

use super::print_json;

pub(crate) async fn run_analytics(engine: &Engine, user: &str) -> Result<()> {
    print_json(&engine.analytics.user_analytics(user).await?)
}

pub(crate) async fn run_top(engine: &Engine, user: &str, limit: Option<usize>) -> Result<()> {
    print_json(&engine.analytics.top_terms(user, limit).await?)
}

pub(crate) async fn run_recent(engine: &Engine, user: &str, limit: Option<usize>) -> Result<()> {
    print_json(&engine.analytics.recent_terms(user, limit).await?)
}
