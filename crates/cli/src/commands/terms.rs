use anyhow::Result;
use termsift_service::Engine;

use super::print_json;

pub(crate) async fn run_reconcile(engine: &Engine, user: &str, term: &str) -> Result<()> {
    let summary = engine.finalize.reconcile(user, term).await?;
    print_json(&summary)
}

pub(crate) async fn run_replay(engine: &Engine, user: Option<&str>) -> Result<()> {
    let report = engine.replay.replay(user).await?;
    print_json(&report)?;
    if report.failed > 0 {
        anyhow::bail!("{} of {} sessions failed to replay", report.failed, report.sessions);
    }
    Ok(())
}
