use anyhow::Result;
use serde::Serialize;

pub(crate) mod analytics;
pub(crate) mod events;
#[cfg(feature = "postgres")]
pub(crate) mod migrate;
pub(crate) mod terms;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
