//! One handler per subcommand.

pub(crate) mod eligible;
pub(crate) mod notices;
pub(crate) mod plan;
pub(crate) mod withdraw_info;

use anyhow::Result;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
