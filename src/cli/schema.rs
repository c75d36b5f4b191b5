use crate::config::Config;

pub fn execute() -> anyhow::Result<()> {
    println!("{}", Config::json_schema()?);
    Ok(())
}
