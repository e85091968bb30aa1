//! Start SAP GUI for a stored link.

use zlogon_engine::Engine;

use super::parse_uuid;

pub fn run(engine: &Engine, uuid: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let uuid = parse_uuid(uuid)?;
    let launcher = engine.launcher();
    if dry_run {
        let command = launcher.prepare(uuid)?;
        println!(
            "{} {}",
            command.program.display(),
            command.redacted_args().join(" ")
        );
        return Ok(());
    }
    launcher.launch(uuid)?;
    Ok(())
}
