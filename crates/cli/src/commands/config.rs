//! Settings stored in the database.

use zlogon_engine::Engine;

pub fn get(engine: &Engine, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    match engine.settings().get(key)? {
        Some(value) => println!("{value}"),
        None => println!("{key} is not set"),
    }
    Ok(())
}

pub fn set_path(engine: &Engine, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let entry = engine.settings().set_install_dir(path)?;
    println!("✓ {} = {}", entry.key, entry.value);
    Ok(())
}
