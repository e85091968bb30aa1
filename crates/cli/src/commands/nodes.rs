//! Add, edit and delete tree entries.

use zlogon_engine::{Engine, FolderDraft, LinkDraft};

use super::{parse_parent, parse_uuid};

pub fn add_folder(
    engine: &Engine,
    name: String,
    description: String,
    parent: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let parent = parse_parent(parent)?;
    let node = engine
        .tree()
        .add_folder(&FolderDraft { name, description }, parent)?;
    println!("✓ Added folder {}  [{}]", node.name, node.uuid);
    Ok(())
}

pub fn add_link(
    engine: &Engine,
    draft: LinkDraft,
    parent: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let parent = parse_parent(parent)?;
    let (node, link) = engine.tree().add_link(&draft, parent)?;
    println!(
        "✓ Added link {}  ({} / {})  [{}]",
        node.name, link.system, link.client, node.uuid
    );
    Ok(())
}

pub fn edit_folder(
    engine: &Engine,
    uuid: &str,
    name: String,
    description: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let uuid = parse_uuid(uuid)?;
    let node = engine
        .tree()
        .update_folder(uuid, &FolderDraft { name, description })?;
    println!("✓ Updated folder {}", node.name);
    Ok(())
}

pub fn edit_link(
    engine: &Engine,
    uuid: &str,
    draft: LinkDraft,
    parent: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let uuid = parse_uuid(uuid)?;
    let parent = parse_parent(parent)?;
    let (node, _) = engine.tree().update_link(uuid, &draft, parent)?;
    println!("✓ Updated link {}", node.name);
    Ok(())
}

pub fn set_expanded(
    engine: &Engine,
    uuid: &str,
    expanded: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let uuid = parse_uuid(uuid)?;
    if !engine.tree().set_expanded(uuid, expanded)? {
        println!("Nothing to change");
    }
    Ok(())
}

pub fn delete(engine: &Engine, uuid: &str) -> Result<(), Box<dyn std::error::Error>> {
    let uuid = parse_uuid(uuid)?;
    let removed = engine.tree().delete(uuid)?;
    println!("✓ Deleted {removed} node(s)");
    Ok(())
}
