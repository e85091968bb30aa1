//! Print the connection tree.

use zlogon_engine::{Engine, TreeEntry};

pub fn run(engine: &Engine, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = engine.tree().tree()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }
    if tree.is_empty() {
        println!("(empty)");
    }
    for entry in &tree {
        print_entry(entry, 0);
    }
    Ok(())
}

fn print_entry(entry: &TreeEntry, depth: usize) {
    let node = &entry.node;
    let marker = if !node.is_folder() {
        " "
    } else if node.expanded {
        "-"
    } else {
        "+"
    };
    let indent = "  ".repeat(depth);
    if node.description.is_empty() {
        println!("{indent}{marker} {}  [{}]", node.name, node.uuid);
    } else {
        println!(
            "{indent}{marker} {}  ({})  [{}]",
            node.name, node.description, node.uuid
        );
    }
    for child in &entry.children {
        print_entry(child, depth + 1);
    }
}
