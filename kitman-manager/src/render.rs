//! Plain-text rendering for the CLI.

use kitman_core::{CheckGroup, Component, Operation};
use std::io::{self, Write};

pub fn groups(out: &mut dyn Write, groups: &[CheckGroup<Component>]) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "(no components)");
    }
    for group in groups {
        writeln!(out, "{}", group.label)?;
        for item in &group.items {
            let lock = if item.required && !item.label.ends_with("(required)") {
                " (required)"
            } else {
                ""
            };
            writeln!(out, "  {} {}{}", item.symbol(), item.label, lock)?;
        }
    }
    Ok(())
}

pub fn target(
    out: &mut dyn Write,
    operation: Operation,
    components: &[Component],
) -> io::Result<()> {
    writeln!(out, "operation: {}", operation)?;
    if components.is_empty() {
        return writeln!(out, "components: none");
    }
    writeln!(out, "components:")?;
    for component in components {
        writeln!(out, "  - {} {}", component.name, component.version_str())?;
    }
    Ok(())
}
