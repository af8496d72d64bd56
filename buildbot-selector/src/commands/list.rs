//! `--list`: one line per registered builder.

use std::io::{self, Write};

use anyhow::Result;
use selector_dispatch::{Environment, Registry};

pub fn cmd_list(registry: &Registry) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_list(registry, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_list(registry: &Registry, out: &mut impl Write) -> Result<()> {
    let empty = Environment::default();
    for (name, entry) in registry.iter() {
        let inv = selector_dispatch::resolve(registry, Some(name), &empty, &[])?;
        write!(out, "{}: {}", name, inv.command_line())?;
        for (k, v) in &entry.env {
            write!(out, " [{}={}]", k, v)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
