use crate::db::core::LayoutDb;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Reads macro outlines (`MACRO` / `SIZE w BY h`) into `db.macro_sizes`.
/// Everything else in the library is skipped.
pub fn parse(db: &mut LayoutDb, filename: &str) -> Result<()> {
    let file = File::open(filename).with_context(|| format!("opening LEF '{}'", filename))?;
    parse_reader(db, BufReader::new(file))
}

pub fn parse_reader<R: BufRead>(db: &mut LayoutDb, reader: R) -> Result<()> {
    let mut current_macro = String::new();
    let mut in_macro = false;
    let mut found = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() || parts[0].starts_with('#') {
            continue;
        }

        match parts[0] {
            "MACRO" => {
                let Some(name) = parts.get(1) else {
                    bail!("line {}: MACRO without a name", line_no + 1);
                };
                current_macro = name.to_string();
                in_macro = true;
            }
            "SIZE" if in_macro => {
                if parts.len() < 4 || parts[2] != "BY" {
                    bail!("line {}: malformed SIZE statement", line_no + 1);
                }
                let w: f64 = parts[1]
                    .parse()
                    .with_context(|| format!("line {}: bad width", line_no + 1))?;
                let h: f64 = parts[3]
                    .trim_end_matches(';')
                    .parse()
                    .with_context(|| format!("line {}: bad height", line_no + 1))?;
                db.macro_sizes.insert(current_macro.clone(), (w, h));
                found += 1;
            }
            "END" => {
                if in_macro && parts.get(1) == Some(&current_macro.as_str()) {
                    in_macro = false;
                    current_macro.clear();
                }
            }
            _ => {}
        }
    }

    if found == 0 {
        log::warn!("No macro sizes found in LEF.");
    } else {
        log::info!("Read {} macro outlines from LEF", found);
    }
    Ok(())
}
