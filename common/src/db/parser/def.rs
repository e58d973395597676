use crate::db::core::{LayoutDb, Netlist};
use crate::db::indices::{DefId, NetId};
use crate::geom::coord::Coord;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use crate::geom::transform::{Orientation, Transform};
use anyhow::{Context, Result, anyhow, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Reads a placed DEF into `db`: the design becomes a cell definition whose
/// bbox is the die area, every component becomes a use of its macro (whose
/// outline comes from the LEF sizes already in `db`), and the `NETS` section
/// becomes a netlist named after the design. Returns the design's id.
pub fn parse(db: &mut LayoutDb, filename: &str) -> Result<DefId> {
    let file = File::open(filename).with_context(|| format!("opening DEF '{}'", filename))?;
    parse_reader(db, BufReader::new(file))
}

pub fn parse_reader<R: BufRead>(db: &mut LayoutDb, reader: R) -> Result<DefId> {
    let mut design = String::from("top");
    let mut die_area = Rect::default();
    let mut def_units = 1000.0;
    let mut components: Vec<(String, String, Point<Coord>, Orientation)> = Vec::new();
    let mut netlist: Option<Netlist> = None;
    let mut current_net: Option<NetId> = None;

    let mut in_components = false;
    let mut in_nets = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() || parts[0].starts_with('#') {
            continue;
        }
        let at = || format!("line {}", line_no + 1);

        match parts[0] {
            "DESIGN" => {
                if let Some(name) = parts.get(1) {
                    design = name.trim_end_matches(';').to_string();
                }
            }
            "UNITS" => {
                for (i, &part) in parts.iter().enumerate() {
                    if part == "MICRONS" && i + 1 < parts.len() {
                        let val_str = parts[i + 1].trim_matches(';');
                        if let Ok(val) = val_str.parse::<f64>() {
                            def_units = val;
                            log::info!("DEF Units updated to: {}", def_units);
                        }
                        break;
                    }
                }
            }
            "DIEAREA" => {
                if parts.len() < 8 {
                    bail!("{}: malformed DIEAREA", at());
                }
                let x1: Coord = parts[2].parse().with_context(at)?;
                let y1: Coord = parts[3].parse().with_context(at)?;
                let x2: Coord = parts[6].parse().with_context(at)?;
                let y2: Coord = parts[7].parse().with_context(at)?;
                die_area = Rect::from([x1, y1, x2, y2]);
            }
            "COMPONENTS" => {
                in_components = true;
                in_nets = false;
            }
            "NETS" => {
                in_nets = true;
                in_components = false;
                netlist.get_or_insert_with(|| Netlist::new(design.clone()));
            }
            "END" => {
                if parts.len() > 1 {
                    match parts[1] {
                        "COMPONENTS" => in_components = false,
                        "NETS" => in_nets = false,
                        _ => {}
                    }
                }
            }
            "-" if in_components => {
                if parts.len() < 3 {
                    bail!("{}: component without a macro", at());
                }
                let name = parts[1].to_string();
                let macro_name = parts[2].to_string();
                let mut origin = Point::new(0, 0);
                let mut orient = Orientation::N;

                for (i, &part) in parts.iter().enumerate() {
                    if part == "(" && i + 2 < parts.len() {
                        let x: Coord = parts[i + 1].parse().with_context(at)?;
                        let y: Coord = parts[i + 2].parse().with_context(at)?;
                        origin = Point::new(x, y);
                        if let Some(o) = parts.get(i + 4) {
                            orient = o.parse().map_err(|e: String| anyhow!("{}: {}", at(), e))?;
                        }
                    }
                }
                components.push((name, macro_name, origin, orient));
            }
            "-" if in_nets => {
                let Some(nl) = netlist.as_mut() else {
                    continue;
                };
                let net = nl.add_net(parts.get(1).copied().unwrap_or_default());
                current_net = Some(net);
                add_terminals(nl, net, &parts[2..]);
                if line.trim_end().ends_with(';') {
                    current_net = None;
                }
            }
            _ if in_nets => {
                if let (Some(nl), Some(net)) = (netlist.as_mut(), current_net) {
                    add_terminals(nl, net, &parts);
                    if line.trim_end().ends_with(';') {
                        current_net = None;
                    }
                }
            }
            _ => {}
        }
    }

    if die_area.is_empty() {
        log::warn!("DEF has no DIEAREA; using the component bounding box.");
    }

    let top = db.add_def(&design, die_area)?;
    let mut placed = 0usize;
    for (name, macro_name, origin, orient) in components {
        let child = match db.lookup_def(&macro_name) {
            Some(id) => id,
            None => {
                let Some(&(w, h)) = db.macro_sizes.get(&macro_name) else {
                    log::warn!(
                        "Component '{}' uses unknown macro '{}'; skipped.",
                        name,
                        macro_name
                    );
                    continue;
                };
                let bbox = Rect::from_coords(
                    0,
                    0,
                    (w * def_units).round() as Coord,
                    (h * def_units).round() as Coord,
                );
                db.add_def(&macro_name, bbox)?
            }
        };
        let bbox = db.def(child).bbox;
        let transform = Transform::placement(orient, bbox, origin);
        db.add_use(top, &name, &macro_name, transform, None)?;
        placed += 1;
    }

    if die_area.is_empty() {
        db.def_mut(top).recompute_bbox();
    }

    if let Some(nl) = netlist {
        log::info!("Netlist '{}': {} nets", nl.name, nl.nets.len());
        db.add_netlist(nl);
    }
    log::info!("Design '{}': {} placed components", design, placed);
    Ok(top)
}

fn add_terminals(netlist: &mut Netlist, net: NetId, parts: &[&str]) {
    let terminals = &mut netlist.nets[net.index()].terminals;
    let mut i = 0;
    while i + 2 < parts.len() {
        if parts[i] == "(" {
            terminals.push((parts[i + 1].to_string(), parts[i + 2].to_string()));
            i += 3;
        } else {
            i += 1;
        }
    }
}
