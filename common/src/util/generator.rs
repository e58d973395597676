use crate::geom::rect::Rect;
use rand::Rng;
use std::fs::File;
use std::io::Write;

const DB_UNITS: i64 = 100;
const PLACEMENT_STEP: i64 = 200;
const MAX_ATTEMPTS: usize = 200;

/// Library macros written to the LEF: name and size in microns.
const MACROS: [(&str, i64, i64); 4] = [
    ("SRAM_S", 20, 20),
    ("SRAM_M", 40, 30),
    ("SRAM_TALL", 20, 60),
    ("PLL", 30, 30),
];

/// Writes a LEF with a small macro library and a DEF with `num_macros`
/// non-overlapping macro placements and a chain of two-pin nets.
pub fn generate_random_macros(
    def_file: &str,
    lef_file: &str,
    num_macros: usize,
) -> std::io::Result<()> {
    generate_with_rng(def_file, lef_file, num_macros, &mut rand::thread_rng())
}

pub fn generate_with_rng<R: Rng>(
    def_file: &str,
    lef_file: &str,
    num_macros: usize,
    rng: &mut R,
) -> std::io::Result<()> {
    write_lef(lef_file)?;

    let mean_area = MACROS.iter().map(|&(_, w, h)| w * h).sum::<i64>() / MACROS.len() as i64;
    let die_side_um = ((mean_area * num_macros.max(1) as i64 * 3) as f64).sqrt() as i64 + 60;
    let die = die_side_um * DB_UNITS;

    log::info!(
        "Generating benchmark: {} macros, die {}x{} ({} units/um)",
        num_macros,
        die,
        die,
        DB_UNITS
    );

    let mut placed: Vec<(String, &str, Rect)> = Vec::with_capacity(num_macros);
    for i in 0..num_macros {
        let (name, w_um, h_um) = MACROS[rng.gen_range(0..MACROS.len())];
        let (w, h) = (w_um * DB_UNITS, h_um * DB_UNITS);
        let slots_x = (die - w) / PLACEMENT_STEP;
        let slots_y = (die - h) / PLACEMENT_STEP;
        if slots_x <= 0 || slots_y <= 0 {
            continue;
        }

        for _ in 0..MAX_ATTEMPTS {
            let x = rng.gen_range(0..slots_x) * PLACEMENT_STEP;
            let y = rng.gen_range(0..slots_y) * PLACEMENT_STEP;
            let r = Rect::from_coords(x, y, x + w, y + h);
            if placed.iter().all(|(_, _, other)| !r.overlaps(other)) {
                placed.push((format!("m{}", i), name, r));
                break;
            }
        }
    }
    if placed.len() < num_macros {
        log::warn!(
            "Only {} of {} macros fit the die.",
            placed.len(),
            num_macros
        );
    }

    let mut file = File::create(def_file)?;
    writeln!(file, "VERSION 5.8 ;")?;
    writeln!(file, "DESIGN macro_demo ;")?;
    writeln!(file, "UNITS DISTANCE MICRONS {} ;", DB_UNITS)?;
    writeln!(file, "DIEAREA ( 0 0 ) ( {} {} ) ;", die, die)?;

    writeln!(file, "COMPONENTS {} ;", placed.len())?;
    for (inst, name, r) in &placed {
        writeln!(
            file,
            "- {} {} + PLACED ( {} {} ) N ;",
            inst,
            name,
            r.left(),
            r.bottom()
        )?;
    }
    writeln!(file, "END COMPONENTS")?;

    let num_nets = placed.len().saturating_sub(1);
    writeln!(file, "NETS {} ;", num_nets)?;
    for (i, pair) in placed.windows(2).enumerate() {
        writeln!(file, "- net{} ( {} Q ) ( {} D ) ;", i, pair[0].0, pair[1].0)?;
    }
    writeln!(file, "END NETS")?;
    writeln!(file, "END DESIGN")?;
    Ok(())
}

fn write_lef(filename: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "VERSION 5.8 ;")?;
    for (name, w, h) in MACROS {
        writeln!(file, "MACRO {}", name)?;
        writeln!(file, "  CLASS BLOCK ;")?;
        writeln!(file, "  SIZE {} BY {} ;", w, h)?;
        writeln!(file, "END {}", name)?;
    }
    writeln!(file, "END LIBRARY")?;
    Ok(())
}
