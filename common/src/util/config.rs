use crate::geom::coord::Coord;
use crate::geom::rect::Rect;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decompose: DecomposeConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecomposeConfig {
    #[serde(default)]
    pub grid_origin_x: Coord,
    #[serde(default)]
    pub grid_origin_y: Coord,
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: Coord,
    /// Clearance added above and right of every sub-cell.
    #[serde(default = "default_subcell_sep")]
    pub subcell_sep_up: Coord,
    /// Clearance added below and left of every sub-cell.
    #[serde(default = "default_subcell_sep")]
    pub subcell_sep_down: Coord,
    /// `[x1, y1, x2, y2]`; the die area when absent.
    #[serde(default)]
    pub area: Option<[Coord; 4]>,
    /// `"-"` names the design's own netlist.
    #[serde(default)]
    pub netlist: Option<String>,
    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            grid_origin_x: 0,
            grid_origin_y: 0,
            grid_spacing: default_grid_spacing(),
            subcell_sep_up: default_subcell_sep(),
            subcell_sep_down: default_subcell_sep(),
            area: None,
            netlist: None,
            verify: default_verify(),
        }
    }
}

impl DecomposeConfig {
    pub fn area_rect(&self) -> Option<Rect> {
        self.area.map(Rect::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_lef_files")]
    pub lef_files: Vec<String>,
    #[serde(default = "default_def_file")]
    pub def_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            lef_files: default_lef_files(),
            def_file: default_def_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report")]
    pub report: String,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
            image: default_image(),
            image_size: default_image_size(),
        }
    }
}

fn default_grid_spacing() -> Coord {
    200
}

fn default_subcell_sep() -> Coord {
    100
}

fn default_verify() -> bool {
    true
}

fn default_lef_files() -> Vec<String> {
    vec!["inputs/macros.lef".to_string()]
}

fn default_def_file() -> String {
    "inputs/macros.def".to_string()
}

fn default_report() -> String {
    "output/channels.txt".to_string()
}

fn default_image() -> String {
    "output/channels.png".to_string()
}

fn default_image_size() -> u32 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.decompose.grid_spacing, 200);
        assert_eq!(config.decompose.subcell_sep_up, 100);
        assert!(config.decompose.verify);
        assert!(config.decompose.area_rect().is_none());
        assert_eq!(config.input.def_file, "inputs/macros.def");
        assert_eq!(config.output.image_size, 1000);
    }

    #[test]
    fn sections_override_fields() {
        let text = r#"
[decompose]
grid_spacing = 7
grid_origin_x = -3
area = [0, 0, 500, 400]
netlist = "-"
verify = false

[input]
lef_files = ["a.lef", "b.lef"]

[output]
image = "out.png"
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.decompose.grid_spacing, 7);
        assert_eq!(config.decompose.grid_origin_x, -3);
        assert_eq!(config.decompose.subcell_sep_down, 100);
        assert_eq!(
            config.decompose.area_rect(),
            Some(Rect::from_coords(0, 0, 500, 400))
        );
        assert_eq!(config.decompose.netlist.as_deref(), Some("-"));
        assert!(!config.decompose.verify);
        assert_eq!(config.input.lef_files.len(), 2);
        assert_eq!(config.output.image, "out.png");
        assert_eq!(config.output.report, "output/channels.txt");
    }
}
