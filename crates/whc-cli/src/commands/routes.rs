//! Interactive route exploration command, independent of a pipeline run.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use whc_coords::HLineOnHICANN;
use whc_graph::L1RoutingGraph;
use whc_router::{find_routes, Orientation, Target};

use crate::error::{CliError, CliResult};
use crate::manifest::{build_wafer, Manifest};

/// List every simple path from a source H-line to a target chip
#[derive(Args, Debug)]
pub struct RoutesCommand {
    /// Manifest file (defaults to `<workspace>/manifest.toml`)
    pub manifest: Option<PathBuf>,

    /// Source chip, "x,y"
    #[arg(long, value_parser = parse_xy)]
    pub from: (u16, u16),

    /// Source H-line index on the source chip
    #[arg(long, default_value_t = 0)]
    pub hline: u8,

    /// Target chip, "x,y"
    #[arg(long, value_parser = parse_xy)]
    pub to: (u16, u16),

    /// Target bus orientation
    #[arg(long, default_value = "horizontal")]
    pub orientation: String,
}

fn parse_xy(s: &str) -> Result<(u16, u16), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x in '{s}'"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y in '{s}'"))?;
    Ok((x, y))
}

impl RoutesCommand {
    pub fn execute(self, workspace: PathBuf) -> CliResult<()> {
        let path = self.manifest.unwrap_or_else(|| workspace.join("manifest.toml"));
        let content = std::fs::read_to_string(&path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        let resources = build_wafer(&manifest.wafer)?;

        let mut graph = L1RoutingGraph::new();
        for &hicann in resources.present_iter() {
            graph.add(hicann, whc_graph::SwitchOrdering::InEnumOrder);
        }

        let from = whc_coords::HicannOnWafer::new(self.from.0, self.from.1)?;
        let to = whc_coords::HicannOnWafer::new(self.to.0, self.to.1)?;
        let orientation = match self.orientation.as_str() {
            "horizontal" => Orientation::Horizontal,
            "vertical" => Orientation::Vertical,
            other => return Err(CliError::invalid_args(format!("unknown orientation '{other}'"))),
        };

        let source = graph.hline_vertex(from, HLineOnHICANN::new(self.hline)?)?;
        let target = Target::new(to, orientation);
        let routes = find_routes(&graph, source, target);

        info!("{} route(s) found", routes.len());
        for route in &routes {
            let buses: Vec<String> = route
                .iter()
                .map(|&v| match graph.bus(v) {
                    whc_graph::L1Bus::Horizontal(h, l) => format!("H{}_{}:HL{}", h.x(), h.y(), l.raw()),
                    whc_graph::L1Bus::Vertical(h, l) => format!("H{}_{}:VL{}", h.x(), h.y(), l.raw()),
                })
                .collect();
            println!("{}", buses.join(" -> "));
        }
        Ok(())
    }
}
