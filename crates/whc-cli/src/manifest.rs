//! The `whc run` input file: a wafer shape, a bio-graph described by name
//! instead of `VertexId`, and the pipeline's configuration surface
//! (spec.md §6), all in one TOML document.

use std::collections::HashMap;

use serde::Deserialize;

use whc_coords::HicannOnWafer;
use whc_graph::{BioGraph, EdgeId, Population, ProjectionView, VertexId};
use whc_merge::{MergerStrategy, PopStrategy};
use whc_pipeline::{L1Algorithm, PipelineConfig, UserPin};
use whc_resource::WaferResources;

use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub wafer: WaferSpec,
    #[serde(default)]
    pub populations: Vec<PopulationSpec>,
    #[serde(default)]
    pub projections: Vec<ProjectionSpec>,
    #[serde(default)]
    pub pipeline: PipelineSpec,
}

#[derive(Debug, Deserialize, Default)]
pub struct WaferSpec {
    /// Load every enabled chip on the wafer's bounding grid.
    #[serde(default)]
    pub full: bool,
    /// Explicit `(x, y)` coordinates, in addition to `full`.
    #[serde(default)]
    pub hicanns: Vec<(u16, u16)>,
}

#[derive(Debug, Deserialize)]
pub struct PopulationSpec {
    pub name: String,
    pub size: usize,
    #[serde(default)]
    pub source: bool,
    /// Defaults to `!source` (spike sources aren't realised on hardware).
    #[serde(default)]
    pub physical: Option<bool>,
    #[serde(default)]
    pub pin_hicann: Option<(u16, u16)>,
    #[serde(default)]
    pub pin_block: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectionSpec {
    pub pre: String,
    pub post: String,
    #[serde(default)]
    pub pre_slice: Option<(usize, usize)>,
    #[serde(default)]
    pub post_slice: Option<(usize, usize)>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub priority: Option<f64>,
}

fn default_target() -> String {
    "excitatory".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct PipelineSpec {
    pub hw_neuron_size: Option<u8>,
    pub merger_strategy: Option<String>,
    pub l1_address_strategy: Option<String>,
    pub l1_algorithm: Option<String>,
    pub switch_seed: Option<u64>,
}

pub fn build_wafer(spec: &WaferSpec) -> CliResult<WaferResources> {
    let mut wafer = WaferResources::new();
    if spec.full {
        for hicann in whc_coords::iter_all_hicanns() {
            wafer.load_hicann(hicann);
        }
    }
    for &(x, y) in &spec.hicanns {
        let hicann = HicannOnWafer::new(x, y)?;
        wafer.load_hicann(hicann);
    }
    if wafer.present_iter().next().is_none() {
        return Err(CliError::invalid_args("manifest names no HICANNs (set wafer.full or wafer.hicanns)"));
    }
    Ok(wafer)
}

/// Builds the bio-graph and returns the name -> `VertexId` table plus the
/// `EdgeId` assigned to each manifest projection, in manifest order.
pub fn build_bio_graph(
    populations: &[PopulationSpec],
    projections: &[ProjectionSpec],
) -> CliResult<(BioGraph, HashMap<String, VertexId>, Vec<EdgeId>)> {
    let mut graph = BioGraph::new();
    let mut names = HashMap::new();
    for p in populations {
        let population = if p.source { Population::source(&p.name, p.size) } else { Population::new(&p.name, p.size) };
        let population = Population { is_physical: p.physical.unwrap_or(!p.source), ..population };
        let id = graph.add_population(population);
        names.insert(p.name.clone(), id);
    }

    let mut edge_ids = Vec::with_capacity(projections.len());
    for proj in projections {
        let pre = *names.get(&proj.pre).ok_or_else(|| CliError::invalid_args(format!("unknown population '{}'", proj.pre)))?;
        let post = *names.get(&proj.post).ok_or_else(|| CliError::invalid_args(format!("unknown population '{}'", proj.post)))?;
        let pre_size = populations.iter().find(|p| p.name == proj.pre).map(|p| p.size).unwrap_or(0);
        let post_size = populations.iter().find(|p| p.name == proj.post).map(|p| p.size).unwrap_or(0);
        let view = ProjectionView {
            pre,
            post,
            pre_slice: proj.pre_slice.unwrap_or((0, pre_size)),
            post_slice: proj.post_slice.unwrap_or((0, post_size)),
            target: proj.target.clone(),
        };
        edge_ids.push(graph.add_edge(view)?);
    }
    Ok((graph, names, edge_ids))
}

pub fn build_pipeline_config(
    spec: &PipelineSpec,
    populations: &[PopulationSpec],
    projections: &[ProjectionSpec],
    names: &HashMap<String, VertexId>,
    edge_ids: &[EdgeId],
) -> CliResult<PipelineConfig> {
    let mut config = PipelineConfig::new();
    if let Some(size) = spec.hw_neuron_size {
        config.hw_neuron_size = size;
    }
    if let Some(s) = &spec.merger_strategy {
        config.merger_strategy = parse_merger_strategy(s)?;
    }
    if let Some(s) = &spec.l1_address_strategy {
        config.l1_address_strategy = parse_pop_strategy(s)?;
    }
    if let Some(s) = &spec.l1_algorithm {
        config.l1_algorithm = parse_l1_algorithm(s)?;
    }
    if let Some(seed) = spec.switch_seed {
        config.switch_ordering = whc_graph::SwitchOrdering::ShuffleWithGivenSeed(seed);
    }

    for p in populations {
        if let Some((x, y)) = p.pin_hicann {
            let hicann = HicannOnWafer::new(x, y)?;
            let &vertex = names.get(&p.name).expect("population was just inserted");
            let pin = match p.pin_block {
                Some(b) => {
                    let block = whc_coords::NeuronBlockOnHICANN::new(b)?;
                    UserPin::Block(hicann, block)
                }
                None => UserPin::Hicann(hicann),
            };
            config.user_pins.insert(vertex, pin);
        }
    }

    for (proj, &edge) in projections.iter().zip(edge_ids) {
        if let Some(priority) = proj.priority {
            config.projection_priorities.insert(edge, priority);
        }
    }

    Ok(config)
}

fn parse_merger_strategy(s: &str) -> CliResult<MergerStrategy> {
    match s {
        "minimize-sending-repeaters" => Ok(MergerStrategy::MinimizeNumberOfSendingRepeaters),
        "minimize-as-possible" => Ok(MergerStrategy::MinimizeAsPossible),
        "one-to-one" => Ok(MergerStrategy::OneToOne),
        other => Err(CliError::invalid_args(format!("unknown merger strategy '{other}'"))),
    }
}

fn parse_pop_strategy(s: &str) -> CliResult<PopStrategy> {
    match s {
        "high-first" => Ok(PopStrategy::HighFirst),
        "low-first" => Ok(PopStrategy::LowFirst),
        "alternating" => Ok(PopStrategy::Alternating),
        other => Err(CliError::invalid_args(format!("unknown address strategy '{other}'"))),
    }
}

fn parse_l1_algorithm(s: &str) -> CliResult<L1Algorithm> {
    match s {
        "backbone" => Ok(L1Algorithm::Backbone),
        "dijkstra" => Ok(L1Algorithm::Dijkstra),
        other => Err(CliError::invalid_args(format!("unknown L1 algorithm '{other}'"))),
    }
}
