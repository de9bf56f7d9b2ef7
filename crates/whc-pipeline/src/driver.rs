//! The pipeline driver: sequences placement, merger-tree routing, L1
//! address assignment, L1 routing and synapse-driver allocation over one
//! wafer, threading a single `SynapseLoss` accumulator through and lazily
//! allocating each HICANN's derived structures on first reference.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use rayon::prelude::*;
use whc_coords::{DNCMergerOnHICANN, HicannOnWafer, NeuronBlockOnHICANN, VLineOnHICANN};
use whc_graph::{BioGraph, L1Bus, L1RoutingGraph, VertexId};
use whc_merge::{L1AddressPool, MergerAssignment, MergerTreeRouter, Mode, UnroutableNeuronBlock};
use whc_place::{NeuronPlacementRequest, Pin, Placement, PlacementLoss, Placer};
use whc_resource::WaferResources;
use whc_route::{L1RouteTree, L1Segment};
use whc_router::{lower_path, L1BackboneRouter, L1DijkstraRouter, L1EdgeWeights, Orientation, Target};
use whc_synapse::{
    allocate_chain, count_drivers, count_drivers_per_stp, count_half_rows_per_input_granularity,
    count_half_rows_per_side, count_half_rows_vec, count_rows_per_side, count_synapses_per_neuron,
    DriverDecoder, InputGranularity, NeuronOnHicann, StpMode, SynapseCounts, SynapseEvent,
    SynapseLoss, SynapseType,
};

use crate::config::{L1Algorithm, PipelineConfig, UserPin};
use crate::error::PipelineResult;
use crate::stats::MappingStats;

#[derive(Default)]
pub struct PipelineResultSet {
    pub placement: Placement,
    pub placement_losses: Vec<PlacementLoss>,
    pub merger_assignments: HashMap<HicannOnWafer, Vec<MergerAssignment>>,
    pub unroutable_blocks: HashMap<HicannOnWafer, Vec<UnroutableNeuronBlock>>,
    pub routes: HashMap<(HicannOnWafer, DNCMergerOnHICANN), L1RouteTree>,
    pub synapse_loss: SynapseLoss,
    pub stats: MappingStats,
}

fn to_place_pin(pin: UserPin) -> Pin {
    match pin {
        UserPin::Block(h, b) => Pin::Block(h, b),
        UserPin::Hicann(h) => Pin::Hicann(h),
    }
}

/// Packs a population id and an in-population neuron index into the
/// single `u32` id synapse-loss accounting keys on.
fn global_neuron_id(population: VertexId, index: usize) -> u32 {
    (population.0 << 16) | (index as u32 & 0xffff)
}

fn projection_synapse_type(target: &str) -> SynapseType {
    match target {
        "excitatory" => SynapseType(0),
        "inhibitory" => SynapseType(1),
        other => SynapseType(other.parse::<u8>().unwrap_or(2)),
    }
}

pub fn run_pipeline(bio: &BioGraph, resources: &WaferResources, config: &PipelineConfig) -> PipelineResult<PipelineResultSet> {
    let mut stats = MappingStats::new();

    // C6: placement.
    let t0 = Instant::now();
    let requests: Vec<NeuronPlacementRequest> = bio
        .vertices()
        .filter(|&v| !bio.is_source(v) && bio.is_physical(v))
        .map(|v| {
            let population = bio.population(v).expect("vertex came from bio.vertices()");
            let mut request = NeuronPlacementRequest::new(v, (0, population.size), config.hw_neuron_size);
            if let Some(pin) = config.pin(v) {
                request = request.with_pin(to_place_pin(pin));
            }
            request
        })
        .collect();
    let (mut placement, placement_losses) = Placer::new().with_requests(requests).place(resources);
    stats.placement.duration = t0.elapsed();
    stats.placement.items_produced = placement.len();
    stats.placement.items_lost = placement_losses.iter().map(|l| l.slice.1 - l.slice.0).sum();
    if !placement_losses.is_empty() {
        log::warn!("{} population slice(s) could not be placed on the wafer", placement_losses.len());
    }

    // C7 + C8: merger-tree routing and L1 address assignment, per HICANN.
    let t0 = Instant::now();
    let mut merger_assignments: HashMap<HicannOnWafer, Vec<MergerAssignment>> = HashMap::new();
    let mut unroutable_blocks: HashMap<HicannOnWafer, Vec<UnroutableNeuronBlock>> = HashMap::new();
    let mut address_pools: HashMap<(HicannOnWafer, DNCMergerOnHICANN), L1AddressPool> = HashMap::new();
    let mut addresses_lost = 0usize;

    for &hicann in resources.present_iter().collect::<Vec<_>>() {
        let mut block_counts = [0usize; 8];
        for block in NeuronBlockOnHICANN::iter_all() {
            block_counts[block.value() as usize] = placement.rows_for_block(hicann, block).count();
        }
        if block_counts.iter().all(|&c| c == 0) {
            continue;
        }

        let router = MergerTreeRouter::new(config.merger_strategy);
        let (assignments, unroutable) = router.route(block_counts);

        for assignment in &assignments {
            for &block_idx in &assignment.blocks {
                let block = NeuronBlockOnHICANN::new(block_idx).expect("router only emits in-range blocks");
                placement.assign_dnc_merger(hicann, block, assignment.dnc);
            }
            let pool = address_pools.entry((hicann, assignment.dnc)).or_default();
            pool.set_mode(Mode::Output)?;
            let logical_ids: Vec<_> = placement.rows_for_dnc_merger(hicann, assignment.dnc).map(|r| r.logical_neuron).collect();
            for logical in logical_ids {
                match pool.pop(config.l1_address_strategy) {
                    Some(address) => placement.set_address(logical, address)?,
                    None => {
                        log::debug!("address pool exhausted on {hicann:?}/{:?}", assignment.dnc);
                        addresses_lost += 1;
                    }
                }
            }
        }

        if !assignments.is_empty() {
            merger_assignments.insert(hicann, assignments);
        }
        if !unroutable.is_empty() {
            log::warn!("{} neuron block(s) unroutable onto a DNC merger on {hicann:?}", unroutable.len());
            unroutable_blocks.insert(hicann, unroutable);
        }
    }
    stats.merging.duration = t0.elapsed();
    stats.merging.items_produced = merger_assignments.values().map(|v| v.len()).sum();
    stats.merging.items_lost = unroutable_blocks.values().map(|v| v.len()).sum();
    stats.addressing.items_lost = addresses_lost;

    // C9: L1 routing, one backbone/Dijkstra run per used DNC merger.
    let t0 = Instant::now();
    let mut graph = L1RoutingGraph::new();
    for &hicann in resources.present_iter() {
        graph.add(hicann, config.switch_ordering);
    }

    let mut routes: HashMap<(HicannOnWafer, DNCMergerOnHICANN), L1RouteTree> = HashMap::new();
    let mut routed_paths: Vec<Vec<usize>> = Vec::new();
    let weights = L1EdgeWeights::new();

    for (&hicann, assignments) in &merger_assignments {
        for assignment in assignments {
            let targets = target_hicanns_for_merger(bio, &placement, hicann, assignment.dnc);
            if targets.is_empty() {
                continue;
            }
            let Ok(source) = graph.hline_vertex(hicann, assignment.dnc.sending_repeater_hline()) else { continue };

            let paths: Vec<(HicannOnWafer, Vec<usize>)> = match config.l1_algorithm {
                L1Algorithm::Backbone => {
                    let mut router = L1BackboneRouter::new(&graph, source)?;
                    for &t in &targets {
                        router.add_target(t);
                    }
                    router.run();
                    targets.iter().filter_map(|&t| router.path_to(t).map(|p| (t, p))).collect()
                }
                L1Algorithm::Dijkstra => {
                    let mut router = L1DijkstraRouter::new(&graph, &weights, source);
                    for &t in &targets {
                        router.add_target(Target::new(t, Orientation::Horizontal));
                    }
                    let result = router.run();
                    targets
                        .iter()
                        .filter_map(|&t| result.path_to(Target::new(t, Orientation::Horizontal)).map(|p| (t, p)))
                        .collect()
                }
            };
            if paths.len() < targets.len() {
                log::warn!("{} of {} L1 route target(s) unreached from {hicann:?}/{:?}", targets.len() - paths.len(), targets.len(), assignment.dnc);
            }

            let mut tree: Option<L1RouteTree> = None;
            for (_, path) in &paths {
                let route = lower_path(&graph, path, Some(assignment.dnc))?;
                routed_paths.push(path.clone());
                match &mut tree {
                    Some(t) => t.add(&route),
                    None => tree = Some(L1RouteTree::new(route)),
                }
            }
            if let Some(tree) = tree {
                routes.insert((hicann, assignment.dnc), tree);
            }
        }
    }

    for path in &routed_paths {
        for &v in path {
            match graph.bus(v) {
                L1Bus::Horizontal(h, line) => {
                    let _ = graph.remove_hline(h, line);
                }
                L1Bus::Vertical(h, line) => {
                    let _ = graph.remove_vline(h, line);
                }
            }
        }
    }

    stats.routing.duration = t0.elapsed();
    stats.routing.items_produced = routes.values().map(|t| t.routes().len()).sum();

    // C10 + C12: synapse-driver allocation and loss accounting, per target
    // HICANN. Each chip is independent, so this fans out with rayon over
    // disjoint per-chip accumulators, merged only after the parallel region
    // closes so no lock is ever taken on the hot path.
    let t0 = Instant::now();
    let target_hicanns: Vec<HicannOnWafer> = bio
        .edge_ids()
        .filter_map(|e| bio.edge(e).ok())
        .flat_map(|view| placement.rows_for_population(view.post).map(|r| r.hicann))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let per_chip: Vec<SynapseLoss> = target_hicanns
        .par_iter()
        .filter_map(|&target_hicann| {
            let events = synapse_events_for_hicann(bio, &placement, target_hicann);
            if events.is_empty() {
                return None;
            }
            let incoming_vline =
                incoming_vline_for_hicann(&routes, target_hicann).unwrap_or_else(|| VLineOnHICANN::new(0).expect("0 in range"));
            let mut chip_loss = SynapseLoss::new();
            allocate_drivers_for_hicann(target_hicann, &events, incoming_vline, resources, &mut chip_loss);
            Some(chip_loss)
        })
        .collect();

    let mut synapse_loss = SynapseLoss::new();
    for chip_loss in per_chip {
        let before = synapse_loss.clone();
        synapse_loss = match synapse_loss.merge(chip_loss) {
            Ok(merged) => merged,
            Err(err) => {
                log::warn!("dropping a chip's synapse accounting after a merge conflict: {err}");
                before
            }
        };
    }
    stats.synapses.duration = t0.elapsed();
    stats.synapses.items_produced = synapse_loss.realized_count();
    stats.synapses.items_lost = synapse_loss.lost_count();

    Ok(PipelineResultSet {
        placement,
        placement_losses,
        merger_assignments,
        unroutable_blocks,
        routes,
        synapse_loss,
        stats,
    })
}

/// Every chip hosting at least one post-synaptic neuron of a projection
/// whose pre-synaptic side has at least one neuron merged onto `dnc` on
/// `source_hicann`.
fn target_hicanns_for_merger(
    bio: &BioGraph,
    placement: &Placement,
    source_hicann: HicannOnWafer,
    dnc: DNCMergerOnHICANN,
) -> Vec<HicannOnWafer> {
    let source_neurons: HashMap<VertexId, BTreeSet<usize>> =
        placement.rows_for_dnc_merger(source_hicann, dnc).fold(HashMap::new(), |mut acc, row| {
            acc.entry(row.bio_neuron.population).or_default().insert(row.bio_neuron.index);
            acc
        });
    if source_neurons.is_empty() {
        return Vec::new();
    }

    let mut targets = BTreeSet::new();
    for edge in bio.edge_ids() {
        let Ok(view) = bio.edge(edge) else { continue };
        let Some(indices) = source_neurons.get(&view.pre) else { continue };
        if indices.range(view.pre_slice.0..view.pre_slice.1).next().is_none() {
            continue;
        }
        for row in placement.rows_for_population(view.post) {
            if row.bio_neuron.index >= view.post_slice.0 && row.bio_neuron.index < view.post_slice.1 && row.hicann != source_hicann {
                targets.insert(row.hicann);
            }
        }
    }
    targets.into_iter().collect()
}

/// One synapse event per placed post neuron on `hicann`, the pre side
/// picked by index modulo the projection's pre-slice width.
fn synapse_events_for_hicann(bio: &BioGraph, placement: &Placement, hicann: HicannOnWafer) -> Vec<SynapseEvent> {
    let mut events = Vec::new();
    for edge in bio.edge_ids() {
        let Ok(view) = bio.edge(edge) else { continue };
        let pre_width = (view.pre_slice.1 - view.pre_slice.0).max(1);
        for row in placement.rows_for_population(view.post) {
            if row.hicann != hicann || row.bio_neuron.index < view.post_slice.0 || row.bio_neuron.index >= view.post_slice.1 {
                continue;
            }
            let offset = (row.bio_neuron.index - view.post_slice.0) % pre_width;
            let pre_index = view.pre_slice.0 + offset;
            let Some(source_row) = placement.by_bio_neuron(whc_place::BioNeuron { population: view.pre, index: pre_index }) else { continue };
            let Some(address) = source_row.address else { continue };
            let decoder = DriverDecoder((address.value() >> 4) & 0x3);
            events.push(SynapseEvent {
                neuron: NeuronOnHicann(row.logical_neuron.0),
                source: global_neuron_id(view.pre, pre_index),
                target: global_neuron_id(view.post, row.bio_neuron.index),
                synapse_type: projection_synapse_type(&view.target),
                decoder,
                stp: StpMode::Off,
            });
        }
    }
    events
}

fn incoming_vline_for_hicann(
    routes: &HashMap<(HicannOnWafer, DNCMergerOnHICANN), L1RouteTree>,
    hicann: HicannOnWafer,
) -> Option<VLineOnHICANN> {
    routes.values().find_map(|tree| {
        tree.routes().into_iter().find_map(|route| {
            if route.target_hicann().ok() != Some(hicann) {
                return None;
            }
            route.segments().iter().rev().find_map(|s| match s {
                L1Segment::VLine(v) => Some(*v),
                _ => None,
            })
        })
    })
}

fn allocate_drivers_for_hicann(
    hicann: HicannOnWafer,
    events: &[SynapseEvent],
    incoming_vline: VLineOnHICANN,
    resources: &WaferResources,
    loss: &mut SynapseLoss,
) {
    let per_neuron: SynapseCounts = count_synapses_per_neuron(events);
    let granularity = InputGranularity::default();
    let max_chain_length = resources.max_chain_length(&hicann);

    let mut best_per_neuron: HashMap<NeuronOnHicann, _> = HashMap::new();
    for (&neuron, counts) in &per_neuron {
        let per_granularity = count_half_rows_per_input_granularity(counts, &granularity);
        best_per_neuron.insert(neuron, whc_synapse::count_half_rows(&per_granularity));
    }
    let global = count_half_rows_vec(&best_per_neuron);
    let per_side = count_half_rows_per_side(&global);
    let rows_per_side = count_rows_per_side(&per_side);
    let per_stp = count_drivers_per_stp(&rows_per_side);
    let total_drivers = count_drivers(&per_stp);

    let side = incoming_vline.to_side_horizontal();
    let rows_needed: usize = rows_per_side.iter().filter(|&(&(s, _), _)| s == side).map(|(_, &r)| r).sum();
    let available = |d: &whc_coords::SynapseDriverOnHICANN| {
        resources.defects(&hicann).map(|def| !def.is_synapse_driver_disabled(d)).unwrap_or(true)
    };
    let chain = if total_drivers == 0 || !whc_synapse::drivers_possible(total_drivers, max_chain_length) {
        None
    } else {
        allocate_chain(incoming_vline, rows_needed, available)
    };

    for event in events {
        if chain.is_some() {
            let _ = loss.add_realized(event.source, event.target, 1.0);
        } else {
            let _ = loss.add_loss(event.source, event.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_graph::Population;

    fn hicann(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    fn wafer() -> WaferResources {
        let mut w = WaferResources::new();
        w.load_hicann(hicann(17, 8));
        w.load_hicann(hicann(18, 8));
        w
    }

    #[test]
    fn pipeline_places_and_routes_a_small_network() {
        let mut bio = BioGraph::new();
        let pre = bio.add_population(Population::new("pre", 4));
        let post = bio.add_population(Population::new("post", 4));
        bio.add_edge(whc_graph::bio::ProjectionView {
            pre,
            post,
            pre_slice: (0, 4),
            post_slice: (0, 4),
            target: "excitatory".into(),
        })
        .unwrap();

        let resources = wafer();
        let config = PipelineConfig::new();
        let result = run_pipeline(&bio, &resources, &config).unwrap();

        assert!(result.placement_losses.is_empty());
        assert!(!result.merger_assignments.is_empty());
    }
}
