//! Property-based tests for ccprop
//!
//! Checks the propagation against a union-find oracle and verifies that every
//! strategy and worker count produces the same labelling.

use std::sync::Arc;

use ccprop::algorithms::cc::{SequentialScan, StaticTeam, WorkStealing};
use ccprop::algorithms::count::{component_sizes, count_components, same_partition};
use ccprop::{CCConfig, CCController, CSRGraph, Propagation, StrategyKind, CC};
use proptest::prelude::*;

/// Graphs with 0..40 vertices and up to 80 random (possibly looping) edges.
fn prop_graph() -> impl Strategy<Value = (usize, Vec<(u32, u32)>)> {
    (0usize..40).prop_flat_map(|vertex_count| {
        let max_node = vertex_count.max(1) as u32;
        let edges = if vertex_count == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..max_node, 0..max_node), 0..80).boxed()
        };
        (Just(vertex_count), edges)
    })
}

/// Smallest vertex id of every vertex's component, computed with union-find.
fn oracle_labels(vertex_count: usize, edges: &[(u32, u32)]) -> Vec<u32> {
    fn find(parent: &mut [usize], mut vertex: usize) -> usize {
        while parent[vertex] != vertex {
            parent[vertex] = parent[parent[vertex]];
            vertex = parent[vertex];
        }
        vertex
    }

    let mut parent: Vec<usize> = (0..vertex_count).collect();
    for &(src, dst) in edges {
        let a = find(&mut parent, src as usize);
        let b = find(&mut parent, dst as usize);
        // Keep the smaller id as root so the root is the component minimum.
        if a < b {
            parent[b] = a;
        } else {
            parent[a] = b;
        }
    }
    (0..vertex_count)
        .map(|vertex| find(&mut parent, vertex) as u32)
        .collect()
}

fn all_configs() -> Vec<CCConfig> {
    let mut configs = vec![CCConfig::default()];
    for thread_num in [1, 2, 5] {
        for strategy in [StrategyKind::Chunked, StrategyKind::Team, StrategyKind::WorkStealing] {
            configs.push(CCConfig {
                strategy,
                thread_num: Some(thread_num),
            });
        }
    }
    configs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_from_edges_valid_csr((vertex_count, edges) in prop_graph()) {
        let graph = CSRGraph::from_edges(vertex_count, &edges).unwrap();
        prop_assert_eq!(graph.offsets.len(), vertex_count + 1);
        prop_assert_eq!(graph.offsets[0], 0);
        prop_assert!(graph.offsets.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert_eq!(*graph.offsets.last().unwrap(), graph.neighbor_list.len());
        prop_assert!(graph.neighbor_list.iter().all(|&v| (v as usize) < vertex_count));

        let loops = edges.iter().filter(|(src, dst)| src == dst).count();
        prop_assert_eq!(graph.edge_count(), 2 * (edges.len() - loops));

        let rebuilt = CSRGraph::from_parts(vertex_count, graph.offsets.clone(), graph.neighbor_list.clone());
        prop_assert_eq!(rebuilt, Ok(graph));
    }

    #[test]
    fn prop_matches_union_find((vertex_count, edges) in prop_graph()) {
        let graph = CSRGraph::from_edges(vertex_count, &edges).unwrap();
        let result = Propagation::new(&graph, SequentialScan).run();
        let expected = oracle_labels(vertex_count, &edges);
        prop_assert_eq!(&result.labels, &expected);
        prop_assert!(result.iterations <= vertex_count);
        prop_assert_eq!(result.iterations == 0, vertex_count == 0);
    }

    #[test]
    fn prop_strategies_agree((vertex_count, edges) in prop_graph()) {
        let controller = CCController::new(Arc::new(CSRGraph::from_edges(vertex_count, &edges).unwrap()));
        let baseline = controller.cc(&CCConfig::default()).unwrap();
        for config in all_configs() {
            let result = controller.cc(&config).unwrap();
            prop_assert_eq!(&result.labels, &baseline.labels, "{:?}", config);
            prop_assert_eq!(result.iterations, baseline.iterations, "{:?}", config);
        }
    }

    #[test]
    fn prop_fixed_point_is_idempotent((vertex_count, edges) in prop_graph()) {
        prop_assume!(vertex_count > 0);
        let graph = CSRGraph::from_edges(vertex_count, &edges).unwrap();
        let first = Propagation::new(&graph, SequentialScan).run();

        let again = Propagation::resume(&graph, StaticTeam::new(Some(3)).unwrap(), first.labels.clone())
            .unwrap()
            .run();
        prop_assert_eq!(again.iterations, 1);
        prop_assert_eq!(again.labels, first.labels);
    }

    #[test]
    fn prop_labels_never_grow((vertex_count, edges) in prop_graph()) {
        let graph = CSRGraph::from_edges(vertex_count, &edges).unwrap();
        let strategy = WorkStealing::new(Some(2)).unwrap().with_min_len(1);
        let mut propagation = Propagation::new(&graph, strategy);
        let mut previous = propagation.labels().to_vec();
        while propagation.step() {
            let labels = propagation.labels();
            prop_assert!(previous.iter().zip(labels).all(|(old, new)| new <= old));
            previous = labels.to_vec();
        }
        prop_assert!(propagation.iterations() <= vertex_count);
    }

    #[test]
    fn prop_count_is_permutation_invariant(
        (labels, shuffled) in prop::collection::vec(0u32..20, 0..60)
            .prop_flat_map(|labels| (Just(labels.clone()), Just(labels).prop_shuffle()))
    ) {
        prop_assert_eq!(count_components(&labels), count_components(&shuffled));
        prop_assert_eq!(component_sizes(&labels), component_sizes(&shuffled));
    }

    #[test]
    fn prop_relabelling_keeps_partition(labels in prop::collection::vec(0u32..20, 0..60)) {
        let renamed: Vec<u32> = labels.iter().map(|&label| 1000 - label).collect();
        prop_assert!(same_partition(&labels, &renamed));
        prop_assert_eq!(count_components(&labels), count_components(&renamed));
    }
}
