//! Successive shortest path min-cost flow solver.
//!
//! Supplies are gathered behind an internal super source / super sink pair and
//! flow is augmented along cheapest residual paths found by Dijkstra over
//! reduced costs. Node potentials keep reduced costs non-negative, which holds
//! initially because arc costs must be non-negative.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::solver::{ArcIndex, MinCostFlowSolver, SolveStatus};

const INF: i64 = i64::MAX;

#[derive(Debug, Clone, Copy)]
struct Arc {
    tail: usize,
    head: usize,
    capacity: i64,
    cost: i64,
}

#[derive(Debug, Clone, Copy)]
struct ResidualEdge {
    to: usize,
    /// Index of the paired edge in `graph[to]`.
    rev: usize,
    cap: i64,
    cost: i64,
}

#[derive(Debug, Default, Clone)]
pub struct SuccessiveShortestPaths {
    arcs: Vec<Arc>,
    supply: Vec<i64>,
    flows: Vec<i64>,
    total_cost: i64,
}

impl SuccessiveShortestPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_nodes(&self) -> usize {
        let from_arcs = self
            .arcs
            .iter()
            .map(|a| a.tail.max(a.head) + 1)
            .max()
            .unwrap_or(0);
        from_arcs.max(self.supply.len())
    }

    fn ensure_node(&mut self, node: usize) {
        if self.supply.len() <= node {
            self.supply.resize(node + 1, 0);
        }
    }

    fn run(&mut self) -> SolveStatus {
        if self.arcs.iter().any(|a| a.capacity < 0 || a.cost < 0) {
            return SolveStatus::BadCostRange;
        }

        let mut balance: i64 = 0;
        let mut required: i64 = 0;
        for &s in &self.supply {
            balance = match balance.checked_add(s) {
                Some(b) => b,
                None => return SolveStatus::BadCostRange,
            };
            if s > 0 {
                required = required.saturating_add(s);
            }
        }
        if balance != 0 {
            return SolveStatus::Unbalanced;
        }

        let n = self.num_nodes();
        let source = n;
        let sink = n + 1;
        let mut graph: Vec<Vec<ResidualEdge>> = vec![Vec::new(); n + 2];
        let mut arc_slot: Vec<(usize, usize)> = Vec::with_capacity(self.arcs.len());

        for arc in &self.arcs {
            arc_slot.push(add_edge(&mut graph, arc.tail, arc.head, arc.capacity, arc.cost));
        }
        for (node, &s) in self.supply.iter().enumerate() {
            if s > 0 {
                add_edge(&mut graph, source, node, s, 0);
            } else if s < 0 {
                add_edge(&mut graph, node, sink, -s, 0);
            }
        }

        let mut potential = vec![0i64; n + 2];
        let mut routed: i64 = 0;
        let mut total_cost: i64 = 0;

        while routed < required {
            let Some((dist, prev)) = shortest_paths(&graph, &potential, source) else {
                return SolveStatus::BadCostRange;
            };
            if dist[sink] == INF {
                return SolveStatus::Infeasible;
            }
            for (p, &d) in potential.iter_mut().zip(&dist) {
                if d != INF {
                    *p = match p.checked_add(d) {
                        Some(v) => v,
                        None => return SolveStatus::BadCostRange,
                    };
                }
            }

            let mut push = required - routed;
            let mut v = sink;
            while v != source {
                let (u, e) = prev[v];
                push = push.min(graph[u][e].cap);
                v = u;
            }

            let mut v = sink;
            while v != source {
                let (u, e) = prev[v];
                let rev = graph[u][e].rev;
                graph[u][e].cap -= push;
                graph[v][rev].cap += push;
                let step = match graph[u][e].cost.checked_mul(push) {
                    Some(c) => c,
                    None => return SolveStatus::BadCostRange,
                };
                total_cost = match total_cost.checked_add(step) {
                    Some(c) => c,
                    None => return SolveStatus::BadCostRange,
                };
                v = u;
            }
            routed += push;
        }

        self.flows = self
            .arcs
            .iter()
            .zip(&arc_slot)
            .map(|(arc, &(u, e))| arc.capacity - graph[u][e].cap)
            .collect();
        self.total_cost = total_cost;
        SolveStatus::Optimal
    }
}

fn add_edge(
    graph: &mut [Vec<ResidualEdge>],
    from: usize,
    to: usize,
    cap: i64,
    cost: i64,
) -> (usize, usize) {
    let fwd = graph[from].len();
    let back = graph[to].len() + usize::from(from == to);
    graph[from].push(ResidualEdge {
        to,
        rev: back,
        cap,
        cost,
    });
    graph[to].push(ResidualEdge {
        to: from,
        rev: fwd,
        cap: 0,
        cost: -cost,
    });
    (from, fwd)
}

/// Dijkstra over reduced costs. Returns `None` if a distance overflows.
fn shortest_paths(
    graph: &[Vec<ResidualEdge>],
    potential: &[i64],
    source: usize,
) -> Option<(Vec<i64>, Vec<(usize, usize)>)> {
    let n = graph.len();
    let mut dist = vec![INF; n];
    let mut prev = vec![(usize::MAX, usize::MAX); n];
    let mut heap = BinaryHeap::new();
    dist[source] = 0;
    heap.push(Reverse((0i64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for (i, edge) in graph[u].iter().enumerate() {
            if edge.cap <= 0 {
                continue;
            }
            let reduced = edge.cost + potential[u] - potential[edge.to];
            let nd = d.checked_add(reduced)?;
            if nd < dist[edge.to] {
                dist[edge.to] = nd;
                prev[edge.to] = (u, i);
                heap.push(Reverse((nd, edge.to)));
            }
        }
    }
    Some((dist, prev))
}

impl MinCostFlowSolver for SuccessiveShortestPaths {
    fn add_arc_with_capacity_and_unit_cost(
        &mut self,
        tail: usize,
        head: usize,
        capacity: i64,
        unit_cost: i64,
    ) -> ArcIndex {
        self.ensure_node(tail.max(head));
        self.arcs.push(Arc {
            tail,
            head,
            capacity,
            cost: unit_cost,
        });
        self.arcs.len() - 1
    }

    fn set_node_supply(&mut self, node: usize, supply: i64) {
        self.ensure_node(node);
        self.supply[node] = supply;
    }

    fn solve(&mut self) -> SolveStatus {
        self.flows.clear();
        self.total_cost = 0;
        let status = self.run();
        if !status.is_optimal() {
            self.flows.clear();
        }
        status
    }

    fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    fn tail(&self, arc: ArcIndex) -> usize {
        self.arcs[arc].tail
    }

    fn head(&self, arc: ArcIndex) -> usize {
        self.arcs[arc].head
    }

    fn flow(&self, arc: ArcIndex) -> i64 {
        self.flows.get(arc).copied().unwrap_or(0)
    }

    fn optimal_cost(&self) -> i64 {
        self.total_cost
    }
}
