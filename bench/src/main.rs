use latency_trace_core::{Graph, TracingEngine, WalkBound};
use std::time::Instant;

/// Walk enumerations on large graphs explode quickly; keep each one bounded.
const STEP_LIMIT: u64 = 50_000_000;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: latency-trace-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  ring        Directed ring with skip edges (long cycles)");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!();
        println!("Default node_count: 100000");
        return;
    }

    if node_count < 2 {
        eprintln!("node_count must be at least 2");
        return;
    }

    println!("latency-trace-bench");
    println!("===================");
    println!();

    let generators: Vec<(&str, fn(u32) -> Graph)> = match mode {
        "ring" => vec![("Ring with skips", gen_ring)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "all" => vec![
            ("Ring with skips", gen_ring as fn(u32) -> Graph),
            ("Erdos-Renyi random", gen_random),
            ("Small-world (Watts-Strogatz)", gen_small_world),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

fn run_benchmark(name: &str, generator: fn(u32) -> Graph, node_count: u32) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges, ~{:.1}MB",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    let engine = TracingEngine::new(&graph).with_step_limit(Some(STEP_LIMIT));
    let start = node_name(0);
    let far = node_name(node_count - 1);

    println!();
    let t = Instant::now();
    let trace = engine.shortest_trace(&start, &far);
    let elapsed = t.elapsed();
    match trace {
        Some(tr) => println!(
            "Shortest trace {} -> {}: latency {} over {} hops in {:.1}ms",
            start,
            far,
            tr.latency,
            tr.path.len() - 1,
            elapsed.as_secs_f64() * 1000.0
        ),
        None => println!(
            "Shortest trace {} -> {}: no trace ({:.1}ms)",
            start,
            far,
            elapsed.as_secs_f64() * 1000.0
        ),
    }

    let t = Instant::now();
    let cycle = engine.find_shortest_trace(&start, &start);
    println!(
        "Shortest cycle through {}: {} ({:.1}ms)",
        start,
        cycle,
        t.elapsed().as_secs_f64() * 1000.0
    );

    // Walk counts from node 0 back to itself
    println!();
    println!("{:>14} {:>12} {:>14} {:>10}", "bound", "matches", "steps", "time");
    println!("{:->14} {:->12} {:->14} {:->10}", "", "", "", "");

    let bounds = [
        WalkBound::MaxHops(4),
        WalkBound::MaxHops(6),
        WalkBound::FixedHops(6),
        WalkBound::MaxLatency(50),
        WalkBound::MaxLatency(100),
    ];
    for bound in bounds {
        let t = Instant::now();
        let result = engine.walks(&start, &start, bound);
        let elapsed = t.elapsed();
        println!(
            "{:>14} {:>12} {:>14} {:>8.1}ms{}",
            describe(bound),
            result.matches,
            result.steps,
            elapsed.as_secs_f64() * 1000.0,
            if result.truncated { " (truncated)" } else { "" }
        );
    }
    println!();
}

fn describe(bound: WalkBound) -> String {
    match bound {
        WalkBound::MaxHops(h) => format!("hops<={}", h),
        WalkBound::FixedHops(h) => format!("hops=={}", h),
        WalkBound::MaxLatency(l) => format!("latency<{}", l),
    }
}

fn node_name(i: u32) -> String {
    format!("svc{}", i)
}

// ---------------------------------------------------------------------------
// Generators: O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Call latency in 1..=20.
    fn latency(&mut self) -> u64 {
        self.next(20) + 1
    }
}

/// Intern every node up front so node IDs match their index.
fn with_nodes(node_count: u32) -> Graph {
    let mut graph = Graph::with_capacity(node_count as usize);
    for i in 0..node_count {
        graph.intern(&node_name(i));
    }
    graph
}

/// Directed ring: each node calls its successor, plus a skip edge every few nodes.
///
/// Every node lies on a cycle, so cycle queries always succeed, and the skip
/// edges give the walk counters more than one way around.
fn gen_ring(node_count: u32) -> Graph {
    let mut graph = with_nodes(node_count);
    let mut rng = FastRng::new(42);

    for i in 0..node_count {
        let next = (i + 1) % node_count;
        graph.add_edge_ids(i, next, rng.latency());
        if i % 3 == 0 {
            let skip = (i + 7) % node_count;
            graph.add_edge_ids(i, skip, rng.latency());
        }
    }

    graph
}

/// Erdos-Renyi: uniform random edges, ~4 outgoing calls per node on average.
fn gen_random(node_count: u32) -> Graph {
    let mut graph = with_nodes(node_count);
    let mut rng = FastRng::new(54321);
    let n = node_count as u64;

    for _ in 0..n * 4 {
        let from = rng.next(n) as u32;
        let to = rng.next(n) as u32;
        if from != to {
            graph.add_edge_ids(from, to, rng.latency());
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each node calls its K nearest successors; each call is rewired to a random
/// node with probability p. High clustering, short traces.
fn gen_small_world(node_count: u32) -> Graph {
    let k = 3u32;
    let p = 0.05f64;
    let mut graph = with_nodes(node_count);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let latency = rng.latency();

            if rng.next_f64() < p {
                let rewired = rng.next(node_count as u64) as u32;
                if rewired != i {
                    graph.add_edge_ids(i, rewired, latency);
                } else {
                    graph.add_edge_ids(i, neighbor, latency);
                }
            } else {
                graph.add_edge_ids(i, neighbor, latency);
            }
        }
    }

    graph
}
