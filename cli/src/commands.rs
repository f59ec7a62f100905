use latency_trace_core::{Latency, TracingEngine, WalkBound};

use crate::output::QueryResult;
use crate::util::format_trace;

pub fn trace_latency(engine: &TracingEngine<'_>, trace: &[String]) -> QueryResult {
    QueryResult::new(
        format!("Trace latency {}", format_trace(trace)),
        engine.trace_latency(trace),
    )
}

pub fn max_hops(engine: &TracingEngine<'_>, start: &str, end: &str, hops: u32) -> QueryResult {
    walks(
        engine,
        format!("Traces {} -> {} with at most {} hops", start, end, hops),
        start,
        end,
        WalkBound::MaxHops(hops),
    )
}

pub fn fixed_hops(engine: &TracingEngine<'_>, start: &str, end: &str, hops: u32) -> QueryResult {
    walks(
        engine,
        format!("Traces {} -> {} with exactly {} hops", start, end, hops),
        start,
        end,
        WalkBound::FixedHops(hops),
    )
}

pub fn max_latency(
    engine: &TracingEngine<'_>,
    start: &str,
    end: &str,
    latency: Latency,
) -> QueryResult {
    walks(
        engine,
        format!("Traces {} -> {} with latency below {}", start, end, latency),
        start,
        end,
        WalkBound::MaxLatency(latency),
    )
}

pub fn shortest(engine: &TracingEngine<'_>, start: &str, end: &str) -> QueryResult {
    let trace = engine.shortest_trace(start, end);
    let path = trace.as_ref().map(|t| {
        engine
            .path_names(&t.path)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
    });
    QueryResult::new(
        format!("Shortest trace {} -> {}", start, end),
        trace.map(|t| t.latency),
    )
    .with_path(path)
}

/// The fixed set of sample queries run against the reference graph.
pub fn report(engine: &TracingEngine<'_>) -> Vec<QueryResult> {
    let traces: [&[&str]; 5] = [
        &["A", "B", "C"],
        &["A", "D"],
        &["A", "D", "C"],
        &["A", "E", "B", "C", "D"],
        &["A", "E", "D"],
    ];

    let mut results: Vec<QueryResult> = traces
        .iter()
        .map(|trace| {
            let owned: Vec<String> = trace.iter().map(|s| s.to_string()).collect();
            trace_latency(engine, &owned)
        })
        .collect();

    results.push(max_hops(engine, "C", "C", 3));
    results.push(fixed_hops(engine, "A", "C", 4));
    results.push(shortest(engine, "A", "C"));
    results.push(shortest(engine, "B", "B"));
    results.push(max_latency(engine, "C", "C", 30));
    results
}

fn walks(
    engine: &TracingEngine<'_>,
    query: String,
    start: &str,
    end: &str,
    bound: WalkBound,
) -> QueryResult {
    let count = engine.walks(start, end, bound);
    QueryResult::new(query, Some(count.matches)).truncated(count.truncated)
}
