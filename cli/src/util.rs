/// Split a trace argument into node names.
///
/// Accepts `A->B->C`, `A,B,C` and `A B C`. A lone `-` or `>` is a node name,
/// not a separator.
pub fn parse_trace(arg: &str) -> Vec<String> {
    arg.split("->")
        .flat_map(|part| part.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render node names as `A -> B -> C`.
pub fn format_trace<S: AsRef<str>>(nodes: &[S]) -> String {
    nodes
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(" -> ")
}
