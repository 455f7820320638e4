//! Plain-text reports written to a caller-supplied sink.

use std::io::{self, Write};

use super::{AssignmentReport, CliqueRanking};
use crate::models::{Clique, Node};

/// Writes the ranking, one clique per line, marking the best entry and any
/// `highlights` (e.g. the cliques found by the two search modes).
pub fn write_ranking<W: Write>(
    out: &mut W,
    ranking: &CliqueRanking,
    highlights: &[(&str, &Clique)],
) -> io::Result<()> {
    writeln!(out, "Cliques ranked: {}", ranking.len())?;
    for (i, entry) in ranking.entries().iter().enumerate() {
        write!(
            out,
            "{:>4}. {} cost {}",
            i + 1,
            format_nodes(entry.clique.nodes()),
            entry.cost
        )?;
        if entry.estimated {
            write!(out, " (estimated)")?;
        }
        write!(out, " optimality {:.2}", entry.optimality)?;
        if i == 0 {
            write!(out, " BEST")?;
        }
        for (label, clique) in highlights {
            if &entry.clique == *clique {
                write!(out, " {label}")?;
            }
        }
        writeln!(out)?;
    }
    for (label, clique) in highlights {
        match ranking.factor_of(clique) {
            Some(f) => writeln!(out, "{label} optimality: {f:.2}")?,
            None => writeln!(out, "{label} optimality: not ranked")?,
        }
    }
    Ok(())
}

/// Writes one block per assignment strategy.
pub fn write_comparison<W: Write>(out: &mut W, reports: &[AssignmentReport]) -> io::Result<()> {
    for r in reports {
        writeln!(out, "{} heuristic cost: {}", r.algorithm, r.heuristic_cost)?;
        writeln!(out, "{} time (s): {:.2}", r.algorithm, r.solve_secs)?;
        match r.exact_cost {
            Some(c) => writeln!(out, "{} exact cost: {c}", r.algorithm)?,
            None => writeln!(out, "{} exact cost: not found", r.algorithm)?,
        }
        writeln!(out, "{} goals: {}", r.algorithm, format_nodes(&r.goals))?;
    }
    Ok(())
}

pub(crate) fn format_nodes(nodes: &[Node]) -> String {
    let parts: Vec<String> = nodes.iter().map(Node::to_string).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RankedClique;
    use crate::assignment::AssignmentAlgorithm;
    use crate::models::Assignment;

    fn entry(nodes: Vec<Node>, cost: u64, estimated: bool) -> RankedClique {
        RankedClique {
            clique: Clique::from_nodes(nodes),
            assignment: Assignment::identity(1),
            heuristic_cost: cost,
            cost,
            estimated,
            optimality: 0.0,
        }
    }

    #[test]
    fn test_ranking_report() {
        let a = vec![Node::new(0, 0)];
        let b = vec![Node::new(1, 0)];
        let ranking = CliqueRanking::from_entries(vec![entry(b.clone(), 9, true), entry(a.clone(), 3, false)]);
        let informed = Clique::from_nodes(a);
        let mut out = Vec::new();
        write_ranking(&mut out, &ranking, &[("informed", &informed)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Cliques ranked: 2");
        assert_eq!(lines[1], "   1. [(0 0)] cost 3 optimality 1.00 BEST informed");
        assert_eq!(lines[2], "   2. [(1 0)] cost 9 (estimated) optimality 0.00");
        assert_eq!(lines[3], "informed optimality: 1.00");
    }

    #[test]
    fn test_comparison_report() {
        let report = AssignmentReport {
            algorithm: AssignmentAlgorithm::Random,
            assignment: Assignment::identity(1),
            goals: vec![Node::new(2, 3)],
            heuristic_cost: 4,
            exact_cost: None,
            solve_secs: 0.0,
        };
        let mut out = Vec::new();
        write_comparison(&mut out, &[report]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("RANDOM heuristic cost: 4\n"));
        assert!(text.contains("RANDOM exact cost: not found\n"));
        assert!(text.contains("RANDOM goals: [(2 3)]\n"));
    }
}
