use crate::algos::StopReason;
use crate::orchestrate::{GroupOutcome, Pipeline};
use crate::scoring::Weights;
use crate::stats;

fn stop_reason(stop: StopReason) -> &'static str {
    match stop {
        StopReason::GoodEnough => "good enough",
        StopReason::NoImprovement => "no improving swap",
        StopReason::IterationCap => "iteration cap reached",
    }
}

pub fn display_details(outcomes: &[GroupOutcome]) {
    for outcome in outcomes {
        let group = &outcome.group;
        println!("{}:", group.name);
        for (index, team) in outcome.partition.teams.iter().enumerate() {
            let mut members = team.iter().map(|&s| group.student(s)).collect::<Vec<_>>();
            members.sort_by_key(|s| s.name.clone());
            println!("  Team {}:", index + 1);
            for s in members {
                println!("    - {} ({}, {}, {:.2})", s, s.school, s.gender, s.cgpa);
            }
        }
        if let Some(report) = &outcome.report {
            if !report.history.is_empty() {
                let trail = std::iter::once(report.initial_score)
                    .chain(report.history.iter().copied())
                    .map(|score| format!("{score:.2}"))
                    .collect::<Vec<_>>();
                println!("  Scores after each swap: {}", trail.join(" -> "));
            }
        }
        println!();
    }
}

pub fn display_stats(outcomes: &[GroupOutcome], weights: Weights) {
    for outcome in outcomes {
        let stats = stats::statistics(&outcome.group, &outcome.partition, weights);
        println!(
            "{}: {} students in {} teams ({:.3}s)",
            outcome.group.name,
            outcome.group.len(),
            stats.teams.len(),
            outcome.elapsed.as_secs_f64()
        );
        println!(
            "  diversity penalty {}, CGPA variance {:.4}, weighted score {:.4}",
            stats.diversity, stats.cgpa_variance, stats.objective
        );
        if let Some(report) = &outcome.report {
            println!(
                "  optimization: {} swaps in {} iterations, {:.4} -> {:.4} ({})",
                report.swaps,
                report.iterations,
                report.initial_score,
                report.final_score,
                stop_reason(report.stop)
            );
        }
        for (index, team) in stats.teams.iter().enumerate() {
            print!(
                "  - team {}: {}, average CGPA {}",
                index + 1,
                team.composition(),
                team.average_cgpa
                    .map_or_else(|| "n/a".to_owned(), |a| format!("{a:.2}"))
            );
            if team.school_majority {
                print!(" (school majority)");
            }
            println!();
        }
    }
}

/// One line per pipeline, summing up every tutorial group.
pub fn display_comparison(results: &[(Pipeline, Vec<GroupOutcome>)], weights: Weights) {
    println!("Pipeline comparison (totals over all tutorial groups):");
    for (pipeline, outcomes) in results {
        let all = outcomes
            .iter()
            .map(|o| stats::statistics(&o.group, &o.partition, weights))
            .collect::<Vec<_>>();
        let groups = all.len().max(1) as f64;
        println!(
            "  - {:<16} diversity {:>5}, mean CGPA variance {:.4}, \
             school majorities {:>3}, single-gender teams {:>3}, time {:.3}s",
            pipeline.label,
            all.iter().map(|s| s.diversity).sum::<u32>(),
            all.iter().map(|s| s.cgpa_variance).sum::<f64>() / groups,
            all.iter().map(|s| s.school_majorities).sum::<usize>(),
            all.iter().map(|s| s.single_gender).sum::<usize>(),
            outcomes
                .iter()
                .map(|o| o.elapsed.as_secs_f64())
                .sum::<f64>()
        );
    }
}
