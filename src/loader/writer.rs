use crate::core::types::{Outcome, Workload};

/// Render an outcome the way answer files list them:
/// `completion, latency, total, throughput, speed, "style"`
pub fn format_outcome(outcome: &Outcome) -> String {
    let sword = &outcome.sword;
    format!(
        "{}, {}, {}, {}, {}, \"{}\"",
        outcome.completion_time,
        outcome.latency,
        sword.total_capacity,
        sword.throughput,
        sword.speed,
        sword.style
    )
}

/// Render a workload in the input format read by `parse_workload`
pub fn write_workload(workload: &Workload) -> String {
    let mut lines = Vec::with_capacity(1 + workload.swords.len() + workload.requests.len());
    lines.push(format!("{} {}", workload.swords.len(), workload.requests.len()));

    for sword in &workload.swords {
        let state = match sword.state.dirty_level {
            Some(level) => level.to_string(),
            None => "-1".to_string(),
        };
        lines.push(format!(
            "{}, {}, {}, {}, {}, {}, {}, \"{}\", \"{}\", \"{}\", \"{}\"",
            state,
            sword.cleaning_duration,
            sword.total_capacity,
            sword.remaining_capacity,
            sword.length,
            sword.throughput,
            sword.speed,
            sword.name,
            sword.description,
            sword.comments,
            sword.style
        ));
    }

    for request in &workload.requests {
        lines.push(format!(
            "{}, {}, {}, {}, \"{}\"",
            request.arrival_time,
            request.total_capacity,
            request.throughput,
            request.speed,
            request.style
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
