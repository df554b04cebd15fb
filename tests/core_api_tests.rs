use rand::rngs::StdRng;
use rand::SeedableRng;
use sword_manager::loader::{
    format_outcome, parse_workload, random_workload, write_workload, WorkloadShape,
};
use sword_manager::{
    simulate_file, EngineConfig, EngineError, Error, Fingerprint, SimulationEngine, Workload,
};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn answer_lines(engine: &SimulationEngine) -> Vec<String> {
    engine.outcomes().iter().map(format_outcome).collect()
}

fn expected_lines(name: &str) -> Vec<String> {
    std::fs::read_to_string(fixture(name))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Straight-line model of the service: each class serves its requests in
/// order, joining the last cleaning if it has not finished before the
/// request arrives. Outcomes are then listed by completion time, ties in
/// arrival order.
fn reference_answers(workload: &Workload) -> Vec<(u64, u64, Fingerprint)> {
    let mut last_completion = std::collections::HashMap::new();
    for sword in &workload.swords {
        last_completion.insert(sword.fingerprint(), (sword.state.dirty_level, sword));
    }

    let mut answers: Vec<(u64, u64, Fingerprint)> = workload
        .requests
        .iter()
        .map(|request| {
            let class = request.fingerprint();
            let (current, sword) = last_completion.get_mut(&class).unwrap();
            let completion = match *current {
                Some(end) if end >= request.arrival_time => end,
                _ => request.arrival_time + sword.cleaning_duration,
            };
            *current = Some(completion);
            (completion, completion - request.arrival_time, class)
        })
        .collect();

    answers.sort_by_key(|answer| answer.0);
    answers
}

#[test]
fn test_sample_file_matches_answers() {
    let engine = simulate_file(&fixture("sample.in"), EngineConfig::default()).unwrap();
    assert_eq!(answer_lines(&engine), expected_lines("sample.out"));
    assert!(engine.is_finished());
}

#[test]
fn test_dirty_sword_file_matches_answers() {
    let engine = simulate_file(&fixture("dirty_overlap.in"), EngineConfig::default()).unwrap();
    assert_eq!(answer_lines(&engine), expected_lines("dirty_overlap.out"));
}

#[test]
fn test_small_containers_give_same_answers() {
    let config = EngineConfig::new()
        .with_table_capacity(1)
        .with_queue_capacity(1);
    let engine = simulate_file(&fixture("sample.in"), config).unwrap();
    assert_eq!(answer_lines(&engine), expected_lines("sample.out"));
}

#[test]
fn test_time_limit_through_file() {
    let config = EngineConfig::new().with_time_limit(4);
    let engine = simulate_file(&fixture("sample.in"), config).unwrap();

    assert_eq!(answer_lines(&engine), expected_lines("sample.out")[..3]);
    assert!(!engine.is_finished());
}

#[test]
fn test_malformed_file_reports_line() {
    match simulate_file(&fixture("malformed.in"), EngineConfig::default()) {
        Err(Error::InputMalformed { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected InputMalformed, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let result = simulate_file(&fixture("does_not_exist.in"), EngineConfig::default());
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_path_is_read_verbatim() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = std::env::temp_dir().join(format!("sword_manager_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(OsStr::from_bytes(b"sample-\xff.in"));
    std::fs::copy(fixture("sample.in"), &path).unwrap();

    let result = simulate_file(&path, EngineConfig::default());
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(answer_lines(&result.unwrap()), expected_lines("sample.out"));
}

#[test]
fn test_request_for_unstocked_class_fails() {
    let text = "1 1\n-1, 5, 100, 80, 30, 12, 3, \"Longclaw\", \"\", \"\", \"bastard\"\n0, 100, 12, 4, \"bastard\"\n";
    let workload = parse_workload(text).unwrap();
    let mut engine = SimulationEngine::from_workload(workload, EngineConfig::default()).unwrap();

    assert_eq!(
        engine.run().unwrap_err(),
        EngineError::UnknownSwordClass(Fingerprint::derive(100, 12, 4, "bastard"))
    );
}

#[test]
fn test_generated_workloads_match_reference_model() {
    let mut rng = StdRng::seed_from_u64(2024);
    for round in 0..20 {
        let shape = WorkloadShape {
            swords: 1 + round,
            requests: 50 * (round + 1),
            max_gap: (round % 4) as u64,
            max_duration: 12,
            dirty_ratio: 0.4,
        };
        let workload = random_workload(&mut rng, &shape);
        let expected = reference_answers(&workload);

        // go through the text format so the parser is exercised as well
        let reparsed = parse_workload(&write_workload(&workload)).unwrap();
        let mut engine = SimulationEngine::from_workload(reparsed, EngineConfig::default()).unwrap();
        let actual: Vec<_> = engine
            .run()
            .unwrap()
            .iter()
            .map(|outcome| (outcome.completion_time, outcome.latency, outcome.fingerprint()))
            .collect();

        assert_eq!(actual, expected, "round {}", round);
    }
}

#[test]
fn test_runs_are_repeatable() {
    let mut rng = StdRng::seed_from_u64(7);
    let workload = random_workload(&mut rng, &WorkloadShape::default());

    let run = |workload: Workload| {
        let mut engine = SimulationEngine::from_workload(workload, EngineConfig::default()).unwrap();
        engine.run().unwrap().to_vec()
    };

    let first = run(workload.clone());
    assert_eq!(first.len(), workload.requests.len());
    assert_eq!(first, run(workload));
}
