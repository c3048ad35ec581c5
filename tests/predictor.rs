
use lgehl_predictor::*;
use proptest::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

fn record(pc_sel: u32, kind_sel: u8) -> BranchRecord {
    let pc = 0x0040_0000 + pc_sel * 0x24 + (pc_sel & 1);
    let kind = match kind_sel {
        0 | 1 => BranchKind::Conditional,
        2 => BranchKind::DirectCall,
        _ => BranchKind::Return,
    };
    BranchRecord::new(pc, kind)
}

fn run(p: &mut LGEHLPredictor, stream: &[(BranchRecord, Outcome)])
    -> Vec<Outcome>
{
    stream.iter().map(|(rec, outcome)| {
        let pred = p.predict(rec);
        p.update(rec, pred, *outcome);
        pred.outcome
    }).collect()
}

#[test]
fn always_taken_branch() {
    let mut p = LGEHLConfig::default().build().unwrap();
    let rec = BranchRecord::conditional(0x0040_0800);
    let stream = vec![(rec, Outcome::T); 200];
    let preds = run(&mut p, &stream);
    assert!(preds[8..].iter().all(|o| *o == Outcome::T));
    assert_eq!(p.stats().clk, 200);
    assert_eq!(p.loops.stat.allocs, 0);
}

#[test]
fn random_streams_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let stream: Vec<(BranchRecord, Outcome)> = (0..20_000)
        .map(|_| {
            let rec = record(rng.gen_range(0..64), rng.gen_range(0..4));
            (rec, Outcome::from_bool(rng.gen_bool(0.7)))
        })
        .collect();

    let mut a = LGEHLConfig::default().build().unwrap();
    let mut b = LGEHLConfig::default().build().unwrap();
    assert_eq!(run(&mut a, &stream), run(&mut b, &stream));
    assert_eq!(a, b);
    assert!(a.stats().final_miss > 0);
}

#[test]
fn mixed_loops_beat_gehl_alone() {
    // Two loops whose trip counts are longer than global history
    let a = BranchRecord::conditional(0x0040_1a3c);
    let b = BranchRecord::conditional(0x0040_7f10);
    let call = BranchRecord::new(0x0040_1a41, BranchKind::DirectCall);
    let mut stream = Vec::new();
    for _ in 0..60 {
        for i in 0..200 {
            stream.push((a, Outcome::from_bool(i != 199)));
        }
        stream.push((call, Outcome::T));
        for i in 0..150 {
            stream.push((b, Outcome::from_bool(i != 149)));
        }
    }
    let mut p = LGEHLConfig::default().build().unwrap();
    run(&mut p, &stream);
    assert!(p.stats().loop_corrections > 0);
    assert!(p.stats().final_miss < p.stats().base_miss);
    assert_eq!(p.stats().transfers, 60);
}

#[test]
fn configuration_errors() {
    let mut cfg = LGEHLConfig::default();
    cfg.gehl.comp[3].history_len = 4;
    assert_eq!(LGEHLPredictor::new(cfg).err(),
        Some(ConfigError::HistoryNotIncreasing { idx: 3, prev: 4, len: 4 }));

    let mut cfg = LGEHLConfig::default();
    cfg.gehl.comp[7].history_len = 129;
    assert!(matches!(cfg.build(), Err(ConfigError::HistoryTooLong { .. })));

    let mut cfg = LGEHLConfig::default();
    cfg.gehl.phist_bits = 65;
    assert!(matches!(cfg.build(), Err(ConfigError::PathBits { .. })));

    let mut cfg = LGEHLConfig::default();
    cfg.gehl.comp[0].counter_bits = 0;
    assert!(matches!(cfg.build(), Err(ConfigError::CounterBits { idx: 0, .. })));

    let mut cfg = LGEHLConfig::default();
    cfg.loops.log_entries = 13;
    let err = cfg.build().unwrap_err();
    assert!(matches!(err, ConfigError::LoopEntries { .. }));
    assert!(!err.to_string().is_empty());
}

#[test]
fn small_configuration() {
    let mut gehl = GEHLConfig::new(16);
    for (l, c) in [(0, 4), (3, 4), (9, 3), (27, 3)] {
        gehl.add_component(GEHLComponentConfig::new(l, 8, c));
    }
    let loops = LoopConfig { log_entries: 3, ..LoopConfig::default() };
    let cfg = LGEHLConfig { gehl, loops, withloop_bits: 5 };
    let mut p = cfg.build().unwrap();
    assert_eq!(p.history().ghist.len(), 27);
    assert_eq!(p.history().phist.len(), 16);
    assert_eq!(p.threshold(), 4);

    let rec = BranchRecord::conditional(0x0040_0440);
    let stream: Vec<_> = (0..3000)
        .map(|i| (rec, Outcome::from_bool(i % 4 != 3)))
        .collect();
    let preds = run(&mut p, &stream);
    // The period fits in every history except the first
    let tail = &preds[2000..];
    let misses = tail.iter().zip(stream[2000..].iter())
        .filter(|(p, (_, o))| *p != o)
        .count();
    assert_eq!(misses, 0);
}

proptest! {
    #[test]
    fn identical_sequences_produce_identical_state(
        ops in proptest::collection::vec(
            (0u32..16, 0u8..4, any::<bool>()), 1..400
        )
    ) {
        let stream: Vec<_> = ops.iter()
            .map(|(pc, kind, taken)| (record(*pc, *kind), Outcome::from_bool(*taken)))
            .collect();
        let mut a = LGEHLConfig::default().build().unwrap();
        let mut b = LGEHLConfig::default().build().unwrap();
        prop_assert_eq!(run(&mut a, &stream), run(&mut b, &stream));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn history_holds_recent_outcomes(
        outcomes in proptest::collection::vec(any::<bool>(), 1..200)
    ) {
        let mut p = LGEHLConfig::default().build().unwrap();
        let stream: Vec<_> = outcomes.iter().enumerate()
            .map(|(i, t)| (record(i as u32 % 16, 0), Outcome::from_bool(*t)))
            .collect();
        run(&mut p, &stream);
        let n = outcomes.len().min(64);
        let expected = outcomes.iter().rev().take(n).enumerate()
            .fold(0u64, |acc, (i, t)| acc | ((*t as u64) << i));
        prop_assert_eq!(p.history().ghist.low_bits_u64(n), expected);
    }
}
