
use lgehl_predictor::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// A synthetic stream of branches.
struct Workload {
    name: &'static str,
    records: Vec<(BranchRecord, Outcome)>,
}

/// An outer loop of 10 iterations around an inner loop of 37 iterations.
fn loop_nest(len: usize) -> Workload {
    let inner = BranchRecord::conditional(0x0040_1a3c);
    let outer = BranchRecord::conditional(0x0040_1a58);
    let mut period = Vec::new();
    for j in 0..10 {
        for i in 0..37 {
            period.push((inner, Outcome::from_bool(i != 36)));
        }
        period.push((outer, Outcome::from_bool(j != 9)));
    }
    let records = period.iter().copied().cycle().take(len).collect();
    Workload { name: "loop nest (10x37)", records }
}

/// A single branch which is always taken.
fn always_taken(len: usize) -> Workload {
    let rec = BranchRecord::conditional(0x0040_0800);
    Workload {
        name: "always taken",
        records: vec![(rec, Outcome::T); len],
    }
}

/// A single branch which is taken with probability 0.9.
fn biased_random(len: usize, rng: &mut StdRng) -> Workload {
    let rec = BranchRecord::conditional(0x0040_0c10);
    let records = (0..len)
        .map(|_| (rec, Outcome::from_bool(rng.gen_bool(0.9))))
        .collect();
    Workload { name: "biased random (p=0.9)", records }
}

/// A random branch followed by a call, a branch repeating the outcome of
/// the random branch, and a return.
fn correlated_calls(len: usize, rng: &mut StdRng) -> Workload {
    let random = BranchRecord::conditional(0x0040_2000);
    let call = BranchRecord::new(0x0040_2005, BranchKind::DirectCall);
    let follow = BranchRecord::conditional(0x0040_3010);
    let ret = BranchRecord::new(0x0040_3021, BranchKind::Return);
    let mut records = Vec::with_capacity(len + 4);
    while records.len() < len {
        let outcome = Outcome::from_bool(rng.gen_bool(0.5));
        records.push((random, outcome));
        records.push((call, Outcome::T));
        records.push((follow, outcome));
        records.push((ret, Outcome::T));
    }
    records.truncate(len);
    Workload { name: "calls + correlated branch", records }
}

fn run(workload: &Workload) -> Result<LGEHLSession, ConfigError> {
    let mut session = LGEHLSession::new(LGEHLConfig::default().build()?);
    let mut hits = 0;
    let mut conditional = 0;

    let start = Instant::now();
    for (record, outcome) in workload.records.iter() {
        let prediction = session.predict(record);
        if record.is_conditional() {
            conditional += 1;
            if prediction == *outcome {
                hits += 1;
            }
        }
        session.update(record, *outcome);
    }
    let done = start.elapsed();

    let hit_rate = hits as f64 / conditional.max(1) as f64;
    println!("[*] {:<28} {:>8}/{:<8} hit rate {:.4} ({:.2?})",
        workload.name, hits, conditional, hit_rate, done
    );
    Ok(session)
}

fn print_stats(session: &LGEHLSession) {
    let p = &session.predictor;
    println!("    {:?}", p.stats());
    println!("    {:?}", p.gehl.stat);
    println!("    {:?}", p.loops.stat);
    println!("    threshold={} tc={} withloop={}",
        p.threshold(), p.threshold_counter(), p.withloop()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let len = match args.get(1).map(|s| s.parse::<usize>()) {
        None => 100_000,
        Some(Ok(len)) => len,
        Some(Err(e)) => {
            println!("usage: {} [branches per workload] ({})", args[0], e);
            return;
        },
    };

    let cfg = LGEHLConfig::default();
    let storage_bits = cfg.storage_bits();
    println!("[*] L-GEHL entries (in total): {}", cfg.gehl.total_entries()
        + cfg.loops.size()
    );
    println!("[*] L-GEHL storage bits: {}b, {:.2}KiB",
        storage_bits, storage_bits as f64 / 1024.0 / 8.0
    );

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let workloads = [
        loop_nest(len),
        always_taken(len),
        biased_random(len, &mut rng),
        correlated_calls(len, &mut rng),
    ];

    for workload in workloads.iter() {
        match run(workload) {
            Ok(session) => print_stats(&session),
            Err(e) => {
                println!("[!] {}", e);
                return;
            },
        }
    }
}
