use std::ops::{AddAssign, Div};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, ensure};
use clap::{Parser, ValueEnum};
use rand::{seq::SliceRandom, Rng};
use serde_json::{json, Value};

use panchayat_election::model::{
    candidate::Candidate,
    election::ElectionRegistry,
    region::{count_votes, count_votes_bounded},
    tally::{tally, Tally},
    voter::Voter,
};

#[rustfmt::skip]
const CANDIDATES: &[(&str, &str)] = &[
    ("Sarpanch Ram", "Janata"),
    ("Pradhan Sita", "Lok"),
    ("Mukhiya Gita", "Kisan"),
    ("Chaudhary Hari", "Janata"),
    ("Thakur Meera", "Lok"),
    ("Patel Suresh", "Kisan"),
    ("Yadav Kamla", "Nirdaliya"),
];

#[derive(Parser)]
struct Args {
    /// Voters per election.
    #[arg(long, default_value_t = 10_000)]
    voters: usize,

    /// How many threads to use, each running its own election. Defaults to
    /// the number of logical CPUs.
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// How voters pick their candidate.
    #[arg(long, value_enum, default_value_t)]
    vote_mode: VoteMode,

    /// Depth of the generated region tree.
    #[arg(long, default_value_t = 6)]
    region_depth: usize,
}

/// How voters pick their candidate.
#[derive(Debug, Copy, Clone, ValueEnum)]
enum VoteMode {
    /// Every candidate equally likely.
    Uniform,
    /// The first candidate takes 80% of the vote.
    Landslide,
    /// Like uniform, but 5% of votes go to a candidate who is not standing.
    Spoiled,
}

impl VoteMode {
    /// Pick a candidate ID according to this mode.
    fn choose(&self, rng: &mut impl Rng) -> String {
        let index = match self {
            Self::Uniform => rng.gen_range(0..CANDIDATES.len()),
            Self::Landslide if rng.gen::<f32>() < 0.8 => 0,
            Self::Landslide => rng.gen_range(1..CANDIDATES.len()),
            Self::Spoiled if rng.gen::<f32>() < 0.05 => return "SPOILED".to_string(),
            Self::Spoiled => rng.gen_range(0..CANDIDATES.len()),
        };
        candidate_id(index)
    }
}

impl Default for VoteMode {
    fn default() -> Self {
        Self::Uniform
    }
}

fn candidate_id(index: usize) -> String {
    format!("C{}", index + 1)
}

fn candidates() -> Vec<Candidate> {
    CANDIDATES
        .iter()
        .enumerate()
        .map(|(i, (name, party))| Candidate::new(candidate_id(i), *name, *party))
        .collect()
}

/// Build a complete binary region tree of the given depth where every leaf
/// holds one vote. Returns the tree and its expected total.
fn region_tree(depth: usize) -> (Value, i64) {
    if depth == 0 {
        return (json!({"votes": 1}), 1);
    }
    let (left, left_total) = region_tree(depth - 1);
    let (right, right_total) = region_tree(depth - 1);
    (json!({"subRegions": [left, right]}), left_total + right_total)
}

/// Durations of each part of the election.
#[derive(Debug, Default)]
struct Timings {
    register: Duration,
    vote: Duration,
    reduce: Duration,
    regions: Duration,
}

impl AddAssign for Timings {
    fn add_assign(&mut self, rhs: Self) {
        self.register += rhs.register;
        self.vote += rhs.vote;
        self.reduce += rhs.reduce;
        self.regions += rhs.regions;
    }
}

impl Div<u32> for Timings {
    type Output = Self;

    fn div(self, rhs: u32) -> Self {
        Self {
            register: self.register / rhs,
            vote: self.vote / rhs,
            reduce: self.reduce / rhs,
            regions: self.regions / rhs,
        }
    }
}

/// Run a single election from start to finish, checking the engine agrees
/// with itself along the way.
fn run_election(
    num_voters: usize,
    vote_mode: VoteMode,
    region_depth: usize,
) -> anyhow::Result<Timings> {
    let mut rng = rand::thread_rng();
    let mut registry = ElectionRegistry::new(candidates());

    // Register everyone.
    let voters: Vec<_> = (0..num_voters)
        .map(|i| Voter::new(format!("V{i}"), "Voter", rng.gen_range(18..100)))
        .collect();
    let pre_register = Instant::now();
    for voter in &voters {
        ensure!(registry.register_voter(voter), "failed to register {}", voter.id);
    }
    let post_register = Instant::now();

    // Vote in a random order.
    let mut order: Vec<_> = voters.iter().map(|v| v.id.as_str()).collect();
    order.shuffle(&mut rng);
    let choices: Vec<_> = order.iter().map(|_| vote_mode.choose(&mut rng)).collect();
    let mut accepted = Vec::with_capacity(choices.len());
    let pre_vote = Instant::now();
    for (voter_id, candidate_id) in order.iter().zip(&choices) {
        if registry.cast_vote(voter_id, candidate_id).is_ok() {
            accepted.push(candidate_id.as_str());
        }
    }
    let post_vote = Instant::now();

    // Rebuild the tally from the accepted votes.
    let pre_reduce = Instant::now();
    let replayed = accepted.iter().fold(Tally::new(), |acc, id| tally(&acc, id));
    let post_reduce = Instant::now();
    ensure!(replayed.values().sum::<u64>() == registry.turnout() as u64, "tally mismatch");
    ensure!(
        replayed.iter().all(|(id, votes)| registry.tally().get(id) == Some(votes)),
        "tally disagrees with registry"
    );

    // Sum a region tree both ways.
    let (tree, expected) = region_tree(region_depth);
    let pre_regions = Instant::now();
    let naive = count_votes(&tree);
    let bounded = count_votes_bounded(&tree, region_depth)?;
    let post_regions = Instant::now();
    ensure!(naive == expected && bounded == expected, "region totals disagree");

    Ok(Timings {
        register: post_register.duration_since(pre_register),
        vote: post_vote.duration_since(pre_vote),
        reduce: post_reduce.duration_since(pre_reduce),
        regions: post_regions.duration_since(pre_regions),
    })
}

/// Run the benchmark.
fn benchmark(args: &Args) -> anyhow::Result<()> {
    ensure!(args.threads > 0, "need at least one thread");

    let start = Instant::now();
    let total = thread::scope(|s| {
        let threads: Vec<_> = (0..args.threads)
            .map(|_| s.spawn(|| run_election(args.voters, args.vote_mode, args.region_depth)))
            .collect();

        let mut total = Timings::default();
        for t in threads {
            total += t.join().map_err(|_| anyhow!("thread panicked"))??;
        }
        Ok::<_, anyhow::Error>(total)
    })?;
    let total_duration = start.elapsed();

    let avg = total / args.threads as u32;
    println!("register: {:?}", avg.register);
    println!("vote:     {:?}", avg.vote);
    println!("reduce:   {:?}", avg.reduce);
    println!("regions:  {:?}", avg.regions);

    let total_voters = args.voters * args.threads;
    println!(
        "\nactual duration: {} voters in {:?} ({:.2}/s)",
        total_voters,
        total_duration,
        total_voters as f64 / total_duration.as_secs_f64()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = benchmark(&args) {
        eprintln!("FATAL: {}", e);
        process::exit(1);
    }
}
