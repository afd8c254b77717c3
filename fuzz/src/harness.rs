//! Fuzzing Harness
//!
//! Runs mutated inputs against every registered target and keeps one input
//! per distinct finding.

use crate::{
    Corpus, FuzzResult, FuzzStats, FuzzTarget, FuzzerConfig, Mutator, Violation, ViolationKind,
};
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;

/// Main fuzzer harness
pub struct FuzzHarness {
    config: FuzzerConfig,
    targets: Vec<Box<dyn FuzzTarget>>,
    mutator: Mutator,
    corpus: Corpus,
    stats: FuzzStats,
    /// (target, kind) pairs already reported
    seen: HashSet<(String, ViolationKind)>,
    findings: Vec<Finding>,
}

/// An input that violated a check
#[derive(Debug, Clone)]
pub struct Finding {
    pub input: Vec<u8>,
    pub violation: Violation,
    pub target: String,
}

impl FuzzHarness {
    pub fn new(config: FuzzerConfig) -> Self {
        Self {
            mutator: Mutator::new(config.seed),
            config,
            targets: Vec::new(),
            corpus: Corpus::new(1024),
            stats: FuzzStats::default(),
            seen: HashSet::new(),
            findings: Vec::new(),
        }
    }

    pub fn add_target(&mut self, target: Box<dyn FuzzTarget>) {
        self.targets.push(target);
    }

    /// Add a seed input
    pub fn add_corpus(&mut self, data: Vec<u8>) {
        self.corpus.add(data);
        self.stats.corpus_size = self.corpus.len();
    }

    pub fn add_dictionary(&mut self, entries: Vec<Vec<u8>>) {
        for entry in entries {
            self.mutator.add_dictionary(entry);
        }
    }

    /// Run `iterations` rounds
    pub fn run(&mut self, iterations: u64) -> FuzzReport {
        for _ in 0..iterations {
            self.fuzz_iteration();
        }

        FuzzReport {
            stats: self.stats.clone(),
            findings: self.findings.clone(),
        }
    }

    /// Run the configured number of rounds
    pub fn run_configured(&mut self) -> FuzzReport {
        self.run(self.config.max_iterations)
    }

    fn fuzz_iteration(&mut self) {
        self.stats.iterations += 1;

        let mut input = self
            .corpus
            .entry(self.mutator.next_u64())
            .cloned()
            .unwrap_or_default();
        self.mutator.mutate(&mut input);
        input.truncate(self.config.max_input_size);

        let mut violations: Vec<(Violation, String)> = Vec::new();
        let mut keep = false;

        for target in &mut self.targets {
            self.stats.executions += 1;
            let result = target.fuzz(&input);
            match &result {
                FuzzResult::Rejected => self.stats.rejected += 1,
                FuzzResult::Violation(violation) => {
                    violations.push((violation.clone(), String::from(target.name())));
                }
                FuzzResult::Interesting(_) => keep = true,
                FuzzResult::Ok => {}
            }
            target.reset();
        }

        for (violation, name) in violations {
            self.record(&input, violation, name);
        }
        if keep {
            self.corpus.add(input);
            self.stats.corpus_size = self.corpus.len();
        }
    }

    fn record(&mut self, input: &[u8], violation: Violation, target: String) {
        self.stats.violations += 1;
        log::warn!("{} violation in {}: {}", kind_name(violation.kind), target, violation.detail);

        if self.seen.insert((target.clone(), violation.kind)) {
            self.stats.unique_violations += 1;
            self.findings.push(Finding {
                input: input.to_vec(),
                violation,
                target,
            });
        }
    }

    pub fn stats(&self) -> &FuzzStats {
        &self.stats
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }
}

fn kind_name(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::OutOfBounds => "out-of-bounds",
        ViolationKind::WrongValue => "wrong-value",
        ViolationKind::WrongBox => "wrong-box",
        ViolationKind::BoxAlgebra => "box-algebra",
        ViolationKind::PaddingWritten => "padding-written",
    }
}

/// Fuzzing report
#[derive(Debug, Clone)]
pub struct FuzzReport {
    pub stats: FuzzStats,
    pub findings: Vec<Finding>,
}

impl FuzzReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Format as text
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Fuzzing Report ===\n\n");
        output.push_str("Statistics:\n");
        output.push_str(&format!("  Iterations: {}\n", self.stats.iterations));
        output.push_str(&format!("  Executions: {}\n", self.stats.executions));
        output.push_str(&format!("  Rejected: {}\n", self.stats.rejected));
        output.push_str(&format!(
            "  Violations: {} ({} unique)\n",
            self.stats.violations, self.stats.unique_violations
        ));
        output.push_str(&format!("  Corpus: {}\n", self.stats.corpus_size));

        if !self.findings.is_empty() {
            output.push_str("\nFindings:\n");
            for finding in &self.findings {
                output.push_str(&format!(
                    "  - {} in {}: {} ({} byte input)\n",
                    kind_name(finding.violation.kind),
                    finding.target,
                    finding.violation.detail,
                    finding.input.len()
                ));
            }
        }

        output
    }
}

/// Shrinks an input while it keeps producing a violation
pub struct Minimizer<'a> {
    target: &'a mut dyn FuzzTarget,
    max_attempts: usize,
    attempts: usize,
}

impl<'a> Minimizer<'a> {
    pub fn new(target: &'a mut dyn FuzzTarget) -> Self {
        Self {
            target,
            max_attempts: 10_000,
            attempts: 0,
        }
    }

    pub fn minimize(&mut self, input: Vec<u8>) -> Vec<u8> {
        let mut current = input;
        let mut improved = true;

        while improved && self.attempts < self.max_attempts {
            improved = false;

            for chunk_size in [32, 16, 8, 4, 2, 1] {
                let result = self.try_remove_chunks(&current, chunk_size);
                if result.len() < current.len() {
                    current = result;
                    improved = true;
                    break;
                }
            }

            let result = self.try_zero_bytes(&current);
            if result != current {
                current = result;
                improved = true;
            }
        }

        current
    }

    fn try_remove_chunks(&mut self, input: &[u8], chunk_size: usize) -> Vec<u8> {
        for start in (0..input.len()).step_by(chunk_size) {
            let end = (start + chunk_size).min(input.len());
            let mut candidate = Vec::with_capacity(input.len());
            candidate.extend_from_slice(&input[..start]);
            candidate.extend_from_slice(&input[end..]);
            if self.still_fails(&candidate) {
                return candidate;
            }
        }
        input.to_vec()
    }

    fn try_zero_bytes(&mut self, input: &[u8]) -> Vec<u8> {
        let mut result = input.to_vec();
        for i in 0..result.len() {
            if result[i] != 0 {
                let original = result[i];
                result[i] = 0;
                if !self.still_fails(&result) {
                    result[i] = original;
                }
            }
        }
        result
    }

    fn still_fails(&mut self, input: &[u8]) -> bool {
        self.attempts += 1;
        self.target.reset();
        self.target.fuzz(input).is_violation()
    }
}

/// Run one target on mutations of `corpus`. Returns whether any input
/// produced a violation.
pub fn quick_fuzz<T: FuzzTarget>(mut target: T, corpus: Vec<Vec<u8>>, iterations: u64) -> bool {
    let mut violated = false;
    let mut mutator = Mutator::new(42);
    let mut current_corpus = corpus;

    for _ in 0..iterations {
        let mut input = if current_corpus.is_empty() {
            Vec::new()
        } else {
            let index = mutator.next_u64() as usize % current_corpus.len();
            current_corpus[index].clone()
        };
        mutator.mutate(&mut input);

        let result = target.fuzz(&input);
        if result.is_violation() {
            log::warn!("{} violated a check", target.name());
            violated = true;
        } else if result.is_interesting() && current_corpus.len() < 256 {
            current_corpus.push(input);
        }

        target.reset();
    }

    violated
}
