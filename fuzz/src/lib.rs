//! Softraster Fuzzing Infrastructure
//!
//! Drives the clipping and geometry entry points of `softraster` with
//! mutated inputs and checks their results against independently computed
//! expectations. A violated expectation is reported as a finding; the
//! library's own precondition panics are never triggered because targets
//! only call the clipped operations.

#![no_std]
extern crate alloc;

pub mod harness;
pub mod raster;

use alloc::string::String;
use alloc::vec::Vec;

/// Fuzzing target trait
pub trait FuzzTarget {
    /// Name of the fuzz target
    fn name(&self) -> &str;

    /// Run one iteration with input
    fn fuzz(&mut self, input: &[u8]) -> FuzzResult;

    /// Reset state between iterations
    fn reset(&mut self);
}

/// Result of a fuzz iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzResult {
    /// Input processed, every check held
    Ok,
    /// Input too short or otherwise unusable
    Rejected,
    /// A checked property did not hold
    Violation(Violation),
    /// Input reached a rarely hit case worth keeping in the corpus
    Interesting(String),
}

impl FuzzResult {
    pub fn is_violation(&self) -> bool {
        matches!(self, FuzzResult::Violation(_))
    }

    pub fn is_interesting(&self) -> bool {
        matches!(self, FuzzResult::Interesting(_) | FuzzResult::Violation(_))
    }
}

/// Description of a failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, detail: String) -> Self {
        Self { kind, detail }
    }
}

/// Class of failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A pixel outside the permitted area changed
    OutOfBounds,
    /// A pixel inside the expected area has the wrong value
    WrongValue,
    /// The returned box differs from the expected one
    WrongBox,
    /// A box algebra law does not hold
    BoxAlgebra,
    /// Row padding bytes were modified
    PaddingWritten,
}

/// Fuzzer configuration
#[derive(Debug, Clone)]
pub struct FuzzerConfig {
    /// Inputs are truncated to this many bytes
    pub max_input_size: usize,
    /// Iterations for [`harness::FuzzHarness::run_configured`]
    pub max_iterations: u64,
    /// Mutator seed, fixed for reproducible runs
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            max_input_size: 256,
            max_iterations: 10_000,
            seed: 12345,
        }
    }
}

/// Fuzzing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzStats {
    /// Total iterations
    pub iterations: u64,
    /// Target runs, iterations times targets
    pub executions: u64,
    /// Inputs rejected by a target
    pub rejected: u64,
    /// Violations found
    pub violations: u64,
    /// Violations with a distinct kind and target
    pub unique_violations: u64,
    /// Corpus size
    pub corpus_size: usize,
}

/// Mutator for input generation
pub struct Mutator {
    seed: u64,
    dictionary: Vec<Vec<u8>>,
}

impl Mutator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            dictionary: Vec::new(),
        }
    }

    /// Add a byte sequence that is spliced into inputs
    pub fn add_dictionary(&mut self, entry: Vec<u8>) {
        self.dictionary.push(entry);
    }

    /// Next pseudo random value
    pub fn next_u64(&mut self) -> u64 {
        self.seed = self.seed.wrapping_mul(1103515245).wrapping_add(12345);
        self.seed >> 16
    }

    /// Mutate input
    pub fn mutate(&mut self, input: &mut Vec<u8>) {
        match self.next_u64() % 9 {
            0 => self.bit_flip(input),
            1 => self.byte_flip(input),
            2 => self.byte_insert(input),
            3 => self.byte_delete(input),
            4 => self.byte_replace(input),
            5 => self.interesting_value(input),
            6 => self.dictionary_insert(input),
            7 => self.havoc(input),
            _ => self.random_bytes(input),
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        (self.next_u64() as usize) % len
    }

    fn bit_flip(&mut self, input: &mut [u8]) {
        if input.is_empty() {
            return;
        }
        let pos = self.pick(input.len());
        let bit = self.next_u64() % 8;
        input[pos] ^= 1 << bit;
    }

    fn byte_flip(&mut self, input: &mut [u8]) {
        if input.is_empty() {
            return;
        }
        let pos = self.pick(input.len());
        input[pos] ^= 0xFF;
    }

    fn byte_insert(&mut self, input: &mut Vec<u8>) {
        let pos = if input.is_empty() { 0 } else { self.pick(input.len()) };
        let byte = self.next_u64() as u8;
        input.insert(pos, byte);
    }

    fn byte_delete(&mut self, input: &mut Vec<u8>) {
        if input.is_empty() {
            return;
        }
        let pos = self.pick(input.len());
        input.remove(pos);
    }

    fn byte_replace(&mut self, input: &mut [u8]) {
        if input.is_empty() {
            return;
        }
        let pos = self.pick(input.len());
        input[pos] = self.next_u64() as u8;
    }

    fn interesting_value(&mut self, input: &mut [u8]) {
        // Bytes that decode to edge coordinates: 0, 1, -1, i8 limits
        const INTERESTING: &[u8] = &[0, 1, 0x7F, 0x80, 0xFF];
        if input.is_empty() {
            return;
        }
        let pos = self.pick(input.len());
        input[pos] = INTERESTING[self.pick(INTERESTING.len())];
    }

    fn dictionary_insert(&mut self, input: &mut Vec<u8>) {
        if self.dictionary.is_empty() {
            return;
        }
        let index = self.pick(self.dictionary.len());
        let entry = self.dictionary[index].clone();
        let pos = if input.is_empty() { 0 } else { self.pick(input.len()) };
        for (i, byte) in entry.into_iter().enumerate() {
            if pos + i < input.len() {
                input[pos + i] = byte;
            } else {
                input.push(byte);
            }
        }
    }

    fn havoc(&mut self, input: &mut Vec<u8>) {
        let rounds = (self.next_u64() % 16) + 1;
        for _ in 0..rounds {
            match self.next_u64() % 6 {
                0 => self.bit_flip(input),
                1 => self.byte_flip(input),
                2 => self.byte_insert(input),
                3 => self.byte_delete(input),
                4 => self.byte_replace(input),
                _ => self.interesting_value(input),
            }
        }
    }

    fn random_bytes(&mut self, input: &mut Vec<u8>) {
        let count = (self.next_u64() % 8) + 1;
        for _ in 0..count {
            let byte = self.next_u64() as u8;
            input.push(byte);
        }
    }
}

/// Corpus of inputs worth mutating further
pub struct Corpus {
    entries: Vec<Vec<u8>>,
    max_size: usize,
}

impl Corpus {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Add an entry, evicting the oldest one when full
    pub fn add(&mut self, data: Vec<u8>) {
        if self.max_size == 0 || self.entries.contains(&data) {
            return;
        }
        if self.entries.len() == self.max_size {
            self.entries.remove(0);
        }
        self.entries.push(data);
    }

    pub fn entry(&self, index: u64) -> Option<&Vec<u8>> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get((index % self.entries.len() as u64) as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sequential decoder of fuzz input
///
/// Reading past the end yields zeros, so every input decodes.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn u8(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    pub fn i32(&mut self) -> i32 {
        i32::from_le_bytes([self.u8(), self.u8(), self.u8(), self.u8()])
    }

    /// Coordinate biased towards small values around the pixmaps
    ///
    /// One byte in four selects a full-range value.
    pub fn coord(&mut self) -> i32 {
        let tag = self.u8();
        if tag & 3 == 0 {
            self.i32()
        } else {
            self.u8() as i8 as i32
        }
    }

    /// Value in `1..=max`
    pub fn size(&mut self, max: u32) -> u32 {
        1 + self.u8() as u32 % max
    }
}
