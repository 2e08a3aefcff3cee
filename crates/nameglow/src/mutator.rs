//! Letter-rearrangement variants of a name.
//!
//! The search runs in three phases and stops the moment it has collected
//! enough variants:
//!
//! 1. **Permutations** of the name's own letters.
//! 2. **Insertions**: for each letter of the insertion alphabet (`a`..=`z`
//!    by default), the name's letters plus that one letter, permuted.
//! 3. **Deletions** (names longer than 3 letters only): for each position,
//!    the name's letters minus that one, permuted.
//!
//! Permutations are visited in lexicographic order of letter *positions*
//! (the order `[0, 1, 2]`, `[0, 2, 1]`, `[1, 0, 2]`, ...). When two unused
//! positions hold the same letter, only the first is expanded: the second
//! would yield exactly the strings the first already produced, so skipping it
//! changes neither the output nor its order, and it keeps names with many
//! repeated letters from exploding factorially.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::trace;

use crate::name::Name;

const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Deletion variants are only tried for names longer than this.
const MIN_LETTERS_FOR_DELETION: usize = 3;

/// Generates bounded, ordered sets of name variants.
#[derive(Debug, Clone)]
pub struct NameMutator {
    alphabet: Vec<char>,
}

impl Default for NameMutator {
    fn default() -> Self {
        Self::with_alphabet(DEFAULT_ALPHABET)
    }
}

impl NameMutator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom insertion alphabet. An empty alphabet disables phase 2.
    pub fn with_alphabet(alphabet: &str) -> Self {
        Self {
            alphabet: alphabet.chars().collect(),
        }
    }

    /// Up to `max_results` variants of `name`, in discovery order.
    ///
    /// No variant equals the normalized name and none repeats. Fewer than
    /// `max_results` come back only when every phase is exhausted.
    pub fn generate_variants(&self, name: &Name, max_results: usize) -> Vec<String> {
        let original = name.normalized();
        let letters: Vec<char> = original.chars().collect();
        let mut collector = Collector::new(original, max_results);
        if max_results == 0 {
            return collector.found;
        }

        if collector.collect_permutations(&letters).is_break() {
            return collector.finish("permutations");
        }

        for &extra in &self.alphabet {
            let mut extended = letters.clone();
            extended.push(extra);
            if collector.collect_permutations(&extended).is_break() {
                return collector.finish("insertions");
            }
        }

        if letters.len() > MIN_LETTERS_FOR_DELETION {
            for skip in 0..letters.len() {
                let mut reduced = letters.clone();
                reduced.remove(skip);
                if collector.collect_permutations(&reduced).is_break() {
                    return collector.finish("deletions");
                }
            }
        }

        collector.finish("exhausted")
    }
}

/// Accumulates distinct variants until the cap is reached.
struct Collector<'a> {
    original: &'a str,
    max_results: usize,
    seen: HashSet<String>,
    found: Vec<String>,
}

impl<'a> Collector<'a> {
    fn new(original: &'a str, max_results: usize) -> Self {
        Self {
            original,
            max_results,
            seen: HashSet::new(),
            found: Vec::new(),
        }
    }

    fn collect_permutations(&mut self, letters: &[char]) -> ControlFlow<()> {
        let mut used = vec![false; letters.len()];
        let mut current = String::with_capacity(letters.len() * 4);
        permute(letters, &mut used, &mut current, 0, &mut |candidate| {
            self.offer(candidate)
        })
    }

    fn offer(&mut self, candidate: &str) -> ControlFlow<()> {
        if candidate != self.original && self.seen.insert(candidate.to_string()) {
            self.found.push(candidate.to_string());
            if self.found.len() >= self.max_results {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(self, phase: &str) -> Vec<String> {
        trace!(
            "Name variants for '{}': {} found, stopped after {phase}",
            self.original,
            self.found.len()
        );
        self.found
    }
}

/// Depth-first permutation walk over letter positions.
///
/// Recursion depth is the letter count plus one, bounded by
/// [`MAX_NAME_LETTERS`](crate::name::MAX_NAME_LETTERS) + 1 for parsed names.
fn permute(
    letters: &[char],
    used: &mut [bool],
    current: &mut String,
    depth: usize,
    visit: &mut dyn FnMut(&str) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if depth == letters.len() {
        return visit(current.as_str());
    }

    for (i, &letter) in letters.iter().enumerate() {
        if used[i] || tried_at_this_depth(letters, used, i) {
            continue;
        }

        used[i] = true;
        current.push(letter);
        let flow = permute(letters, used, current, depth + 1, visit);
        current.pop();
        used[i] = false;
        if flow.is_break() {
            return flow;
        }
    }
    ControlFlow::Continue(())
}

/// Whether an earlier unused position holds the same letter as position `i`.
/// That position was already expanded at the current depth.
fn tried_at_this_depth(letters: &[char], used: &[bool], i: usize) -> bool {
    letters[..i]
        .iter()
        .zip(&used[..i])
        .any(|(&other, &taken)| !taken && other == letters[i])
}
