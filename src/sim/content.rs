//! Word supply with shuffled bags and a recent-history window
//!
//! One bag per role is drawn without replacement and refilled by
//! reshuffling the profile's full list when empty. Draws skip anything in the
//! recent window, so the same word rarely falls twice in a row.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::wordbank::{Profile, Role};
use crate::tuning::Tuning;

/// One drawn word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordItem {
    pub text: &'static str,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct ContentProvider {
    profile: &'static Profile,
    bags: [Vec<&'static str>; 5],
    recent: VecDeque<&'static str>,
    recent_window: usize,
    retries: u32,
    coherence: f64,
}

impl ContentProvider {
    pub fn new<R: Rng + ?Sized>(profile: &'static Profile, tuning: &Tuning, rng: &mut R) -> Self {
        let mut provider = Self {
            profile,
            bags: Default::default(),
            recent: VecDeque::with_capacity(tuning.recent_window),
            recent_window: tuning.recent_window,
            retries: tuning.bag_retries,
            coherence: tuning.coherence,
        };
        for role in Role::ALL {
            provider.refill(role, rng);
        }
        provider
    }

    pub fn profile(&self) -> &'static Profile {
        self.profile
    }

    /// Next word. `expected` is honoured with the coherence probability,
    /// otherwise (or when absent) a role is drawn uniformly.
    pub fn next_item<R: Rng + ?Sized>(&mut self, expected: Option<Role>, rng: &mut R) -> Option<WordItem> {
        let role = match expected {
            Some(role) if rng.random_bool(self.coherence) => role,
            _ => *Role::ALL.choose(rng)?,
        };
        let text = self.take_from_bag(role, rng)?;
        self.remember(text);
        Some(WordItem { text, role })
    }

    /// Draw one entry of `role`, avoiding the recent window when possible
    pub fn take_from_bag<R: Rng + ?Sized>(&mut self, role: Role, rng: &mut R) -> Option<&'static str> {
        if self.profile.words(role).is_empty() {
            return None;
        }

        let mut last = None;
        for _ in 0..self.retries {
            if self.bags[role.index()].is_empty() {
                self.refill(role, rng);
            }
            let candidate = self.bags[role.index()].pop()?;
            if !self.is_recent(candidate) {
                return Some(candidate);
            }
            last = Some(candidate);
        }

        // Retries ran out: look through what is left, then a fresh bag
        if let Some(found) = self.take_non_recent(role) {
            return Some(found);
        }
        self.refill(role, rng);
        if let Some(found) = self.take_non_recent(role) {
            return Some(found);
        }

        // Every entry is recent; accept a repeat rather than starve the spawner
        last.or_else(|| self.bags[role.index()].pop())
    }

    pub fn is_recent(&self, text: &str) -> bool {
        self.recent.iter().any(|t| *t == text)
    }

    /// Words returned most recently, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.recent.iter().copied()
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    fn take_non_recent(&mut self, role: Role) -> Option<&'static str> {
        let bag = &self.bags[role.index()];
        let index = bag.iter().rposition(|t| !self.is_recent(t))?;
        Some(self.bags[role.index()].remove(index))
    }

    fn remember(&mut self, text: &'static str) {
        if self.recent_window == 0 {
            return;
        }
        // Accepted repeats move to the back instead of taking a second slot
        if let Some(index) = self.recent.iter().position(|t| *t == text) {
            self.recent.remove(index);
        }
        self.recent.push_back(text);
        while self.recent.len() > self.recent_window {
            self.recent.pop_front();
        }
    }

    fn refill<R: Rng + ?Sized>(&mut self, role: Role, rng: &mut R) {
        let bag = &mut self.bags[role.index()];
        bag.clear();
        bag.extend_from_slice(self.profile.words(role));
        bag.shuffle(rng);
    }
}
