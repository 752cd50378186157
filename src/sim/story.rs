//! Sentence building for the word-catcher mode
//!
//! Caught words fill the slots of a role template in order. When the cursor
//! reaches the end the sentence is flushed into the story and a new template
//! is picked.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::wordbank::{Profile, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sentence {
    words: Vec<String>,
    template: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    template: Vec<Role>,
    /// Next slot to fill, always within `0..=template.len()`
    cursor: usize,
    current: Vec<String>,
    sentences: Vec<Sentence>,
    word_count: u32,
}

impl Story {
    pub fn new(template: Vec<Role>) -> Self {
        Self {
            template,
            cursor: 0,
            current: Vec::new(),
            sentences: Vec::new(),
            word_count: 0,
        }
    }

    /// Start with a random template of `profile`
    pub fn for_profile<R: Rng + ?Sized>(profile: &Profile, rng: &mut R) -> Self {
        Self::new(pick_template(profile, rng))
    }

    /// Role the next caught word should have
    pub fn expected_role(&self) -> Option<Role> {
        self.template.get(self.cursor).copied()
    }

    pub fn template(&self) -> &[Role] {
        &self.template
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Words caught and still in the story
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Append a caught word. Returns the finished sentence when the template
    /// is complete.
    pub fn push_word<R: Rng + ?Sized>(&mut self, text: &str, profile: &Profile, rng: &mut R) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.current.is_empty() {
            self.current.push(capitalize(text));
        } else {
            self.current.push(text.to_string());
        }
        self.word_count += 1;
        self.cursor = (self.cursor + 1).min(self.template.len());

        if self.cursor < self.template.len() {
            return None;
        }

        let words = std::mem::take(&mut self.current);
        let finished = Sentence {
            words,
            template: std::mem::replace(&mut self.template, pick_template(profile, rng)),
        };
        let text = finished.text();
        self.sentences.push(finished);
        self.cursor = 0;
        Some(text)
    }

    /// Remove the last caught word, reopening the previous sentence if the
    /// current one is empty
    pub fn undo_word(&mut self) -> bool {
        if self.current.is_empty() {
            let Some(last) = self.sentences.pop() else {
                return false;
            };
            self.current = last.words;
            self.template = last.template;
        }
        if self.current.pop().is_none() {
            return false;
        }
        self.cursor = self.current.len().min(self.template.len());
        self.word_count = self.word_count.saturating_sub(1);
        true
    }

    /// Drop everything caught so far (the template stays)
    pub fn clear(&mut self) {
        self.sentences.clear();
        self.current.clear();
        self.cursor = 0;
        self.word_count = 0;
    }

    /// The whole story, each sentence terminated with a period
    pub fn text(&self) -> String {
        let current = (!self.current.is_empty()).then(|| self.current.join(" "));
        self.sentences
            .iter()
            .map(Sentence::text)
            .chain(current)
            .map(|s| terminate(s.trim()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Template with the expected slot marked
    pub fn template_line(&self) -> String {
        self.template
            .iter()
            .enumerate()
            .map(|(i, role)| {
                if i == self.cursor {
                    format!("→ {}", role.label())
                } else {
                    role.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  •  ")
    }
}

impl Sentence {
    fn text(&self) -> String {
        self.words.join(" ")
    }
}

fn pick_template<R: Rng + ?Sized>(profile: &Profile, rng: &mut R) -> Vec<Role> {
    profile
        .templates
        .choose(rng)
        .map(|t| t.to_vec())
        .unwrap_or_else(|| Role::ALL.to_vec())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn terminate(s: &str) -> String {
    if s.is_empty() || s.ends_with(['.', '!', '?']) {
        s.to_string()
    } else {
        format!("{s}.")
    }
}
