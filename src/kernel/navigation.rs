//! Per-session card stack. Index 0 is the root, the last frame is visible.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::form::FormState;
use super::services::ports::SingleCardPop;
use crate::core::error::NavigationError;
use crate::models::card::{Card, DisplayStyle};
use crate::models::response::NavigationOp;

pub type FrameId = u64;

/// How the session was entered. Only a contextual entry may present its root
/// card as a peeking header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryPoint {
    #[default]
    Homepage,
    Contextual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Presentation {
    Full,
    Peek,
}

#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    card: Arc<Card>,
    form: FormState,
}

impl Frame {
    pub(crate) fn new(id: FrameId, card: Card) -> Self {
        let form = FormState::from_card(&card);
        Self {
            id,
            card: Arc::new(card),
            form,
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn card(&self) -> &Arc<Card> {
        &self.card
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavOutcome {
    pub applied: usize,
    /// The last card was popped under [`SingleCardPop::Exit`].
    pub exited: bool,
}

#[derive(Debug)]
pub struct NavigationStack {
    frames: Vec<Frame>,
    next_id: FrameId,
    generation: u64,
    entry: EntryPoint,
    policy: SingleCardPop,
}

impl NavigationStack {
    pub fn new(root: Card, entry: EntryPoint, policy: SingleCardPop) -> Self {
        Self {
            frames: vec![Frame::new(0, root)],
            next_id: 1,
            generation: 0,
            entry,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Bumped on every committed change; lets callers tell whether the stack
    /// moved since they last looked.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn names(&self) -> Vec<Option<&str>> {
        self.frames.iter().map(|f| f.card.name()).collect()
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    pub fn presentation(&self) -> Presentation {
        match self.frames.as_slice() {
            [root]
                if self.entry == EntryPoint::Contextual
                    && root.card.display_style() == DisplayStyle::Peek =>
            {
                Presentation::Peek
            }
            _ => Presentation::Full,
        }
    }

    /// Applies `ops` left to right on a scratch copy and commits only if every
    /// op succeeds.
    pub fn apply(&mut self, ops: Vec<NavigationOp>) -> Result<NavOutcome, NavigationError> {
        let mut frames = self.frames.clone();
        let mut next_id = self.next_id;
        let applied = ops.len();

        for op in ops {
            let label = op.label();
            match op {
                NavigationOp::Push(card) => {
                    frames.push(Frame::new(next_id, card));
                    next_id += 1;
                }
                NavigationOp::Pop => match frames.len() {
                    0 => return Err(NavigationError::EmptyStack),
                    1 => match self.policy {
                        SingleCardPop::Ignore => {
                            debug!("pop on the root card ignored");
                        }
                        SingleCardPop::Error => return Err(NavigationError::PopOnRoot),
                        SingleCardPop::Exit => {
                            frames.pop();
                        }
                    },
                    _ => {
                        frames.pop();
                    }
                },
                NavigationOp::PopToRoot => {
                    if frames.is_empty() {
                        return Err(NavigationError::EmptyStack);
                    }
                    frames.truncate(1);
                }
                NavigationOp::PopToNamed(name) => {
                    let pos = frames
                        .iter()
                        .rposition(|f| f.card.name() == Some(name.as_str()))
                        .ok_or(NavigationError::NamedCardNotFound { name })?;
                    frames.truncate(pos + 1);
                }
                NavigationOp::Update(card) => {
                    let top = frames.last_mut().ok_or(NavigationError::EmptyStack)?;
                    *top = Frame::new(top.id, card);
                }
            }
            debug!(op = label, depth = frames.len(), "navigation op");
        }

        let exited = frames.is_empty();
        self.frames = frames;
        self.next_id = next_id;
        self.generation += 1;
        Ok(NavOutcome { applied, exited })
    }

    /// Replaces the whole stack with `cards`, first card at the root.
    pub fn reset(&mut self, cards: Vec<Card>) -> Result<(), NavigationError> {
        if cards.is_empty() {
            return Err(NavigationError::EmptyStack);
        }
        let mut next_id = self.next_id;
        self.frames = cards
            .into_iter()
            .map(|card| {
                let frame = Frame::new(next_id, card);
                next_id += 1;
                frame
            })
            .collect();
        self.next_id = next_id;
        self.generation += 1;
        debug!(depth = self.frames.len(), "navigation stack reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/navigation.rs"]
mod tests;
