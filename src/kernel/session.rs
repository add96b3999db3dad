//! Per-session state and the reducer that applies callback responses to it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use super::effect::SurfaceEffect;
use super::form::FormState;
use super::navigation::{EntryPoint, Frame, FrameId, NavigationStack, Presentation};
use super::services::ports::SingleCardPop;
use crate::core::error::{EngineError, IllegalStateError};
use crate::models::card::{Card, Surface};
use crate::models::response::{
    ActionResponse, DialogResponse, NavigationOp, ResponseKind, UniversalResponse,
};

pub type TicketId = u64;

/// Result of one engine step, in the shape of a reducer's dispatch result.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Applied {
    pub effects: Vec<SurfaceEffect>,
    /// The session's visible state (stack, dialogs or form) moved.
    pub changed: bool,
}

/// Dispatch that has been sent but not yet settled.
#[derive(Debug)]
pub(crate) struct PendingDispatch {
    pub surface: Surface,
    pub origin: FrameId,
    pub target: String,
    pub field_name: Option<String>,
    pub form_snapshot: FormState,
    pub blocks_input: bool,
    pub persist_values: bool,
    pub open_dialog: bool,
    pub generation: u64,
    pub cancelled: bool,
    /// A `complete` call is waiting on this entry.
    pub awaited: bool,
    pub cancel_tx: watch::Sender<bool>,
}

/// Where a response came from, as far as applying it is concerned.
#[derive(Debug, Default)]
pub(crate) struct ResponseContext {
    pub surface: Surface,
    pub origin: Option<FrameId>,
    pub field_name: Option<String>,
    /// Dispatch-time form, present only when the action persists values.
    pub persist: Option<FormState>,
    /// The action asked for its result to open as a dialog.
    pub open_dialog: bool,
}

impl From<PendingDispatch> for ResponseContext {
    fn from(p: PendingDispatch) -> Self {
        Self {
            surface: p.surface,
            origin: Some(p.origin),
            field_name: p.field_name,
            persist: p.persist_values.then_some(p.form_snapshot),
            open_dialog: p.open_dialog,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SessionState {
    pub stack: NavigationStack,
    pub dialogs: Vec<Frame>,
    next_dialog_id: FrameId,
    pub pending: FxHashMap<TicketId, PendingDispatch>,
    next_ticket: TicketId,
    pub closed: bool,
}

impl SessionState {
    fn new(stack: NavigationStack) -> Self {
        Self {
            stack,
            dialogs: Vec::new(),
            next_dialog_id: 0,
            pending: FxHashMap::default(),
            next_ticket: 1,
            closed: false,
        }
    }

    pub fn ensure_open(&self) -> Result<(), IllegalStateError> {
        if self.closed {
            let e = IllegalStateError("session is closed".to_string());
            error!(error = %e, "session misuse");
            return Err(e);
        }
        Ok(())
    }

    pub fn visible(&self, surface: Surface) -> Option<&Frame> {
        match surface {
            Surface::Stack => self.stack.top(),
            Surface::Dialog => self.dialogs.last(),
        }
    }

    pub fn visible_mut(&mut self, surface: Surface) -> Option<&mut Frame> {
        match surface {
            Surface::Stack => self.stack.top_mut(),
            Surface::Dialog => self.dialogs.last_mut(),
        }
    }

    fn frame(&self, surface: Surface, id: FrameId) -> Option<&Frame> {
        match surface {
            Surface::Stack => self.stack.frame(id),
            Surface::Dialog => self.dialogs.iter().find(|f| f.id() == id),
        }
    }

    /// A spinner dispatch from `frame` holds further clicks on it.
    pub fn blocked(&self, surface: Surface, frame: FrameId) -> bool {
        self.pending
            .values()
            .any(|p| p.blocks_input && !p.cancelled && p.surface == surface && p.origin == frame)
    }

    pub fn register(&mut self, pending: PendingDispatch) -> TicketId {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(id, pending);
        id
    }

    pub fn render(&self) -> Option<SurfaceEffect> {
        self.stack.top().map(|top| SurfaceEffect::Render {
            card: Arc::clone(top.card()),
            presentation: self.stack.presentation(),
        })
    }

    /// Form to carry into the next card: the origin frame's live form if it is
    /// still around, else what was captured at dispatch time.
    fn user_edits(&self, ctx: &mut ResponseContext) -> Option<FormState> {
        let snapshot = ctx.persist.take()?;
        let live = ctx
            .origin
            .and_then(|id| self.frame(ctx.surface, id))
            .map(|f| f.form().clone());
        Some(live.unwrap_or(snapshot))
    }

    pub fn apply_response(
        &mut self,
        response: ActionResponse,
        mut ctx: ResponseContext,
    ) -> Result<Applied, EngineError> {
        let state_changed = response.state_changed();
        let mut applied = Applied::default();

        match response.into_kind() {
            ResponseKind::Navigation(nav) if ctx.open_dialog && nav.opens_single_card() => {
                let card = nav.into_ops().into_iter().find_map(|op| match op {
                    NavigationOp::Push(card) | NavigationOp::Update(card) => Some(card),
                    _ => None,
                });
                if let Some(card) = card {
                    debug!("navigation card opened as dialog");
                    applied.changed = true;
                    self.apply_dialog(DialogResponse::show(card), &mut ctx, &mut applied);
                }
            }
            ResponseKind::Navigation(nav) => {
                let edits = self.user_edits(&mut ctx);
                let outcome = self.stack.apply(nav.into_ops()).map_err(|e| {
                    warn!(error = %e, "navigation rejected; stack unchanged");
                    e
                })?;
                if let (Some(edits), Some(top)) = (edits, self.stack.top_mut()) {
                    let kept = top.form_mut().keep_user_edits(&edits);
                    debug!(kept, "user edits carried over");
                }
                applied.changed = true;
                if outcome.exited {
                    self.closed = true;
                    self.dialogs.clear();
                    applied.effects.push(SurfaceEffect::Exit);
                } else {
                    applied.effects.extend(self.render());
                }
            }
            ResponseKind::Notification(n) => {
                applied.effects.push(SurfaceEffect::ShowNotification(n.text))
            }
            ResponseKind::OpenLink(link) => applied.effects.push(SurfaceEffect::OpenLink(link)),
            ResponseKind::Compose(c) => applied.effects.push(SurfaceEffect::Compose(c)),
            ResponseKind::Suggestions(s) => applied.effects.push(SurfaceEffect::ShowSuggestions {
                field_name: ctx.field_name.take(),
                suggestions: s.suggestions,
            }),
            ResponseKind::UpdateDraft(u) => applied.effects.push(SurfaceEffect::UpdateDraft(u)),
            ResponseKind::Dialog(d) => {
                applied.changed = true;
                self.apply_dialog(d, &mut ctx, &mut applied);
            }
            ResponseKind::Universal(UniversalResponse::DisplayCards(cards)) => {
                self.stack.reset(cards)?;
                self.dialogs.clear();
                applied.changed = true;
                applied.effects.extend(self.render());
            }
            ResponseKind::Universal(UniversalResponse::OpenLink(link)) => {
                applied.effects.push(SurfaceEffect::OpenLink(link))
            }
        }

        if state_changed {
            applied.effects.push(SurfaceEffect::InvalidateCache);
        }
        Ok(applied)
    }

    fn apply_dialog(&mut self, d: DialogResponse, ctx: &mut ResponseContext, out: &mut Applied) {
        let Some(card) = d.card else {
            if self.dialogs.pop().is_none() {
                debug!("close requested with no dialog open");
            }
            out.effects.push(SurfaceEffect::CloseDialog {
                status_code: d.status_code,
                message: d.message,
            });
            if let Some(top) = self.dialogs.last() {
                out.effects.push(SurfaceEffect::ShowDialog(Arc::clone(top.card())));
            } else {
                out.effects.extend(self.render());
            }
            return;
        };

        let edits = if ctx.surface == Surface::Dialog {
            self.user_edits(ctx)
        } else {
            None
        };
        let mut frame = Frame::new(self.next_dialog_id, card);
        self.next_dialog_id += 1;
        if let Some(edits) = edits {
            frame.form_mut().keep_user_edits(&edits);
        }
        let shown = Arc::clone(frame.card());
        match (ctx.surface, self.dialogs.last_mut()) {
            (Surface::Dialog, Some(top)) => *top = frame,
            _ => self.dialogs.push(frame),
        }
        out.effects.push(SurfaceEffect::ShowDialog(shown));
    }
}

/// One client session. Every mutation goes through the inner lock, so
/// responses for the same session are applied one at a time.
#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn open(root: Card, entry: EntryPoint, policy: SingleCardPop) -> Self {
        Self {
            state: Mutex::new(SessionState::new(NavigationStack::new(root, entry, policy))),
        }
    }

    /// Opens with `cards` already stacked, first card at the root.
    pub fn open_stack(
        cards: Vec<Card>,
        entry: EntryPoint,
        policy: SingleCardPop,
    ) -> Result<Self, IllegalStateError> {
        let mut cards = cards.into_iter();
        let Some(root) = cards.next() else {
            let e = IllegalStateError("cannot open a session without a card".to_string());
            error!(error = %e, "session misuse");
            return Err(e);
        };
        let mut stack = NavigationStack::new(root, entry, policy);
        let rest: Vec<_> = cards
            .map(NavigationOp::Push)
            .collect();
        if !rest.is_empty() {
            // Pushes cannot fail.
            let _ = stack.apply(rest);
        }
        Ok(Self {
            state: Mutex::new(SessionState::new(stack)),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn top_card(&self) -> Option<Arc<Card>> {
        self.lock().stack.top().map(|f| Arc::clone(f.card()))
    }

    pub fn depth(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn stack_names(&self) -> Vec<Option<String>> {
        self.lock()
            .stack
            .names()
            .into_iter()
            .map(|n| n.map(str::to_string))
            .collect()
    }

    pub fn generation(&self) -> u64 {
        self.lock().stack.generation()
    }

    pub fn presentation(&self) -> Presentation {
        self.lock().stack.presentation()
    }

    /// Current values of `name` on the visible card of `surface`.
    pub fn field_values(&self, surface: Surface, name: &str) -> Option<Vec<String>> {
        self.lock()
            .visible(surface)
            .and_then(|f| f.form().values(name).map(<[String]>::to_vec))
    }

    pub fn top_dialog(&self) -> Option<Arc<Card>> {
        self.lock().dialogs.last().map(|f| Arc::clone(f.card()))
    }

    pub fn dialog_depth(&self) -> usize {
        self.lock().dialogs.len()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().pending.values().filter(|p| !p.cancelled).count()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn render(&self) -> Option<SurfaceEffect> {
        self.lock().render()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
