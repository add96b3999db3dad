//! Action engine: turns surface events into dispatches and applies what the
//! callbacks send back.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::effect::SurfaceEffect;
use super::navigation::EntryPoint;
use super::services::ports::{Dispatcher, EngineSettings, EventPayload};
use super::session::{Applied, PendingDispatch, ResponseContext, Session, TicketId};
use crate::core::error::{DispatchError, EngineError, IllegalStateError};
use crate::models::action::{Action, InteractionMode, LoadIndicator, OnClick};
use crate::models::card::{ActionRef, Area, Card, Surface};
use crate::models::response::ActionResponse;
use crate::models::widget::{Resolved, Widget};

/// Raw event from a render surface: an optional field edit and an optional
/// reference to the callback it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    #[serde(default)]
    pub surface: Surface,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_ref: Option<ActionRef>,
}

impl InteractionEvent {
    pub fn click(action_ref: ActionRef) -> Self {
        Self {
            surface: action_ref.surface,
            action_ref: Some(action_ref),
            ..Self::default()
        }
    }

    pub fn edit(field_name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            widget_field_name: Some(field_name.into()),
            value: Some(values),
            ..Self::default()
        }
    }

    pub fn then(mut self, action_ref: ActionRef) -> Self {
        self.action_ref = Some(action_ref);
        self
    }
}

/// A dispatch that passed every local check and is ready to be sent. It must
/// be handed back to [`Engine::complete`] or cancelled.
#[derive(Debug)]
pub struct DispatchTicket {
    id: TicketId,
    action: Action,
    payload: EventPayload,
    cancel: watch::Receiver<bool>,
}

impl DispatchTicket {
    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}

#[derive(Debug)]
pub enum Interaction {
    Dispatch(DispatchTicket),
    /// Click behavior handled on the client, no callback involved.
    Immediate(Applied),
}

pub struct Engine {
    dispatcher: Arc<dyn Dispatcher>,
    settings: EngineSettings,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn illegal(msg: impl Into<String>) -> EngineError {
    let e = IllegalStateError(msg.into());
    error!(error = %e, "engine misuse");
    EngineError::IllegalState(e)
}

fn local_click(click: &OnClick) -> Applied {
    let effect = match click {
        OnClick::OpenLink(link) => SurfaceEffect::OpenLink(link.clone()),
        OnClick::AuthorizationAction(a) => SurfaceEffect::StartAuthorization(a.clone()),
        OnClick::OverflowMenu(menu) => SurfaceEffect::ShowOverflowMenu(menu.clone()),
        OnClick::Action(_) | OnClick::OpenLinkAction(_) | OnClick::ComposeAction(_) => {
            return Applied::default()
        }
    };
    Applied {
        effects: vec![effect],
        changed: false,
    }
}

/// Forgets the pending entry if `complete` is dropped before it settles, so a
/// host-side timeout or abort cannot leave the origin card blocked.
struct Settling<'a> {
    session: &'a Session,
    id: TicketId,
}

impl Drop for Settling<'_> {
    fn drop(&mut self) {
        if self.session.lock().pending.remove(&self.id).is_some() {
            warn!(ticket = self.id, "dispatch dropped before it settled");
        }
    }
}

fn widget_at<'a>(card: &'a Card, r: &ActionRef) -> Option<&'a Widget> {
    if r.area != Area::Section {
        return None;
    }
    card.sections().get(r.section)?.widgets().get(r.widget)
}

impl Engine {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, settings: EngineSettings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn open_session(&self, root: Card, entry: EntryPoint) -> Session {
        Session::open(root, entry, self.settings.single_card_pop)
    }

    pub fn open_session_with(
        &self,
        cards: Vec<Card>,
        entry: EntryPoint,
    ) -> Result<Session, EngineError> {
        Ok(Session::open_stack(
            cards,
            entry,
            self.settings.single_card_pop,
        )?)
    }

    /// Stores a user edit on the visible card of `surface`.
    pub fn record_edit(
        &self,
        session: &Session,
        surface: Surface,
        field_name: &str,
        values: Vec<String>,
    ) -> Result<bool, EngineError> {
        let mut state = session.lock();
        state.ensure_open()?;
        let frame = state
            .visible_mut(surface)
            .ok_or_else(|| illegal("no visible card on this surface"))?;
        frame
            .form_mut()
            .set(field_name, values)
            .ok_or_else(|| EngineError::UnknownField(field_name.to_string()))
    }

    /// Resolves `r` on the visible card and runs every client-side check. No
    /// callback is invoked here.
    pub fn begin(&self, session: &Session, r: ActionRef) -> Result<Interaction, EngineError> {
        let mut state = session.lock();
        state.ensure_open()?;
        let (origin, card, form) = {
            let frame = state
                .visible(r.surface)
                .ok_or_else(|| EngineError::UnknownAction(r.to_string()))?;
            (frame.id(), Arc::clone(frame.card()), frame.form().clone())
        };
        if state.blocked(r.surface, origin) {
            warn!(action_ref = %r, "input blocked by in-flight dispatch");
            return Err(EngineError::InputBlocked);
        }

        let (action, submit) = match card.resolve(&r) {
            None => {
                warn!(action_ref = %r, "no action at reference");
                return Err(EngineError::UnknownAction(r.to_string()));
            }
            Some(Resolved::Callback(a)) => (a.clone(), false),
            Some(Resolved::Click(click)) => match click.action() {
                Some(a) => (a.clone(), true),
                None => return Ok(Interaction::Immediate(local_click(click))),
            },
        };

        if submit {
            let missing = form.missing_required(&card, &action);
            if !missing.is_empty() {
                warn!(callback = action.name(), ?missing, "dispatch refused");
                return Err(EngineError::MissingRequiredFields(missing));
            }
        }

        let field_name = widget_at(&card, &r)
            .and_then(Widget::field_name)
            .map(str::to_string);
        let payload = EventPayload {
            invoked_by: r,
            card_name: card.name().map(str::to_string),
            field_name: field_name.clone(),
            form_inputs: form.snapshot(),
            parameters: action.params().clone(),
        };
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let blocks_input = action.indicator() == LoadIndicator::Spinner;
        let generation = state.stack.generation();
        let id = state.register(PendingDispatch {
            surface: r.surface,
            origin,
            target: action.name().to_string(),
            field_name,
            form_snapshot: form,
            blocks_input,
            persist_values: action.persists_values(),
            open_dialog: action.mode() == InteractionMode::OpenDialog,
            generation,
            cancelled: false,
            awaited: false,
            cancel_tx,
        });
        info!(ticket = id, callback = action.name(), blocks_input, "dispatch begin");

        Ok(Interaction::Dispatch(DispatchTicket {
            id,
            action,
            payload,
            cancel: cancel_rx,
        }))
    }

    /// Sends the ticket's action and applies the response in arrival order.
    pub async fn complete(
        &self,
        session: &Session,
        ticket: DispatchTicket,
    ) -> Result<Applied, EngineError> {
        let DispatchTicket {
            id,
            action,
            payload,
            mut cancel,
        } = ticket;
        {
            let mut state = session.lock();
            match state.pending.get_mut(&id) {
                Some(p) => p.awaited = true,
                None => {
                    debug!(ticket = id, "ticket cancelled before dispatch");
                    return Err(EngineError::Cancelled);
                }
            }
        }
        let _settling = Settling { session, id };
        let call = self.dispatcher.invoke(&action, &payload);
        let raced = async move {
            tokio::select! {
                result = call => Some(result),
                _ = cancel.changed() => None,
            }
        };

        let outcome = match self.settings.dispatch_timeout_ms {
            Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), raced).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    self.abandon(session, id)?;
                    warn!(ticket = id, timeout_ms = ms, "dispatch timed out");
                    return Err(EngineError::TimedOut(ms));
                }
            },
            None => raced.await,
        };

        match outcome {
            Some(result) => self.settle(session, id, result),
            None => {
                self.abandon(session, id)?;
                Err(EngineError::Cancelled)
            }
        }
    }

    /// Stops waiting for `id`. Its response is never applied; responses
    /// applied while it was in flight stay. A ticket nobody is completing yet
    /// is forgotten right away.
    pub fn cancel(&self, session: &Session, id: TicketId) -> Result<(), EngineError> {
        let mut state = session.lock();
        let pending = match state.pending.get_mut(&id) {
            Some(p) if !p.cancelled => p,
            _ => return Err(illegal(format!("ticket {id} is unknown or already settled"))),
        };
        pending.cancelled = true;
        let _ = pending.cancel_tx.send(true);
        info!(ticket = id, callback = %pending.target, "dispatch cancelled");
        if !pending.awaited {
            state.pending.remove(&id);
        }
        Ok(())
    }

    /// Edit, then dispatch and apply, in one call.
    pub async fn handle(
        &self,
        session: &Session,
        event: InteractionEvent,
    ) -> Result<Applied, EngineError> {
        let InteractionEvent {
            surface,
            widget_field_name,
            value,
            action_ref,
        } = event;

        let mut changed = false;
        if let (Some(name), Some(values)) = (widget_field_name, value) {
            changed = self.record_edit(session, surface, &name, values)?;
        }
        let Some(r) = action_ref else {
            return Ok(Applied {
                effects: Vec::new(),
                changed,
            });
        };

        let mut applied = match self.begin(session, r)? {
            Interaction::Immediate(applied) => applied,
            Interaction::Dispatch(ticket) => self.complete(session, ticket).await?,
        };
        applied.changed |= changed;
        Ok(applied)
    }

    /// Applies a response that was not requested through a ticket, e.g. one
    /// pushed by the host.
    pub fn apply_response(
        &self,
        session: &Session,
        response: ActionResponse,
    ) -> Result<Applied, EngineError> {
        let mut state = session.lock();
        state.ensure_open()?;
        state.apply_response(response, ResponseContext::default())
    }

    fn settle(
        &self,
        session: &Session,
        id: TicketId,
        result: Result<ActionResponse, DispatchError>,
    ) -> Result<Applied, EngineError> {
        let mut state = session.lock();
        let pending = state
            .pending
            .remove(&id)
            .ok_or_else(|| illegal(format!("ticket {id} is unknown or already settled")))?;
        if pending.cancelled {
            Self::log_cancelled(id, pending.generation, state.stack.generation());
            return Err(EngineError::Cancelled);
        }
        state.ensure_open()?;

        match result {
            Ok(response) => {
                info!(
                    ticket = id,
                    callback = %pending.target,
                    kind = response.kind().label(),
                    "dispatch complete"
                );
                state.apply_response(response, pending.into())
            }
            Err(DispatchError::AuthorizationRequired(auth)) => {
                info!(ticket = id, resource = %auth.resource_display_name, "authorization required");
                Ok(Applied {
                    effects: vec![SurfaceEffect::AuthorizationPrompt(auth)],
                    changed: false,
                })
            }
            Err(e) => {
                warn!(ticket = id, callback = %pending.target, error = %e, "dispatch failed");
                Ok(Applied {
                    effects: vec![SurfaceEffect::ShowNotification(
                        self.settings.dispatch_error_message.clone(),
                    )],
                    changed: false,
                })
            }
        }
    }

    /// Drops the pending entry of a cancelled or timed-out ticket.
    fn abandon(&self, session: &Session, id: TicketId) -> Result<(), EngineError> {
        let mut state = session.lock();
        let pending = state
            .pending
            .remove(&id)
            .ok_or_else(|| illegal(format!("ticket {id} is unknown or already settled")))?;
        Self::log_cancelled(id, pending.generation, state.stack.generation());
        Ok(())
    }

    fn log_cancelled(id: TicketId, at_dispatch: u64, now: u64) {
        if at_dispatch == now {
            debug!(ticket = id, "dispatch abandoned; stack untouched");
        } else {
            debug!(
                ticket = id,
                moved = now - at_dispatch,
                "dispatch abandoned; responses applied meanwhile are kept"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/engine.rs"]
mod tests;
