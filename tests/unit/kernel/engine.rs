use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rustc_hash::FxHashMap;
use tokio::sync::oneshot;

use crate::core::error::{AuthorizationRequired, NavigationError};
use crate::kernel::services::adapters::CallbackRegistry;
use crate::kernel::services::ports::{DispatchFuture, SingleCardPop};
use crate::models::action::{Clickable, OpenLink};
use crate::models::card::CardSection;
use crate::models::response::{DialogResponse, Navigation, SuggestionsResponse};
use crate::models::widget::{ButtonSet, TextButton, TextInput, TextParagraph, Trigger};

fn page(name: &str, widgets: Vec<Widget>) -> Card {
    let section = widgets
        .into_iter()
        .fold(CardSection::builder(), |b, w| b.add_widget(w))
        .build()
        .unwrap();
    Card::builder().name(name).add_section(section).build().unwrap()
}

fn text(name: &str) -> Card {
    page(name, vec![TextParagraph::new(name).into()])
}

fn button(action: Action) -> Widget {
    ButtonSet::new()
        .add_button(TextButton::new("Go").on_click_action(action))
        .into()
}

fn push(name: &str) -> ActionResponse {
    ActionResponse::navigation(Navigation::new().push_card(text(name))).unwrap()
}

fn engine(registry: CallbackRegistry) -> Engine {
    Engine::new(Arc::new(registry), EngineSettings::default())
}

fn names(session: &Session) -> Vec<String> {
    session
        .stack_names()
        .into_iter()
        .map(|n| n.unwrap_or_default())
        .collect()
}

fn ticket(interaction: Interaction) -> DispatchTicket {
    match interaction {
        Interaction::Dispatch(t) => t,
        other => panic!("expected a dispatch, got {other:?}"),
    }
}

/// Dispatcher whose responses are released by the test, one target at a time.
#[derive(Default)]
struct Gated {
    gates: Mutex<FxHashMap<String, oneshot::Receiver<ActionResponse>>>,
}

impl Gated {
    fn gate(&self, target: &str) -> oneshot::Sender<ActionResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(target.to_string(), rx);
        tx
    }
}

impl Dispatcher for Gated {
    fn invoke(&self, action: &Action, _event: &EventPayload) -> DispatchFuture {
        let rx = self.gates.lock().unwrap().remove(action.name());
        let target = action.name().to_string();
        Box::pin(async move {
            match rx {
                Some(rx) => rx
                    .await
                    .map_err(|_| DispatchError::Failed("gate dropped".to_string())),
                None => Err(DispatchError::UnknownTarget(target)),
            }
        })
    }
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_dispatcher() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = CallbackRegistry::new();
    let counter = Arc::clone(&calls);
    registry.register("send", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        ActionResponse::notification("sent").map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page(
            "form",
            vec![
                TextInput::new("email").into(),
                button(Action::target("send").required_widget("email")),
            ],
        ),
        EntryPoint::Homepage,
    );
    let click = ActionRef::widget(0, 1).item(0);

    let err = engine.begin(&session, click).unwrap_err();
    assert!(matches!(err, EngineError::MissingRequiredFields(ref f) if f == &["email".to_string()]));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.in_flight(), 0);

    let event = InteractionEvent::edit("email", vec!["ada@example.com".to_string()]).then(click);
    let applied = engine.handle(&session, event).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(applied.changed);
    assert_eq!(
        applied.effects,
        vec![SurfaceEffect::ShowNotification("sent".to_string())]
    );
}

#[test]
fn disabled_button_is_refused_before_dispatch() {
    let engine = engine(CallbackRegistry::new());
    let session = engine.open_session(
        page(
            "A",
            vec![ButtonSet::new()
                .add_button(
                    TextButton::new("Go")
                        .disabled(true)
                        .on_click_action(Action::target("go")),
                )
                .into()],
        ),
        EntryPoint::Homepage,
    );
    assert!(matches!(
        engine.begin(&session, ActionRef::widget(0, 0).item(0)),
        Err(EngineError::UnknownAction(_))
    ));
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn open_dialog_action_shows_pushed_card_as_dialog() {
    let mut registry = CallbackRegistry::new();
    registry.register("ask", |_, _| Ok(push("Q")));
    registry.register("go", |_, _| Ok(push("B")));
    let engine = engine(registry);
    let session = engine.open_session(
        page(
            "A",
            vec![
                button(Action::target("ask").interaction_mode(InteractionMode::OpenDialog)),
                button(Action::target("go")),
            ],
        ),
        EntryPoint::Homepage,
    );

    let applied = engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 0).item(0)))
        .await
        .unwrap();
    assert!(matches!(
        applied.effects.as_slice(),
        [SurfaceEffect::ShowDialog(card)] if card.name() == Some("Q")
    ));
    assert_eq!(session.dialog_depth(), 1);
    assert_eq!(names(&session), vec!["A"]);

    engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 1).item(0)))
        .await
        .unwrap();
    assert_eq!(names(&session), vec!["A", "B"]);
}

#[tokio::test]
async fn payload_carries_form_card_and_parameters() {
    let engine = engine(CallbackRegistry::new());
    let session = engine.open_session(
        page(
            "order",
            vec![
                TextInput::new("qty").value("2").into(),
                button(Action::target("buy").parameter("sku", "X-1")),
            ],
        ),
        EntryPoint::Homepage,
    );
    let t = ticket(engine.begin(&session, ActionRef::widget(0, 1).item(0)).unwrap());
    assert_eq!(t.action().name(), "buy");
    let payload = t.payload();
    assert_eq!(payload.card_name.as_deref(), Some("order"));
    assert_eq!(payload.form_inputs.get("qty"), Some(&vec!["2".to_string()]));
    assert_eq!(payload.parameters.get("sku").map(String::as_str), Some("X-1"));
    assert_eq!(payload.invoked_by, ActionRef::widget(0, 1).item(0));
    assert_eq!(session.in_flight(), 1);
}

#[tokio::test]
async fn responses_apply_in_arrival_order() {
    let gated = Arc::new(Gated::default());
    let release_b = gated.gate("to_b");
    let release_c = gated.gate("to_c");
    let engine = Arc::new(Engine::new(gated.clone(), EngineSettings::default()));
    let session = Arc::new(engine.open_session(
        page(
            "A",
            vec![
                button(Action::target("to_b")),
                button(Action::target("to_c")),
            ],
        ),
        EntryPoint::Homepage,
    ));

    let t1 = ticket(engine.begin(&session, ActionRef::widget(0, 0).item(0)).unwrap());
    let t2 = ticket(engine.begin(&session, ActionRef::widget(0, 1).item(0)).unwrap());
    assert_eq!(session.in_flight(), 2);

    let first = {
        let (engine, session) = (Arc::clone(&engine), Arc::clone(&session));
        tokio::spawn(async move { engine.complete(&session, t1).await })
    };
    let second = {
        let (engine, session) = (Arc::clone(&engine), Arc::clone(&session));
        tokio::spawn(async move { engine.complete(&session, t2).await })
    };

    release_c.send(push("C")).unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(names(&session), vec!["A", "C"]);

    release_b.send(push("B")).unwrap();
    first.await.unwrap().unwrap();
    assert_eq!(names(&session), vec!["A", "C", "B"]);
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn spinner_blocks_input_until_settled() {
    let mut registry = CallbackRegistry::new();
    registry.register("slow", |_, _| {
        ActionResponse::notification("done").map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page(
            "A",
            vec![button(
                Action::target("slow").load_indicator(LoadIndicator::Spinner),
            )],
        ),
        EntryPoint::Homepage,
    );
    let click = ActionRef::widget(0, 0).item(0);

    let t = ticket(engine.begin(&session, click).unwrap());
    assert!(matches!(
        engine.begin(&session, click),
        Err(EngineError::InputBlocked)
    ));
    engine.complete(&session, t).await.unwrap();
    assert!(engine.begin(&session, click).is_ok());
}

#[tokio::test]
async fn cancelled_dispatch_is_never_applied() {
    let gated = Arc::new(Gated::default());
    let release = gated.gate("next");
    let engine = Arc::new(Engine::new(gated.clone(), EngineSettings::default()));
    let session = Arc::new(engine.open_session(
        page("A", vec![button(Action::target("next"))]),
        EntryPoint::Homepage,
    ));
    let t = ticket(engine.begin(&session, ActionRef::widget(0, 0).item(0)).unwrap());
    let id = t.id();
    let waiting = {
        let (engine, session) = (Arc::clone(&engine), Arc::clone(&session));
        tokio::spawn(async move { engine.complete(&session, t).await })
    };

    engine.cancel(&session, id).unwrap();
    assert_eq!(session.in_flight(), 0);
    let _ = release.send(push("B"));
    assert!(matches!(waiting.await.unwrap(), Err(EngineError::Cancelled)));
    assert_eq!(names(&session), vec!["A"]);
    assert!(matches!(
        engine.cancel(&session, id),
        Err(EngineError::IllegalState(_))
    ));
}

#[tokio::test]
async fn dropping_complete_releases_the_spinner_block() {
    let gated = Arc::new(Gated::default());
    let _never = gated.gate("stall");
    let engine = Engine::new(gated.clone(), EngineSettings::default());
    let session = engine.open_session(
        page(
            "A",
            vec![button(
                Action::target("stall").load_indicator(LoadIndicator::Spinner),
            )],
        ),
        EntryPoint::Homepage,
    );
    let click = ActionRef::widget(0, 0).item(0);

    let t = ticket(engine.begin(&session, click).unwrap());
    let host_timeout =
        tokio::time::timeout(Duration::from_millis(10), engine.complete(&session, t)).await;
    assert!(host_timeout.is_err());

    assert_eq!(session.in_flight(), 0);
    assert!(engine.begin(&session, click).is_ok());
    assert_eq!(names(&session), vec!["A"]);
}

#[tokio::test]
async fn cancelling_an_unawaited_ticket_forgets_it() {
    let engine = engine(CallbackRegistry::new());
    let session = engine.open_session(
        page(
            "A",
            vec![button(
                Action::target("next").load_indicator(LoadIndicator::Spinner),
            )],
        ),
        EntryPoint::Homepage,
    );
    let click = ActionRef::widget(0, 0).item(0);

    let t = ticket(engine.begin(&session, click).unwrap());
    engine.cancel(&session, t.id()).unwrap();
    assert_eq!(session.lock().pending.len(), 0);
    assert!(matches!(
        engine.complete(&session, t).await,
        Err(EngineError::Cancelled)
    ));
    assert!(engine.begin(&session, click).is_ok());
}

#[tokio::test]
async fn timed_out_dispatch_is_dropped() {
    let gated = Arc::new(Gated::default());
    let _never = gated.gate("stall");
    let settings = EngineSettings {
        dispatch_timeout_ms: Some(20),
        ..EngineSettings::default()
    };
    let engine = Engine::new(gated.clone(), settings);
    let session = engine.open_session(
        page("A", vec![button(Action::target("stall"))]),
        EntryPoint::Homepage,
    );
    let t = ticket(engine.begin(&session, ActionRef::widget(0, 0).item(0)).unwrap());
    let err = engine.complete(&session, t).await.unwrap_err();
    assert!(matches!(err, EngineError::TimedOut(20)));
    assert_eq!(session.in_flight(), 0);
    assert_eq!(names(&session), vec!["A"]);
}

#[tokio::test]
async fn dispatch_failures_become_notifications() {
    let mut registry = CallbackRegistry::new();
    registry.register("boom", |_, _| Err(DispatchError::Failed("backend down".to_string())));
    let settings = EngineSettings {
        dispatch_error_message: "Try later".to_string(),
        ..EngineSettings::default()
    };
    let engine = Engine::new(Arc::new(registry), settings);
    let session = engine.open_session(
        page(
            "A",
            vec![
                button(Action::target("boom")),
                button(Action::target("unregistered")),
            ],
        ),
        EntryPoint::Homepage,
    );

    for widget in [0, 1] {
        let applied = engine
            .handle(&session, InteractionEvent::click(ActionRef::widget(0, widget).item(0)))
            .await
            .unwrap();
        assert_eq!(
            applied.effects,
            vec![SurfaceEffect::ShowNotification("Try later".to_string())]
        );
        assert!(!applied.changed);
    }
    assert_eq!(names(&session), vec!["A"]);
}

#[tokio::test]
async fn authorization_required_prompts_the_user() {
    let auth = AuthorizationRequired {
        resource_display_name: "Calendar".to_string(),
        authorization_url: "https://auth.example.com/start".to_string(),
    };
    let raised = auth.clone();
    let mut registry = CallbackRegistry::new();
    registry.register("calendar", move |_, _| Err(raised.clone().into()));
    let engine = engine(registry);
    let session = engine.open_session(
        page("A", vec![button(Action::target("calendar"))]),
        EntryPoint::Homepage,
    );
    let applied = engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 0).item(0)))
        .await
        .unwrap();
    assert_eq!(applied.effects, vec![SurfaceEffect::AuthorizationPrompt(auth)]);
}

#[tokio::test]
async fn failed_navigation_keeps_the_stack() {
    let mut registry = CallbackRegistry::new();
    registry.register("jump", |_, _| {
        ActionResponse::navigation(Navigation::new().push_card(text("D")).pop_to_named_card("Z"))
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page("A", vec![button(Action::target("jump"))]),
        EntryPoint::Homepage,
    );
    let err = engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 0).item(0)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Navigation(NavigationError::NamedCardNotFound { .. })
    ));
    assert_eq!(names(&session), vec!["A"]);
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn local_clicks_do_not_dispatch() {
    let engine = engine(CallbackRegistry::new());
    let link = OpenLink::new("https://example.com/docs");
    let session = engine.open_session(
        page(
            "A",
            vec![ButtonSet::new()
                .add_button(TextButton::new("Docs").open_link(link.clone()))
                .into()],
        ),
        EntryPoint::Homepage,
    );
    match engine.begin(&session, ActionRef::widget(0, 0).item(0)).unwrap() {
        Interaction::Immediate(applied) => {
            assert_eq!(applied.effects, vec![SurfaceEffect::OpenLink(link)]);
            assert!(!applied.changed);
        }
        other => panic!("expected an immediate effect, got {other:?}"),
    }
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn persisted_values_survive_navigation() {
    let mut registry = CallbackRegistry::new();
    registry.register("next", |_, _| {
        ActionResponse::navigation(
            Navigation::new().push_card(page("B", vec![TextInput::new("q").value("server").into()])),
        )
        .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);

    for (persist, expected) in [(true, "typed"), (false, "server")] {
        let session = engine.open_session(
            page(
                "A",
                vec![
                    TextInput::new("q").into(),
                    button(Action::target("next").persist_values(persist)),
                ],
            ),
            EntryPoint::Homepage,
        );
        let event = InteractionEvent::edit("q", vec!["typed".to_string()])
            .then(ActionRef::widget(0, 1).item(0));
        engine.handle(&session, event).await.unwrap();
        assert_eq!(
            session.field_values(Surface::Stack, "q"),
            Some(vec![expected.to_string()])
        );
    }
}

#[tokio::test]
async fn exit_closes_the_session() {
    let mut registry = CallbackRegistry::new();
    registry.register("close", |_, _| {
        ActionResponse::navigation(Navigation::new().pop_card())
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let settings = EngineSettings {
        single_card_pop: SingleCardPop::Exit,
        ..EngineSettings::default()
    };
    let engine = Engine::new(Arc::new(registry), settings);
    let session = engine.open_session(
        page("A", vec![button(Action::target("close"))]),
        EntryPoint::Homepage,
    );
    let click = ActionRef::widget(0, 0).item(0);
    let applied = engine
        .handle(&session, InteractionEvent::click(click))
        .await
        .unwrap();
    assert_eq!(applied.effects, vec![SurfaceEffect::Exit]);
    assert!(session.is_closed());
    assert!(matches!(
        engine.begin(&session, click),
        Err(EngineError::IllegalState(_))
    ));
}

#[tokio::test]
async fn suggestions_answer_the_requesting_field() {
    let mut registry = CallbackRegistry::new();
    registry.register("suggest", |_, event| {
        let typed = event.form_inputs.get("city").cloned().unwrap_or_default();
        ActionResponse::builder()
            .suggestions(SuggestionsResponse {
                suggestions: typed.iter().map(|t| format!("{t}ville")).collect(),
            })
            .build()
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page(
            "A",
            vec![TextInput::new("city")
                .suggestions_action(Action::target("suggest"))
                .into()],
        ),
        EntryPoint::Homepage,
    );
    let event = InteractionEvent::edit("city", vec!["Spring".to_string()])
        .then(ActionRef::widget(0, 0).trigger(Trigger::Suggestions));
    let applied = engine.handle(&session, event).await.unwrap();
    assert_eq!(
        applied.effects,
        vec![SurfaceEffect::ShowSuggestions {
            field_name: Some("city".to_string()),
            suggestions: vec!["Springville".to_string()],
        }]
    );
}

#[tokio::test]
async fn state_changed_invalidates_cache() {
    let mut registry = CallbackRegistry::new();
    registry.register("save", |_, _| {
        ActionResponse::builder()
            .navigation(Navigation::new().update_card(text("A2")))
            .state_changed(true)
            .build()
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page("A", vec![button(Action::target("save"))]),
        EntryPoint::Homepage,
    );
    let applied = engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 0).item(0)))
        .await
        .unwrap();
    assert!(matches!(applied.effects.first(), Some(SurfaceEffect::Render { .. })));
    assert_eq!(applied.effects.last(), Some(&SurfaceEffect::InvalidateCache));
    assert_eq!(names(&session), vec!["A2"]);
}

#[tokio::test]
async fn dialog_surface_events_resolve_on_the_dialog() {
    let mut registry = CallbackRegistry::new();
    registry.register("open", |_, _| {
        ActionResponse::builder()
            .dialog(DialogResponse::show(page(
                "dialog",
                vec![button(Action::target("confirm"))],
            )))
            .build()
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    registry.register("confirm", |_, event| {
        assert_eq!(event.card_name.as_deref(), Some("dialog"));
        ActionResponse::builder()
            .dialog(DialogResponse::close(crate::models::response::StatusCode::Ok))
            .build()
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    });
    let engine = engine(registry);
    let session = engine.open_session(
        page("A", vec![button(Action::target("open"))]),
        EntryPoint::Homepage,
    );

    let applied = engine
        .handle(&session, InteractionEvent::click(ActionRef::widget(0, 0).item(0)))
        .await
        .unwrap();
    assert!(matches!(applied.effects.as_slice(), [SurfaceEffect::ShowDialog(_)]));
    assert_eq!(session.dialog_depth(), 1);

    engine
        .handle(
            &session,
            InteractionEvent::click(ActionRef::widget(0, 0).item(0).on_dialog()),
        )
        .await
        .unwrap();
    assert_eq!(session.dialog_depth(), 0);
    assert_eq!(names(&session), vec!["A"]);
}

#[test]
fn edits_to_unknown_fields_are_rejected() {
    let engine = engine(CallbackRegistry::new());
    let session = engine.open_session(
        page("A", vec![TextInput::new("q").into()]),
        EntryPoint::Homepage,
    );
    assert!(matches!(
        engine.record_edit(&session, Surface::Stack, "missing", vec![]),
        Err(EngineError::UnknownField(ref n)) if n == "missing"
    ));
    assert!(engine
        .record_edit(&session, Surface::Stack, "q", vec!["x".to_string()])
        .unwrap());
    assert!(matches!(
        engine.begin(&session, ActionRef::widget(0, 5)),
        Err(EngineError::UnknownAction(_))
    ));
}

#[test]
fn host_pushed_responses_apply_directly() {
    let engine = engine(CallbackRegistry::new());
    let session = engine
        .open_session_with(vec![text("A"), text("B")], EntryPoint::Homepage)
        .unwrap();
    let applied = engine
        .apply_response(
            &session,
            ActionResponse::navigation(Navigation::new().pop_to_root()).unwrap(),
        )
        .unwrap();
    assert!(applied.changed);
    assert_eq!(names(&session), vec!["A"]);
}
