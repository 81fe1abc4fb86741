mod common;

use serde_json::json;

use common::{
    header, http_requests, launch_operations, replay, respond, respond_json, row, start_with,
    Tester,
};
use shared::app::AlertKind;
use shared::capabilities::{ChangeKind, ChangeNotification, LaunchOperation, RealtimeOutput};
use shared::model::{RequestId, RequestStatus};
use shared::{Event, Model, ViewModel};

fn started() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    start_with(
        &app,
        &mut model,
        vec![row(1, "critical", "active"), row(2, "low", "completed")],
    );
    (app, model)
}

fn open_gate(app: &Tester, model: &mut Model, id: &str) {
    app.update(
        Event::MarkHelpedRequested {
            id: RequestId::new(id),
        },
        model,
    );
}

#[test]
fn test_wrong_code_changes_nothing() {
    let (app, mut model) = started();
    open_gate(&app, &mut model, "1");
    assert!(model.verification.is_open());

    for attempt in ["save", "saved!", " saved"] {
        app.update(
            Event::VerificationInputChanged {
                value: attempt.into(),
            },
            &mut model,
        );
        let update = app.update(Event::VerificationSubmitted, &mut model);
        assert!(http_requests(update).is_empty(), "{attempt}");
        assert_eq!(model.alert.take().unwrap().message, "Incorrect code");
    }

    assert!(model.verification.is_open());
    assert_eq!(
        model.sync.find(&RequestId::new("1")).unwrap().status,
        RequestStatus::Active
    );
}

#[test]
fn test_correct_code_marks_request_completed() {
    let (app, mut model) = started();
    open_gate(&app, &mut model, "1");
    app.update(
        Event::VerificationInputChanged {
            value: "SaVeD".into(),
        },
        &mut model,
    );

    let update = app.update(Event::VerificationSubmitted, &mut model);
    let mut patches = http_requests(update);
    assert_eq!(patches.len(), 1);
    let patch = &patches[0].operation;
    assert_eq!(patch.method, "PATCH");
    assert_eq!(
        patch.url,
        "https://demo.supabase.co/rest/v1/aid_requests?id=eq.1"
    );
    assert_eq!(header(patch, "apikey"), Some("anon-key"));
    assert_eq!(patch.body, br#"{"status":"completed"}"#.to_vec());

    // Gate shows the in-flight state and refuses a double submit.
    assert!(ViewModel::build(&model).verification.unwrap().submitting);
    let update = app.update(Event::VerificationSubmitted, &mut model);
    assert!(http_requests(update).is_empty());

    let resolved = respond(&app, &mut patches[0], 204, b"");
    replay(&app, resolved, &mut model);

    assert!(!model.verification.is_open());
    let alert = model.alert.clone().unwrap();
    assert_eq!(alert.kind, AlertKind::Success);
    assert_eq!(alert.message, "Status Updated!");
    assert_eq!(
        model.sync.find(&RequestId::new("1")).unwrap().status,
        RequestStatus::Completed
    );
    assert!(ViewModel::build(&model).markers.is_empty());
}

#[test]
fn test_failed_update_keeps_gate_open_with_error() {
    let (app, mut model) = started();
    open_gate(&app, &mut model, "1");
    app.update(
        Event::VerificationInputChanged {
            value: "saved".into(),
        },
        &mut model,
    );

    let mut patch = http_requests(app.update(Event::VerificationSubmitted, &mut model))
        .pop()
        .unwrap();
    let denied = json!({"message": "permission denied for table aid_requests"});
    let resolved = respond_json(&app, &mut patch, 403, &denied);
    replay(&app, resolved, &mut model);

    let view = ViewModel::build(&model).verification.unwrap();
    assert!(!view.submitting);
    assert_eq!(view.input, "saved");
    assert!(view.error.is_some());
    assert_eq!(
        model.sync.find(&RequestId::new("1")).unwrap().status,
        RequestStatus::Active
    );

    // The rescuer can try again from the same dialog.
    let update = app.update(Event::VerificationSubmitted, &mut model);
    assert_eq!(http_requests(update).len(), 1);
}

#[test]
fn test_refetch_sent_before_completion_cannot_revive_request() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut subscription = start_with(&app, &mut model, vec![row(1, "critical", "active")]);

    // Someone else's insert triggers a re-fetch that is still pending.
    let change = RealtimeOutput::Change(ChangeNotification {
        kind: ChangeKind::Insert,
        schema: "public".into(),
        table: "aid_requests".into(),
    });
    let mut refetch = replay(
        &app,
        app.resolve(&mut subscription, change).unwrap(),
        &mut model,
    )
    .into_iter()
    .flat_map(http_requests)
    .next()
    .unwrap();

    open_gate(&app, &mut model, "1");
    app.update(
        Event::VerificationInputChanged {
            value: "SAVED".into(),
        },
        &mut model,
    );
    let mut patch = http_requests(app.update(Event::VerificationSubmitted, &mut model))
        .pop()
        .unwrap();
    replay(&app, respond(&app, &mut patch, 204, b""), &mut model);

    // The re-fetch was answered before the write landed.
    let stale = json!([row(1, "critical", "active"), row(2, "low", "active")]);
    replay(&app, respond_json(&app, &mut refetch, 200, &stale), &mut model);

    assert_eq!(
        model.sync.find(&RequestId::new("1")).unwrap().status,
        RequestStatus::Completed
    );
    let view = ViewModel::build(&model);
    assert_eq!(view.markers.len(), 1);
    assert_eq!(view.stats.completed, 1);
    open_gate(&app, &mut model, "1");
    assert!(!model.verification.is_open());
}

#[test]
fn test_completed_request_cannot_be_reopened() {
    let (app, mut model) = started();
    open_gate(&app, &mut model, "2");
    assert!(!model.verification.is_open());
    assert_eq!(
        model.alert.unwrap().message,
        "This request has already been marked as helped"
    );
}

#[test]
fn test_cancel_closes_gate() {
    let (app, mut model) = started();
    open_gate(&app, &mut model, "1");
    app.update(
        Event::VerificationInputChanged {
            value: "SAV".into(),
        },
        &mut model,
    );
    app.update(Event::VerificationCancelled, &mut model);
    assert!(!model.verification.is_open());
    assert!(ViewModel::build(&model).verification.is_none());

    // Reopening starts from an empty input.
    open_gate(&app, &mut model, "1");
    assert_eq!(model.verification.input(), "");
}

#[test]
fn test_popup_actions_launch_dialer_and_directions() {
    let (app, mut model) = started();

    let ops = launch_operations(app.update(
        Event::CallRequested {
            id: RequestId::new("1"),
        },
        &mut model,
    ));
    assert_eq!(
        ops,
        vec![LaunchOperation::Dial {
            number: "0771234567".into()
        }]
    );

    let ops = launch_operations(app.update(
        Event::NavigateRequested {
            id: RequestId::new("1"),
        },
        &mut model,
    ));
    assert_eq!(
        ops,
        vec![LaunchOperation::OpenUrl {
            url: "https://www.google.com/maps/dir/?api=1&destination=6.99,79.89".into()
        }]
    );

    let ops = launch_operations(app.update(
        Event::CallRequested {
            id: RequestId::new("404"),
        },
        &mut model,
    ));
    assert!(ops.is_empty());
}
