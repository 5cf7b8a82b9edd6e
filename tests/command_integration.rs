//! Operator command handling through the coordinator

use std::sync::{Arc, Mutex};

use tactical_sim::core::types::Side;
use tactical_sim::llm::ScriptedService;
use tactical_sim::simulation::{Coordinator, ScenarioState};

fn coordinator(service: ScriptedService) -> Coordinator {
    Coordinator::with_seed(
        ScenarioState::new("Command Test", "Checkpoint Alpha", "Standoff"),
        2,
        Arc::new(service),
        21,
    )
}

#[test]
fn test_redirect_reaches_next_red_prompts_only() {
    let prompts = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&prompts);
    let mut c = coordinator(ScriptedService::from_fn(move |prompt| {
        sink.lock().unwrap().push(prompt.to_string());
        Ok("Hold position".to_string())
    }));

    c.handle_command("redirect red force: move to point A");
    c.advance();

    let prompts = prompts.lock().unwrap();
    let order = "Received direct order: redirect red force: move to point A";
    for prompt in prompts.iter() {
        if prompt.starts_with("Agent ID: Red_Squad_") {
            assert!(prompt.contains(order));
        } else {
            assert!(!prompt.contains(order), "order leaked into: {}", prompt);
        }
    }
}

#[test]
fn test_redirect_to_nowhere_logs_once_without_propagation() {
    let mut c = coordinator(ScriptedService::constant("Hold"));

    c.handle_command("redirect to nowhere");

    let unrecognized: Vec<_> = c
        .log()
        .iter()
        .filter(|l| l.starts_with("Unrecognized redirection"))
        .collect();
    assert_eq!(unrecognized.len(), 1);
    for side in Side::ALL {
        assert!(c.force(side).log().is_empty());
        assert!(c.force(side).units().iter().all(|u| u.context().is_empty()));
    }
}

#[test]
fn test_control_commands_are_advisory() {
    let mut c = coordinator(ScriptedService::constant("Hold"));
    c.advance();

    c.handle_command("pause");
    c.handle_command("rewind");
    c.handle_command("fast forward");

    assert_eq!(c.tick(), 1);
    let tail: Vec<&str> = c.log().iter().rev().take(3).map(String::as_str).collect();
    assert_eq!(
        tail,
        [
            "Simulation fast-forwarded by user command.",
            "Simulation rewound by user command.",
            "Simulation paused by user command.",
        ]
    );

    let next = c.advance();
    assert_eq!(next[0], "--- Tick 2 ---");
}

#[test]
fn test_orders_accumulate_in_context_between_ticks() {
    let mut c = coordinator(ScriptedService::constant("Hold"));
    c.handle_command("redirect blue force: dig in");
    c.advance();
    c.handle_command("redirect blue force: hold fire");

    let unit = &c.force(Side::Blue).units()[0];
    assert_eq!(unit.context().len(), 3);
    assert_eq!(unit.context()[0], "Received direct order: redirect blue force: dig in");
    assert_eq!(unit.context()[1], "Hold [No movement executed].");
    assert_eq!(unit.context()[2], "Received direct order: redirect blue force: hold fire");
}
