//! End-to-end tests driving the session API with the built-in content.

use std::sync::Arc;

use async_trait::async_trait;
use runtime::{PromptHandler, RuntimeError, Session, Topic};
use rules_core::{
    ActionDeclaration, ActionError, ActorId, ActorState, CheckProfile, Combatant, PromptRequest,
    ResourceKind, ResourcePool, ResourceSet,
};

struct Answer(i32);

#[async_trait]
impl PromptHandler for Answer {
    async fn handle(&self, _request: PromptRequest) -> Option<i32> {
        Some(self.0)
    }
}

fn fighter(id: u32) -> ActorState {
    ActorState::new(ActorId(id))
        .with_name(format!("fighter-{id}"))
        .with_resources(
            ResourceSet::new()
                .with_pool(ResourceKind::Action, ResourcePool::full(3))
                .with_pool(ResourceKind::Focus, ResourcePool::full(4))
                .with_pool(ResourceKind::Health, ResourcePool::full(24))
                .with_pool(ResourceKind::Morale, ResourcePool::full(10)),
        )
}

fn strike(actor: u32, target: u32) -> ActionDeclaration {
    ActionDeclaration::new(ActorId(actor), "strike")
        .with_target(ActorId(target))
        .with_check(CheckProfile {
            ability: 3,
            skill: 2,
            enchantment: 0,
        })
}

async fn session_with_fighters(handler: Arc<dyn PromptHandler>) -> Session {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let session = Session::builder()
        .seed(0x5EED)
        .prompts(handler)
        .build()
        .expect("session must build");
    for id in [1, 2] {
        session.add_actor(fighter(id)).unwrap();
    }
    session
}

#[tokio::test(flavor = "multi_thread")]
async fn strike_resolves_and_publishes_an_event() {
    let session = session_with_fighters(Arc::new(runtime::DismissPrompts)).await;
    let mut events = session.subscribe(Topic::Action);

    let resolved = session.resolve(strike(1, 2)).await.unwrap();

    // Cost: 2 action points.
    assert_eq!(session.resource(ActorId(1), ResourceKind::Action), Some(1));

    // Damage equals the applied health delta.
    let outcome = resolved.outcome_for(ActorId(2)).unwrap();
    let applied = outcome.applied(ResourceKind::Health);
    assert!(applied < 0);
    assert_eq!(
        session.resource(ActorId(2), ResourceKind::Health),
        Some(24 + applied)
    );

    // The chat layer can render from the event alone.
    let event = events.recv().await.unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "action_resolved");
    assert_eq!(json["resolved"]["action"], "strike");
}

#[tokio::test(flavor = "multi_thread")]
async fn aimed_shot_needs_a_reload_first() {
    let session = session_with_fighters(Arc::new(runtime::DismissPrompts)).await;

    let shot = ActionDeclaration::new(ActorId(1), "aimed_shot")
        .with_target(ActorId(2))
        .with_check(CheckProfile {
            ability: 2,
            skill: 3,
            enchantment: 0,
        });

    // Unloaded: rejected, nothing charged.
    let error = session.resolve(shot.clone()).await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Action(ActionError::ValidationRejected { .. })
    ));
    assert_eq!(session.resource(ActorId(1), ResourceKind::Action), Some(3));

    // Reload, then fire. Aimed Shot starts with one boon: d10 first die.
    session
        .resolve(ActionDeclaration::new(ActorId(1), "reload"))
        .await
        .unwrap();
    let resolved = session.resolve(shot).await.unwrap();
    let roll = resolved.outcomes[0].roll.as_ref().unwrap();
    assert_eq!(roll.formula, "1d10 + 1d8 + 1d8 + @ability + @skill");
}

#[tokio::test(flavor = "multi_thread")]
async fn delay_prompts_for_a_value_and_limits_itself_per_round() {
    let session = session_with_fighters(Arc::new(Answer(17))).await;

    let resolved = session
        .resolve(ActionDeclaration::new(ActorId(1), "delay"))
        .await
        .unwrap();
    // The chosen value is visible to the turn tracker.
    assert_eq!(
        resolved.bonuses.get(rules_content::actions::DELAY_INITIATIVE),
        Some(&17)
    );

    // A second delay in the same round is vetoed.
    let error = session
        .resolve(ActionDeclaration::new(ActorId(1), "delay"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Action(ActionError::ValidationRejected { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn dismissed_delay_prompt_aborts_the_action() {
    let session = session_with_fighters(Arc::new(runtime::DismissPrompts)).await;

    let error = session
        .resolve(ActionDeclaration::new(ActorId(1), "delay"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Action(ActionError::AbortedByUser)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn blood_magic_pays_in_health_and_wards_the_target() {
    let session = Session::builder()
        .seed(0xB10D)
        .build()
        .expect("session must build");
    session
        .add_actor(fighter(1).with_talent(rules_content::talents::BLOOD_MAGIC))
        .unwrap();
    session.add_actor(fighter(2)).unwrap();

    let bolt = ActionDeclaration::new(ActorId(1), "bloodbolt")
        .with_target(ActorId(2))
        .with_check(CheckProfile {
            ability: 4,
            skill: 0,
            enchantment: 2,
        });
    let resolved = session.resolve(bolt).await.unwrap();

    // The 2 focus cost became 2 health; focus untouched.
    assert_eq!(session.resource(ActorId(1), ResourceKind::Focus), Some(4));
    assert_eq!(session.resource(ActorId(1), ResourceKind::Health), Some(22));

    // The target cannot end below the health the caster paid.
    assert!(session.resource(ActorId(2), ResourceKind::Health).unwrap() >= 2);

    // The spell also staggers its victim.
    let outcome = resolved.outcome_for(ActorId(2)).unwrap();
    assert!(outcome
        .statuses
        .add
        .contains(&rules_core::HookId::from_static("staggered")));

    // The enchantment term made it into the formula.
    let roll = outcome.roll.as_ref().unwrap();
    assert!(roll.formula.ends_with("@ability + @skill + @enchantment"));
}

#[tokio::test(flavor = "multi_thread")]
async fn shieldwall_banes_incoming_checks() {
    let session = Session::builder().seed(7).build().unwrap();
    session.add_actor(fighter(1)).unwrap();
    session
        .add_actor(fighter(2).with_condition("shieldwall"))
        .unwrap();

    let resolved = session.resolve(strike(1, 2)).await.unwrap();
    let roll = resolved.outcomes[0].roll.as_ref().unwrap();
    assert_eq!(roll.formula, "1d8 + 1d8 + 1d6 + @ability + @skill");
}

#[tokio::test(flavor = "multi_thread")]
async fn combat_round_drives_turns_flags_and_heroism() {
    let session = Session::builder().seed(42).build().unwrap();
    session
        .add_actor(fighter(1).with_talent("meditative_focus"))
        .unwrap();
    session.add_actor(fighter(2)).unwrap();
    session.add_combatant(Combatant::new(ActorId(1)).hero());
    session.add_combatant(Combatant::new(ActorId(2)));

    let order = session.roll_initiative().unwrap();
    assert_eq!(order.len(), 2);
    // Sorted descending.
    assert!(order[0].1 >= order[1].1);

    session.start_round();
    let mut turn_events = session.subscribe(Topic::Turn);
    let first = session.start_turn().unwrap();
    assert_eq!(first, order[0].0);
    let event = turn_events.recv().await.unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "turn_started");

    // Hero actions accrue heroism; required = 2 participants x 2.
    session.resolve(strike(1, 2)).await.unwrap();
    assert_eq!(session.heroism().actions, 1);
    assert_eq!(session.heroism().required, 4);

    // Walk the round out; the second end_turn closes the round.
    assert!(session.end_turn().unwrap().is_some());
    assert!(session.end_turn().unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn start_turn_runs_talent_accrual_hooks() {
    let session = Session::builder().seed(9).build().unwrap();
    session
        .add_actor(fighter(1).with_talent("meditative_focus"))
        .unwrap();
    session.add_actor(fighter(2)).unwrap();
    session.add_combatant(Combatant::new(ActorId(1)));

    // Spend 2 focus on a bolt, then start the turn: the talent restores 1.
    let bolt = ActionDeclaration::new(ActorId(1), "bloodbolt")
        .with_target(ActorId(2))
        .with_check(CheckProfile {
            ability: 1,
            skill: 1,
            enchantment: 0,
        });
    session.resolve(bolt).await.unwrap();
    assert_eq!(session.resource(ActorId(1), ResourceKind::Focus), Some(2));

    session.start_round();
    session.start_turn().unwrap();
    assert_eq!(session.resource(ActorId(1), ResourceKind::Focus), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn sheet_notes_surface_talent_hints() {
    let session = Session::builder().seed(1).build().unwrap();
    session
        .add_actor(fighter(1).with_talent(rules_content::talents::BLOOD_MAGIC))
        .unwrap();

    let notes = session.sheet_notes(ActorId(1));
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("health"));
}
