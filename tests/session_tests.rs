//! Whole-session flow tests.
//!
//! These drive a `GameSession` through complete turns:
//! - Start step, quota, end step
//! - Regular and monster drafts
//! - Acknowledgments at the turn boundary
//! - Result, game over and progress

use influence_deck::cards::{CardId, CardTemplate, ImpressionGain, PlayCondition, Rarity};
use influence_deck::core::{
    ContentBundle, ContentError, GameSettings, MemoryStore, StageDefinition, ValidatedContent,
};
use influence_deck::draft::DraftKind;
use influence_deck::events::GameEvent;
use influence_deck::rules::{AcknowledgmentKind, Phase};
use influence_deck::session::{DraftOffer, GameSession, PendingInteraction};

const POST: CardId = CardId::new(1);
const IDLE: CardId = CardId::new(2);
const GIFT: CardId = CardId::new(3);
const BEAST: CardId = CardId::new(4);
const COACH: CardId = CardId::new(5);
const SWAG: CardId = CardId::new(6);

fn cards() -> Vec<CardTemplate> {
    vec![
        CardTemplate::new(POST, "Post").with_impressions(ImpressionGain::Rate(1.0)),
        CardTemplate::new(IDLE, "Scroll feed"),
        CardTemplate::new(GIFT, "Giveaway").with_rarity(Rarity::Common),
        CardTemplate::new(BEAST, "Unhinged stream")
            .with_play_condition(PlayCondition::MonsterModeOnly)
            .with_impressions(ImpressionGain::Rate(2.0)),
        CardTemplate::new(COACH, "Hire a coach")
            .with_motivation_cost(1)
            .with_extra_draws_per_turn(1)
            .with_max_motivation_bonus(2),
        CardTemplate::new(SWAG, "Merch drop").with_rarity(Rarity::Common),
    ]
}

fn content(settings: GameSettings, stage: StageDefinition) -> ValidatedContent {
    ContentBundle { settings, cards: cards(), stages: vec![stage] }
        .validate()
        .expect("valid content")
}

fn start(settings: GameSettings, stage: StageDefinition) -> GameSession {
    let id = stage.id.clone();
    let mut session = GameSession::new(content(settings, stage), 2024);
    session.start_stage(&id).expect("stage exists");
    session
}

fn play_all(session: &mut GameSession, card: CardId) -> usize {
    let mut played = 0;
    while session.deck().count_card_in_hand(card, false) > 0 {
        session.try_play_card(card).expect("playable");
        played += 1;
    }
    played
}

fn pending_ack(session: &GameSession) -> Option<AcknowledgmentKind> {
    match session.pending() {
        Some(PendingInteraction::Acknowledgment(ack)) => Some(ack.kind),
        _ => None,
    }
}

fn pending_draft(session: &GameSession) -> Option<&DraftOffer> {
    match session.pending() {
        Some(PendingInteraction::Draft(offer)) => Some(offer),
        _ => None,
    }
}

/// Start-of-stage events arrive in the order state changed.
#[test]
fn test_start_step_event_order() {
    let mut session = start(GameSettings::default(), StageDefinition::new("s", vec![POST; 8]));
    let events = session.drain_events();

    let position = |wanted: &GameEvent| events.iter().position(|e| e == wanted).unwrap();
    let started = position(&GameEvent::TurnStarted { turn: 1 });
    let changed = position(&GameEvent::TurnChanged { turn: 1 });
    let quota = position(&GameEvent::QuotaSet { turn: 1, quota: 100 });
    let action = position(&GameEvent::PhaseChanged { phase: Phase::PlayerAction });

    assert!(started < changed);
    assert!(changed < quota);
    assert!(quota < action);
    assert_eq!(action, events.len() - 1);
}

/// A met quota offers a draft; the pick is on top of the next draw.
#[test]
fn test_regular_draft_feeds_next_turn() {
    let stage = StageDefinition::new("s", vec![POST; 10])
        .with_quota_table(vec![50])
        .with_draft_pool(vec![GIFT])
        .with_turn_limit(2);
    let mut session = start(GameSettings::default().with_draft_slots(1), stage);

    assert_eq!(play_all(&mut session, POST), 5);
    assert_eq!(session.ledger().impressions(), 50);
    assert!(session.end_player_action());

    let offer = pending_draft(&session).expect("draft offered");
    assert_eq!(offer.kind, DraftKind::Regular);
    assert_eq!(offer.options.as_slice(), &[GIFT]);
    assert_eq!(session.deck().top_of_draw(), Some(POST));

    assert!(!session.select_draft_option(3));
    assert!(session.select_draft_option(0));
    assert!(session.drafts().is_excluded(GIFT));

    assert_eq!(session.turn(), 2);
    assert_eq!(session.phase(), Phase::PlayerAction);
    assert!(session.deck().hand().contains(&GIFT));
    assert!(session.deck().is_consistent());
}

/// Missing the last turn's quota still ends in a cleared stage.
#[test]
fn test_stage_result_and_progress() {
    let stage = StageDefinition::new("s", vec![POST; 10]).with_quota_table(vec![50]).with_turn_limit(2);
    let content = content(GameSettings::default(), stage);
    let mut session = GameSession::new(content, 7).with_store(MemoryStore::new()).unwrap();
    session.start_stage("s").unwrap();

    play_all(&mut session, POST);
    assert!(session.end_player_action());
    assert_eq!(session.turn(), 2);

    assert!(session.end_player_action());
    assert_eq!(pending_ack(&session), Some(AcknowledgmentKind::QuotaFailed));
    assert_eq!(session.phase(), Phase::EndStep);
    assert!(session.acknowledge());

    assert_eq!(session.phase(), Phase::Result);
    assert_eq!(session.ledger().mental(), 5);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::StageResult {
        stage: "s".to_string(),
        impressions: 50,
        cleared: true,
    }));

    let saved = session.store().unwrap().load().unwrap();
    assert!(saved.is_cleared("s"));
    assert_eq!(saved.high_score("s"), 50);
    assert_eq!(saved.global_high_score, 50);

    // Nothing moves after a terminal phase
    assert!(!session.end_player_action());
    assert!(session.try_play_card(POST).is_err());
}

/// Quota penalty that empties mental ends the session without prompts.
#[test]
fn test_penalty_game_over() {
    let stage = StageDefinition::new("s", vec![IDLE; 10]);
    let mut session = start(GameSettings::default().with_initial_mental(5), stage);

    assert!(session.end_player_action());
    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.pending().is_none());
    assert_eq!(session.ledger().mental(), 0);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::GameOver { turn: 1, impressions: 0 }));
    assert!(!events.iter().any(GameEvent::awaits_input));
    assert!(!session.progress().is_cleared("s"));
}

/// Monster mode latched by the turn-end penalty: quota notice, cut-in,
/// monster draft, then the next turn. The doubled penalty then finishes it.
#[test]
fn test_monster_mode_at_turn_boundary() {
    let stage = StageDefinition::new("s", vec![IDLE; 10]).with_monster_pool(vec![BEAST]);
    let mut session = start(GameSettings::default().with_initial_mental(6), stage);

    assert!(session.end_player_action());
    // 6 - 5 = 1, healed by ceil(1 / 2)
    assert!(session.ledger().is_monster_mode());
    assert_eq!(session.ledger().mental(), 2);

    assert_eq!(pending_ack(&session), Some(AcknowledgmentKind::QuotaFailed));
    assert!(!session.select_draft_option(0));
    assert!(session.acknowledge());

    assert_eq!(pending_ack(&session), Some(AcknowledgmentKind::MonsterCutIn));
    assert!(session.acknowledge());

    let offer = pending_draft(&session).expect("monster draft");
    assert_eq!(offer.kind, DraftKind::Monster);
    assert!(!offer.is_skippable());
    assert!(!session.skip_draft());
    assert!(session.select_draft_option(0));

    assert_eq!(session.turn(), 2);
    assert_eq!(session.phase(), Phase::PlayerAction);
    assert!(session.deck().count_card_in_hand(BEAST, false) >= 1);
    assert_eq!(session.deck().total_added(), 13);
    assert!(session.deck().is_consistent());

    // Monster impressions are doubled: 10 followers × 2.0 × 2
    let outcome = session.try_play_card(BEAST).unwrap();
    assert_eq!(outcome.impressions_gained, 40);

    session.drain_events();
    assert!(session.end_player_action());
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::QuotaEvaluated { penalty: 10, met: false, .. }
    )));
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::MonsterModeTriggered { .. })).count(),
        0
    );
}

/// An empty monster pool settles the draft silently.
#[test]
fn test_monster_mode_without_pool() {
    let stage = StageDefinition::new("s", vec![IDLE; 10]);
    let mut session = start(GameSettings::default().with_initial_mental(6), stage);

    assert!(session.end_player_action());
    assert!(session.acknowledge());
    assert_eq!(pending_ack(&session), Some(AcknowledgmentKind::MonsterCutIn));
    assert!(session.acknowledge());

    assert!(session.pending().is_none());
    assert_eq!(session.turn(), 2);
    assert!(!session.monster().needs_draft());
}

/// Skipping a regular draft leaves the deck alone.
#[test]
fn test_skip_regular_draft() {
    let stage = StageDefinition::new("s", vec![IDLE; 10])
        .with_quota_table(vec![0])
        .with_draft_pool(vec![GIFT, SWAG]);
    let mut session = start(GameSettings::default(), stage);

    assert!(session.end_player_action());
    assert_eq!(pending_draft(&session).map(|o| o.options.len()), Some(2));
    assert!(session.view().pending.is_some());

    session.drain_events();
    assert!(session.skip_draft());
    let events = session.drain_events();
    assert_eq!(events[0], GameEvent::DraftResolved { kind: DraftKind::Regular, card: None });
    assert_eq!(session.deck().total_added(), 10);
    assert_eq!(session.drafts().history_len(), 0);
    assert_eq!(session.turn(), 2);
}

/// Picked templates are not offered again until the pool runs dry.
#[test]
fn test_draft_exclusion_across_turns() {
    let stage = StageDefinition::new("s", vec![IDLE; 10])
        .with_quota_table(vec![0])
        .with_draft_pool(vec![GIFT, SWAG])
        .with_turn_limit(4);
    let mut session = start(GameSettings::default().with_draft_slots(1), stage);

    assert!(session.end_player_action());
    let first = pending_draft(&session).unwrap().options[0];
    assert!(session.select_draft_option(0));

    assert!(session.end_player_action());
    let second = pending_draft(&session).unwrap().options[0];
    assert_ne!(first, second);
    assert!(session.select_draft_option(0));

    // Both picked: history clears and the full pool is back
    assert!(session.end_player_action());
    assert_eq!(pending_draft(&session).unwrap().options.len(), 1);
    assert!(session.select_draft_option(0));
    assert_eq!(session.drafts().history_len(), 1);

    // The last turn ends the stage without a draft
    assert!(session.end_player_action());
    assert!(pending_draft(&session).is_none());
    assert_eq!(session.phase(), Phase::Result);
}

/// Persistent modifiers apply from the next start step on.
#[test]
fn test_persistent_modifiers() {
    let stage = StageDefinition::new("s", vec![COACH; 20]).with_quota_table(vec![0]);
    let mut session = start(GameSettings::default(), stage);

    session.try_play_card(COACH).unwrap();
    assert_eq!(session.ledger().motivation(), 2);
    assert_eq!(session.deck().hand().len(), 4);

    assert!(session.end_player_action());
    assert_eq!(session.turn(), 2);
    assert_eq!(session.ledger().motivation(), 5);
    assert_eq!(session.deck().hand().len(), 6);

    let view = session.view();
    assert_eq!(view.modifiers.extra_draws_per_turn, 1);
    assert_eq!(view.modifiers.max_motivation_bonus, 2);
    assert_eq!(view.resources.max_motivation, 5);

    // Restarting clears them
    session.start_stage("s").unwrap();
    assert_eq!(session.deck().hand().len(), 5);
    assert_eq!(session.ledger().motivation(), 3);
}

/// Two sessions over the same content and seed play out identically.
#[test]
fn test_sessions_are_independent_and_deterministic() {
    let stage = StageDefinition::new("s", vec![POST, IDLE, GIFT, SWAG, COACH, POST, IDLE, POST]);
    let content = content(GameSettings::default(), stage);

    let mut a = GameSession::new(content.clone(), 99);
    let mut b = GameSession::new(content, 99);
    a.start_stage("s").unwrap();
    b.start_stage("s").unwrap();

    assert_eq!(a.deck().hand(), b.deck().hand());
    assert_eq!(a.drain_events(), b.drain_events());
    assert_eq!(a.rng_state(), b.rng_state());

    a.reset();
    assert_eq!(a.phase(), Phase::Idle);
    assert_eq!(b.phase(), Phase::PlayerAction);
}

/// Content authored as JSON plays like content built in code.
#[test]
fn test_json_content() {
    let json = r#"{
        "settings": { "initial_followers": 20, "hand_size": 3, "turn_limit": 2 },
        "cards": [
            { "id": 1, "name": "Post", "impressions": { "Rate": 0.5 } },
            { "id": 2, "name": "Thread", "rarity": "Rare", "motivation_cost": 2, "draw": 1 }
        ],
        "stages": [
            {
                "id": "tutorial",
                "initial_deck": [1, 1, 1, 1],
                "draft_pool": [2],
                "quota_table": [10, 20],
                "probability_table": [
                    { "min_impressions": 0, "common_weight": 100, "rare_weight": 0, "epic_weight": 0 }
                ]
            }
        ]
    }"#;

    let content = ContentBundle::load(json).unwrap();
    let mut session = GameSession::new(content, 5);
    session.start_stage("tutorial").unwrap();

    let view = session.view();
    assert_eq!(view.resources.followers, 20);
    assert_eq!(view.hand.len(), 3);
    assert_eq!(view.quota, 10);
    assert_eq!(view.turn_limit, 2);

    session.try_play_card(POST).unwrap();
    assert_eq!(session.view().gained_this_turn, 10);

    // Quota met; only a Rare is in the pool, so the Common roll falls back
    assert!(session.end_player_action());
    let thread = CardId::new(2);
    let offer = pending_draft(&session).unwrap();
    assert_eq!(offer.options.as_slice(), &[thread]);
}

#[test]
fn test_dangling_reference_is_fatal() {
    let stage = StageDefinition::new("s", vec![POST]).with_draft_pool(vec![CardId::new(77)]);
    let err = ContentBundle { settings: GameSettings::default(), cards: cards(), stages: vec![stage] }
        .validate()
        .unwrap_err();
    assert!(matches!(err, ContentError::UnknownCard { card, .. } if card == CardId::new(77)));
}
