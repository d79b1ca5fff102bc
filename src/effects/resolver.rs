//! Card play resolution.
//!
//! `EffectResolver::try_play_card` is two-phase. Validation runs every gate
//! in a fixed order and returns the first failure with nothing mutated.
//! Execution then walks the card's effect fields in a fixed order; later
//! steps observe what earlier steps changed.
//!
//! ```text
//!  1. seeds / flaming          7. hand count rules
//!  2. mental cost, then heal   8. pile count rules
//!  3. followers                9. risk roll
//!  4. impressions             10. exhaust or discard the card
//!  5. draw, motivation,       11. game over / monster draft / resolved
//!     persistent bonuses
//!  6. generated cards
//! ```

use crate::cards::{
    CardCatalog, CardId, CardTemplate, CountAction, CountRule, CountSource, FollowerGain,
    GenerateDestination, ImpressionGain, RiskOutcome, SeedEffect,
};
use crate::core::{GameRng, PlayRejection};
use crate::events::{EventQueue, GameEvent};
use crate::resources::{MentalOutcome, ResourceLedger};
use crate::rules::{MonsterModeController, Phase, TurnPhaseController};
use crate::zones::{DeckEngine, Pile};

/// Borrowed view of everything a play may touch.
///
/// The session builds one per play from its own fields.
pub struct PlayContext<'a> {
    pub catalog: &'a CardCatalog,
    pub ledger: &'a mut ResourceLedger,
    pub deck: &'a mut DeckEngine,
    pub phases: &'a mut TurnPhaseController,
    pub monster: &'a mut MonsterModeController,
    pub rng: &'a mut GameRng,
    pub events: &'a mut EventQueue,
}

/// Session-level flags that block a play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayGate {
    pub drawing: bool,
    pub awaiting_draft: bool,
    pub awaiting_acknowledgment: bool,
}

/// What the session must do once a play has resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayFollowup {
    /// Play continues normally.
    Resolved,
    /// Monster mode latched during the play; the bonus draft must be offered
    /// before anything else.
    MonsterDraft,
    /// Mental reached 0 during the play.
    GameOver,
}

/// Summary of a resolved play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    pub card: CardId,
    pub exhausted: bool,
    /// Cards drawn by the play, in draw order.
    pub drawn: Vec<CardId>,
    pub impressions_gained: i64,
    pub followup: PlayFollowup,
}

/// Mutable bookkeeping for one resolution.
struct Resolution {
    card: CardId,
    drawn: Vec<CardId>,
    depleted: bool,
}

/// Interprets card templates against the session state.
pub struct EffectResolver;

impl EffectResolver {
    /// Run every validation gate without mutating anything.
    ///
    /// Motivation is only checked here; it is spent by `try_play_card`.
    pub fn validate<'a>(
        ctx: &PlayContext<'a>,
        gate: PlayGate,
        card: CardId,
    ) -> Result<&'a CardTemplate, PlayRejection> {
        let phase = ctx.phases.phase();
        if !phase.is_active() {
            return Err(PlayRejection::SessionInactive);
        }
        if gate.drawing {
            return Err(PlayRejection::Drawing);
        }
        if gate.awaiting_draft {
            return Err(PlayRejection::AwaitingDraft);
        }
        if gate.awaiting_acknowledgment {
            return Err(PlayRejection::AwaitingAcknowledgment);
        }
        if phase != Phase::PlayerAction {
            return Err(PlayRejection::WrongPhase(phase));
        }

        let catalog = ctx.catalog;
        let template = match catalog.get(card) {
            Some(template) if ctx.deck.count_card_in_hand(card, false) > 0 => template,
            _ => return Err(PlayRejection::NotInHand(card)),
        };

        if !template.play_condition.allows(ctx.ledger.is_monster_mode()) {
            return Err(PlayRejection::Unplayable { card, condition: template.play_condition });
        }

        if let Some(req) = template.hand_requirement {
            let found = ctx.deck.count_card_in_hand(req.card, req.card == card);
            if found < req.min_count {
                return Err(PlayRejection::HandRequirement {
                    card: req.card,
                    required: req.min_count,
                    found,
                });
            }
        }

        let required = template.motivation_cost.max(0);
        let available = ctx.ledger.motivation();
        if available < required {
            return Err(PlayRejection::InsufficientMotivation { required, available });
        }

        Ok(template)
    }

    /// Validate, spend motivation and resolve `card` completely.
    pub fn try_play_card(
        ctx: &mut PlayContext<'_>,
        gate: PlayGate,
        card: CardId,
    ) -> Result<PlayOutcome, PlayRejection> {
        let template = Self::validate(ctx, gate, card)?;

        if !ctx.ledger.use_motivation(template.motivation_cost, ctx.events) {
            return Err(PlayRejection::InsufficientMotivation {
                required: template.motivation_cost.max(0),
                available: ctx.ledger.motivation(),
            });
        }
        ctx.events.push(GameEvent::CardPlayed { card });

        let impressions_before = ctx.ledger.impressions();
        let mut res = Resolution { card, drawn: Vec::new(), depleted: false };

        Self::apply_seeds(ctx, template);
        Self::apply_mental(ctx, template, &mut res);
        Self::apply_followers(ctx, template);
        Self::apply_impressions(ctx, template);
        Self::apply_draw_and_bonuses(ctx, template, &mut res);
        Self::apply_generated(ctx, template);

        for rule in template.count_rules.iter().filter(|r| r.source.is_hand()) {
            Self::apply_count_rule(ctx, rule, &mut res);
        }
        for rule in template.count_rules.iter().filter(|r| !r.source.is_hand()) {
            Self::apply_count_rule(ctx, rule, &mut res);
        }

        Self::apply_risk(ctx, template, &mut res);

        let exhausted = template.exhaust;
        let moved = if exhausted {
            let removed = ctx.deck.exhaust_card(card);
            if removed {
                ctx.events.push(GameEvent::CardExhausted { card });
            }
            removed
        } else {
            ctx.deck.play_card(card)
        };
        if !moved {
            tracing::warn!(%card, "played card left hand during resolution");
        }
        ctx.events.push(ctx.deck.changed_event());

        let followup = if res.depleted || ctx.ledger.is_depleted() {
            PlayFollowup::GameOver
        } else if ctx.monster.take_activation() && ctx.monster.needs_draft() {
            PlayFollowup::MonsterDraft
        } else {
            ctx.events.push(GameEvent::CardResolved { card });
            PlayFollowup::Resolved
        };

        let impressions_gained = ctx.ledger.impressions() - impressions_before;
        tracing::debug!(
            %card,
            name = %template.name,
            impressions_gained,
            drawn = res.drawn.len(),
            ?followup,
            "card resolved"
        );

        Ok(PlayOutcome { card, exhausted, drawn: res.drawn, impressions_gained, followup })
    }

    // === Steps ===

    fn apply_seeds(ctx: &mut PlayContext<'_>, template: &CardTemplate) {
        match &template.seeds {
            Some(SeedEffect::Accumulate { seeds, flaming_chance }) => {
                ctx.ledger.add_flaming_seeds(*seeds, ctx.events);
                let fired = ctx.ledger.try_trigger_flaming(*flaming_chance, ctx.rng, ctx.events);
                tracing::trace!(seeds, fired, "seeds accumulated");
            }
            Some(SeedEffect::ConvertToImpressions { rate_per_seed, gamble }) => {
                let backfired = match gamble {
                    Some(p) => ctx.ledger.try_trigger_flaming(*p, ctx.rng, ctx.events),
                    None => false,
                };
                if backfired {
                    tracing::trace!("seed conversion backfired");
                    return;
                }
                let seeds = ctx.ledger.take_flaming_seeds(ctx.events);
                if seeds > 0 {
                    ctx.ledger.add_impression(rate_per_seed * f64::from(seeds), ctx.events);
                }
                tracing::trace!(seeds, "seeds converted to impressions");
            }
            Some(SeedEffect::ConvertToMental { heal_per_seed }) => {
                let seeds = ctx.ledger.take_flaming_seeds(ctx.events);
                let amount = heal_per_seed.saturating_mul(seeds.min(i32::MAX as u32) as i32);
                ctx.ledger.heal_mental(amount, ctx.events);
                tracing::trace!(seeds, amount, "seeds converted to mental");
            }
            None => {}
        }
    }

    fn apply_mental(ctx: &mut PlayContext<'_>, template: &CardTemplate, res: &mut Resolution) {
        if template.mental_cost > 0 {
            Self::damage_mental(ctx, template.mental_cost, res);
        }
        if template.mental_heal > 0 {
            ctx.ledger.heal_mental(template.mental_heal, ctx.events);
        }
    }

    fn apply_followers(ctx: &mut PlayContext<'_>, template: &CardTemplate) {
        let delta = match template.followers {
            Some(FollowerGain::Flat(n)) => n,
            Some(FollowerGain::TurnScaled { rate }) => {
                let turn = f64::from(ctx.phases.turn());
                (ctx.ledger.followers() as f64 * turn * rate).floor() as i64
            }
            None => return,
        };
        let applied = ctx.ledger.add_followers(delta, ctx.events);
        tracing::trace!(delta, applied, "followers");
    }

    fn apply_impressions(ctx: &mut PlayContext<'_>, template: &CardTemplate) {
        let rate = match template.impressions {
            Some(ImpressionGain::Rate(rate)) => rate,
            Some(ImpressionGain::TurnScaled { rate }) => rate * f64::from(ctx.phases.turn()) / 10.0,
            None => return,
        };
        let gained = ctx.ledger.add_impression(rate, ctx.events);
        tracing::trace!(rate, gained, "impressions");
    }

    fn apply_draw_and_bonuses(
        ctx: &mut PlayContext<'_>,
        template: &CardTemplate,
        res: &mut Resolution,
    ) {
        Self::draw(ctx, template.draw, res);
        if template.motivation_gain != 0 {
            ctx.ledger.add_motivation(template.motivation_gain, ctx.events);
        }
        if template.extra_draws_per_turn > 0 {
            ctx.phases.add_extra_draws(template.extra_draws_per_turn);
        }
        if template.max_motivation_bonus != 0 {
            ctx.phases.add_max_motivation_bonus(template.max_motivation_bonus);
        }
    }

    fn apply_generated(ctx: &mut PlayContext<'_>, template: &CardTemplate) {
        for generated in &template.generates {
            for _ in 0..generated.count {
                match generated.destination {
                    GenerateDestination::Hand => ctx.deck.add_card_to_hand(generated.card),
                    GenerateDestination::Discard => ctx.deck.add_card_to_discard(generated.card),
                    GenerateDestination::MiddleOfDraw => {
                        ctx.deck.add_card_to_middle_of_draw(generated.card)
                    }
                    GenerateDestination::TopOfDraw => {
                        ctx.deck.add_card_to_top_of_draw(generated.card)
                    }
                }
            }
            tracing::trace!(card = %generated.card, count = generated.count, "generated");
        }
    }

    fn apply_count_rule(ctx: &mut PlayContext<'_>, rule: &CountRule, res: &mut Resolution) {
        let counted = rule.counted;
        let is_self = counted == res.card;
        let count = match rule.source {
            CountSource::Hand => ctx.deck.count_card_in_hand(counted, is_self),
            CountSource::DrawPile => ctx.deck.count_card_in_draw_pile(counted),
            CountSource::DiscardPile => ctx.deck.count_card_in_discard_pile(counted),
            CountSource::DrawDiscardMin => ctx
                .deck
                .count_card_in_draw_pile(counted)
                .min(ctx.deck.count_card_in_discard_pile(counted)),
        };

        if count == 0 || count < rule.min_count {
            tracing::trace!(%counted, count, min = rule.min_count, "count rule skipped");
            return;
        }

        match rule.action {
            CountAction::ExhaustMatching => {
                let removed = match rule.source {
                    CountSource::Hand => {
                        ctx.deck.exhaust_matching(Pile::Hand, counted, usize::from(is_self))
                    }
                    CountSource::DrawPile => ctx.deck.exhaust_matching(Pile::Draw, counted, 0),
                    CountSource::DiscardPile => {
                        ctx.deck.exhaust_matching(Pile::Discard, counted, 0)
                    }
                    CountSource::DrawDiscardMin => {
                        ctx.deck.exhaust_matching(Pile::Draw, counted, 0)
                            + ctx.deck.exhaust_matching(Pile::Discard, counted, 0)
                    }
                };
                for _ in 0..removed {
                    ctx.events.push(GameEvent::CardExhausted { card: counted });
                }
            }
            CountAction::ImpressionsPerCard(rate) => {
                ctx.ledger.add_impression(rate * f64::from(count), ctx.events);
            }
            CountAction::FollowersPerCard(per_card) => {
                ctx.ledger.add_followers(per_card.saturating_mul(i64::from(count)), ctx.events);
            }
            CountAction::DrawPerCard(per_card) => {
                Self::draw(ctx, per_card.saturating_mul(count), res);
            }
        }
        tracing::trace!(%counted, count, action = ?rule.action, "count rule applied");
    }

    fn apply_risk(ctx: &mut PlayContext<'_>, template: &CardTemplate, res: &mut Resolution) {
        let Some(risk) = template.risk else {
            return;
        };
        if !ctx.rng.roll(risk.chance) {
            return;
        }
        tracing::trace!(outcome = ?risk.outcome, "risk fired");
        match risk.outcome {
            RiskOutcome::MentalDamage(amount) => Self::damage_mental(ctx, amount, res),
            RiskOutcome::LoseFollowers(amount) => {
                ctx.ledger.add_followers(amount.saturating_abs().saturating_neg(), ctx.events);
            }
            RiskOutcome::Ignite => ctx.ledger.ignite(ctx.events),
        }
    }

    // === Helpers ===

    /// Damage that latches monster mode heals immediately.
    fn damage_mental(ctx: &mut PlayContext<'_>, amount: i32, res: &mut Resolution) {
        match ctx.ledger.damage_mental(amount, ctx.events) {
            MentalOutcome::MonsterTriggered => {
                ctx.monster.activate(ctx.ledger, ctx.events);
            }
            MentalOutcome::Depleted => res.depleted = true,
            MentalOutcome::Changed | MentalOutcome::Unchanged => {}
        }
    }

    fn draw(ctx: &mut PlayContext<'_>, count: u32, res: &mut Resolution) {
        if count == 0 {
            return;
        }
        let report = ctx.deck.draw_cards(count, ctx.rng);
        if report.reshuffled > 0 {
            ctx.events.push(GameEvent::Reshuffled { moved: report.reshuffled });
        }
        if report.stopped_short(count) {
            tracing::debug!(requested = count, drawn = report.drawn.len(), "draw stopped short");
        }
        res.drawn.extend(report.drawn);
    }
}
