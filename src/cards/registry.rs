//! Card catalog for template lookup.
//!
//! The `CardCatalog` stores every template of a content bundle and provides
//! fast lookup by `CardId`. Unlike a runtime registry it refuses duplicates
//! with an error instead of panicking, since catalogs are built from
//! externally authored content.

use rustc_hash::FxHashMap;

use super::definition::{CardId, CardTemplate, Rarity};
use crate::core::error::ContentError;

/// Catalog of card templates.
///
/// ## Example
///
/// ```
/// use influence_deck::cards::{CardCatalog, CardTemplate, CardId};
///
/// let catalog = CardCatalog::from_templates([
///     CardTemplate::new(CardId::new(1), "Post"),
/// ]).unwrap();
///
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().name, "Post");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardTemplate>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from templates, rejecting duplicate ids.
    pub fn from_templates(
        templates: impl IntoIterator<Item = CardTemplate>,
    ) -> Result<Self, ContentError> {
        let mut catalog = Self::new();
        for template in templates {
            catalog.register(template)?;
        }
        Ok(catalog)
    }

    /// Register a template.
    pub fn register(&mut self, card: CardTemplate) -> Result<(), ContentError> {
        if self.cards.contains_key(&card.id) {
            return Err(ContentError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a template by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardTemplate> {
        self.cards.get(&id)
    }

    /// Look up a template that content validation already vouched for.
    pub fn require(&self, id: CardId) -> Result<&CardTemplate, ContentError> {
        self.get(id).ok_or(ContentError::UnknownCard { card: id, context: "lookup".into() })
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Rarity of a template; unknown ids read as Common.
    #[must_use]
    pub fn rarity(&self, id: CardId) -> Rarity {
        self.get(id).map_or(Rarity::Common, |c| c.rarity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all templates.
    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.cards.values()
    }

    /// Check every cross-reference and probability of every template.
    pub fn validate(&self) -> Result<(), ContentError> {
        for card in self.cards.values() {
            for referenced in card.referenced_cards() {
                if !self.contains(referenced) {
                    return Err(ContentError::UnknownCard {
                        card: referenced,
                        context: format!("referenced by {}", card.id),
                    });
                }
            }
            for p in card.probabilities() {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ContentError::InvalidProbability {
                        value: p,
                        context: format!("{}", card.id),
                    });
                }
            }
        }
        Ok(())
    }
}
