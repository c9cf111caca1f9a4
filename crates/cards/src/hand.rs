use super::Card;
use super::Color;
use cardroom_core::Unique;
use cardroom_core::ID;

/// A player's cards. Ordered by arrival so clients render a stable hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn contains(&self, id: ID<Card>) -> bool {
        self.cards.iter().any(|c| c.id() == id)
    }

    pub fn get(&self, id: ID<Card>) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// Removes and returns the card with the given id, if present.
    pub fn remove(&mut self, id: ID<Card>) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id() == id)?;
        Some(self.cards.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn drain(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub fn has_color(&self, color: Color) -> bool {
        self.cards.iter().any(|c| c.color() == color)
    }

    /// The subset of cards in this hand that are legal to play on `top`,
    /// used for both UI hints and the bot's candidate set.
    pub fn playable(&self, top: &Card) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.can_follow(top)).collect()
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

impl IntoIterator for Hand {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;
    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
