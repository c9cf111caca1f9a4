use super::Card;
use super::Color;
use super::Variant;
use rand::seq::SliceRandom;
use rand::Rng;

/// Mutable draw pile. The back of the `Vec` is the top of the deck.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a fresh, unshuffled standard 108-card deck (§3): per color one
    /// 0, two each of 1-9, two Skip, two Reverse, two DrawTwo (25 per color),
    /// plus 4 Wild and 4 WildDrawFour.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(108);
        for color in Color::CHROMATIC {
            cards.push(Card::new(Variant::Number(0), color));
            for value in 1..=9 {
                cards.push(Card::new(Variant::Number(value), color));
                cards.push(Card::new(Variant::Number(value), color));
            }
            for _ in 0..2 {
                cards.push(Card::new(Variant::Skip, color));
                cards.push(Card::new(Variant::Reverse, color));
                cards.push(Card::new(Variant::DrawTwo, color));
            }
        }
        for _ in 0..4 {
            cards.push(Card::new(Variant::Wild, Color::Wild));
            cards.push(Card::new(Variant::WildDrawFour, Color::Wild));
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the top card, if any.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Pushes a card onto the top of the deck. Used when refilling from the
    /// discard pile and when undoing a draw.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deck_has_108_cards() {
        assert_eq!(Deck::standard().len(), 108);
    }

    #[test]
    fn standard_deck_color_counts_are_25_each() {
        let deck = Deck::standard();
        for color in Color::CHROMATIC {
            let count = deck.iter().filter(|c| c.color() == color).count();
            assert_eq!(count, 25);
        }
        let wilds = deck.iter().filter(|c| c.color() == Color::Wild).count();
        assert_eq!(wilds, 8);
    }

    #[test]
    fn draw_removes_from_top() {
        let mut deck = Deck::standard();
        let before = deck.len();
        let drawn = deck.draw();
        assert!(drawn.is_some());
        assert_eq!(deck.len(), before - 1);
    }

    #[test]
    fn draw_on_empty_deck_returns_none() {
        let mut deck = Deck::from(Vec::new());
        assert!(deck.draw().is_none());
    }
}
