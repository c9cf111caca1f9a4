use super::Color;
use super::Variant;
use cardroom_core::Points;
use cardroom_core::Unique;
use cardroom_core::ID;
use serde::Deserialize;
use serde::Serialize;

/// Error returned when a declared color is assigned to a card that cannot
/// carry one, or the color itself is not one of the four chromatic colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardError {
    NotWild,
    NonChromaticDeclaration,
}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::NotWild => write!(f, "only wild cards may carry a declared color"),
            CardError::NonChromaticDeclaration => {
                write!(f, "declared color must be one of red, yellow, green, blue")
            }
        }
    }
}

impl std::error::Error for CardError {}

/// A single card. Immutable after creation except for the declared color a
/// wild card is given when played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    id: ID<Card>,
    variant: Variant,
    color: Color,
    declared: Option<Color>,
}

impl Card {
    pub fn new(variant: Variant, color: Color) -> Self {
        Self {
            id: ID::default(),
            variant,
            color,
            declared: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The card's own printed color. `Color::Wild` for wild variants.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn declared(&self) -> Option<Color> {
        self.declared
    }

    /// Assigns the color a played wild card is to be treated as. Rejected
    /// for non-wild cards and non-chromatic colors.
    pub fn set_declared(&mut self, color: Color) -> Result<(), CardError> {
        if !self.variant.is_wild() {
            return Err(CardError::NotWild);
        }
        if !color.is_chromatic() {
            return Err(CardError::NonChromaticDeclaration);
        }
        self.declared = Some(color);
        Ok(())
    }

    /// Clears a previously declared color, e.g. when a wild is reshuffled
    /// back into the deck during a discard refill.
    pub fn clear_declared(&mut self) {
        self.declared = None;
    }

    /// The declared color if set, else the card's own color. This is only
    /// meaningful for the discard pile's top card; a card still in a hand
    /// has no effective color distinct from its own.
    pub fn effective_color(&self) -> Color {
        self.declared.unwrap_or(self.color)
    }

    pub fn points(&self) -> Points {
        self.variant.points()
    }

    pub fn is_wild(&self) -> bool {
        self.variant.is_wild()
    }

    /// Legality predicate (§4.1 canPlayOn): can `self` be played on top of
    /// `top`? Wild cards are always legal; otherwise the candidate must
    /// share `top`'s effective color, or match `top`'s number/action face.
    pub fn can_follow(&self, top: &Card) -> bool {
        if self.is_wild() {
            return true;
        }
        if self.color == top.effective_color() {
            return true;
        }
        match (self.variant, top.variant) {
            (Variant::Number(a), Variant::Number(b)) => a == b,
            (Variant::Skip, Variant::Skip) => true,
            (Variant::Reverse, Variant::Reverse) => true,
            (Variant::DrawTwo, Variant::DrawTwo) => true,
            _ => false,
        }
    }
}

impl Unique for Card {
    fn id(&self) -> ID<Card> {
        self.id
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.declared {
            Some(d) => write!(f, "{}/{}[{}]", self.color, self.variant, d),
            None => write!(f, "{}/{}", self.color, self.variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_wild_rejects_declared_color() {
        let mut card = Card::new(Variant::Number(5), Color::Red);
        assert_eq!(card.set_declared(Color::Blue), Err(CardError::NotWild));
    }

    #[test]
    fn wild_rejects_non_chromatic_declaration() {
        let mut card = Card::new(Variant::Wild, Color::Wild);
        assert_eq!(
            card.set_declared(Color::Wild),
            Err(CardError::NonChromaticDeclaration)
        );
    }

    #[test]
    fn wild_accepts_chromatic_declaration() {
        let mut card = Card::new(Variant::WildDrawFour, Color::Wild);
        assert!(card.set_declared(Color::Green).is_ok());
        assert_eq!(card.effective_color(), Color::Green);
    }

    #[test]
    fn wild_always_follows() {
        let wild = Card::new(Variant::Wild, Color::Wild);
        let top = Card::new(Variant::Number(3), Color::Red);
        assert!(wild.can_follow(&top));
    }

    #[test]
    fn matching_color_follows() {
        let candidate = Card::new(Variant::Number(9), Color::Blue);
        let top = Card::new(Variant::Skip, Color::Blue);
        assert!(candidate.can_follow(&top));
    }

    #[test]
    fn matching_number_follows_regardless_of_color() {
        let candidate = Card::new(Variant::Number(5), Color::Yellow);
        let top = Card::new(Variant::Number(5), Color::Green);
        assert!(candidate.can_follow(&top));
    }

    #[test]
    fn matching_action_variant_follows_regardless_of_color() {
        let candidate = Card::new(Variant::DrawTwo, Color::Yellow);
        let top = Card::new(Variant::DrawTwo, Color::Green);
        assert!(candidate.can_follow(&top));
    }

    #[test]
    fn mismatched_color_and_face_is_illegal() {
        let candidate = Card::new(Variant::Number(3), Color::Yellow);
        let top = Card::new(Variant::Number(5), Color::Green);
        assert!(!candidate.can_follow(&top));
    }

    #[test]
    fn declared_color_on_top_shadows_its_intrinsic_wild_color() {
        let mut top = Card::new(Variant::Wild, Color::Wild);
        top.set_declared(Color::Green).unwrap();
        let candidate = Card::new(Variant::Number(4), Color::Green);
        assert!(candidate.can_follow(&top));
        let off_color = Card::new(Variant::Number(4), Color::Red);
        assert!(!off_color.can_follow(&top));
    }
}
