use cardroom_core::Points;
use serde::Deserialize;
use serde::Serialize;

/// The face printed on a card, independent of its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Variant {
    pub fn is_wild(&self) -> bool {
        matches!(self, Variant::Wild | Variant::WildDrawFour)
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Variant::Skip | Variant::Reverse | Variant::DrawTwo)
    }

    /// Face value per §3: numbers score their own value, action cards score
    /// 20, wild cards score 50.
    pub fn points(&self) -> Points {
        match self {
            Variant::Number(v) => *v as Points,
            Variant::Skip | Variant::Reverse | Variant::DrawTwo => 20,
            Variant::Wild | Variant::WildDrawFour => 50,
        }
    }

    /// Pending-draw cards added to the counter when this variant is played.
    pub fn draw_penalty(&self) -> u32 {
        match self {
            Variant::DrawTwo => 2,
            Variant::WildDrawFour => 4,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Number(v) => write!(f, "{v}"),
            Variant::Skip => write!(f, "Skip"),
            Variant::Reverse => write!(f, "Reverse"),
            Variant::DrawTwo => write!(f, "DrawTwo"),
            Variant::Wild => write!(f, "Wild"),
            Variant::WildDrawFour => write!(f, "WildDrawFour"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_match_spec_table() {
        assert_eq!(Variant::Number(7).points(), 7);
        assert_eq!(Variant::Skip.points(), 20);
        assert_eq!(Variant::Reverse.points(), 20);
        assert_eq!(Variant::DrawTwo.points(), 20);
        assert_eq!(Variant::Wild.points(), 50);
        assert_eq!(Variant::WildDrawFour.points(), 50);
    }

    #[test]
    fn draw_penalty_only_on_draw_cards() {
        assert_eq!(Variant::DrawTwo.draw_penalty(), 2);
        assert_eq!(Variant::WildDrawFour.draw_penalty(), 4);
        assert_eq!(Variant::Skip.draw_penalty(), 0);
    }
}
