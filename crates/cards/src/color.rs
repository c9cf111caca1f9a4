use serde::Deserialize;
use serde::Serialize;

/// One of the four suit colors, or the colorless `Wild` intrinsic color.
///
/// Only the four chromatic variants are legal as a *declared* color; `Wild`
/// only ever appears as a card's own intrinsic color before it is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// The four colors a declared color may take, in the fixed tie-break
    /// order used by the bot driver's most-frequent-color heuristic.
    pub const CHROMATIC: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn is_chromatic(&self) -> bool {
        !matches!(self, Color::Wild)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Color::Red => "R",
            Color::Yellow => "Y",
            Color::Green => "G",
            Color::Blue => "B",
            Color::Wild => "W",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromatic_excludes_wild() {
        assert!(Color::CHROMATIC.iter().all(Color::is_chromatic));
        assert!(!Color::Wild.is_chromatic());
    }
}
