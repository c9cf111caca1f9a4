use cardroom_cards::Card;
use cardroom_cards::Color;
use cardroom_cards::Hand;
use cardroom_cards::Variant;
use cardroom_core::BOT_CALL_ONE_PROBABILITY;
use cardroom_core::ID;
use rand::Rng;

/// What the bot priority function (§4.6) decided to do. Never mutates
/// [`crate::session::GameSession`] directly: the scheduler turns this into
/// an ordinary [`crate::command::Command`] and enqueues it like any other
/// player's move (§9 "Bot pacing").
#[derive(Debug, Clone, PartialEq)]
pub struct BotChoice {
    /// `None` means no legal card was found and the bot must draw.
    pub card: Option<ID<Card>>,
    pub declared_color: Option<Color>,
    pub call_one: bool,
}

/// Most-frequent non-wild color in `hand`, ties broken R < Y < G < B.
fn dominant_color(hand: &Hand) -> Color {
    let mut counts = [0usize; 4];
    for card in hand.iter() {
        if let Some(i) = Color::CHROMATIC.iter().position(|&c| c == card.color()) {
            counts[i] += 1;
        }
    }
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    Color::CHROMATIC[best]
}

fn play(card: ID<Card>, declared_color: Option<Color>) -> BotChoice {
    BotChoice {
        card: Some(card),
        declared_color,
        call_one: false,
    }
}

fn draw() -> BotChoice {
    BotChoice {
        card: None,
        declared_color: None,
        call_one: false,
    }
}

/// Pure, deterministic priority function given `(hand, top, rng)` (§4.6,
/// §8 "the bot priority function is pure and deterministic given a seed").
/// `rng` is the only source of nondeterminism and is threaded in by the
/// caller so tests can seed it.
pub fn decide(hand: &Hand, top: &Card, rng: &mut impl Rng) -> BotChoice {
    let effective = top.effective_color();

    // 1. WildDrawFour, if the hand holds no card of the current color.
    if !hand.has_color(effective) {
        if let Some(card) = hand.iter().find(|c| c.variant() == Variant::WildDrawFour) {
            let mut choice = play(card.id(), Some(dominant_color(hand)));
            choice.call_one = maybe_call_one(hand.len(), rng);
            return choice;
        }
    }

    // 2. DrawTwo matching the current color.
    if let Some(card) = hand
        .iter()
        .find(|c| c.variant() == Variant::DrawTwo && c.color() == effective)
    {
        let mut choice = play(card.id(), None);
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }

    // 3. Skip (preferred) or Reverse matching the current color.
    if let Some(card) = hand
        .iter()
        .find(|c| c.variant() == Variant::Skip && c.color() == effective)
    {
        let mut choice = play(card.id(), None);
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }
    if let Some(card) = hand
        .iter()
        .find(|c| c.variant() == Variant::Reverse && c.color() == effective)
    {
        let mut choice = play(card.id(), None);
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }

    // 4. Plain Wild, shedding declared-color choice ahead of a numbered dump.
    if let Some(card) = hand.iter().find(|c| c.variant() == Variant::Wild) {
        let mut choice = play(card.id(), Some(dominant_color(hand)));
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }

    // 5. Any card matching the current color, heaviest first.
    let mut same_color: Vec<&Card> = hand.iter().filter(|c| c.color() == effective).collect();
    same_color.sort_by(|a, b| b.points().cmp(&a.points()));
    if let Some(card) = same_color.first() {
        let mut choice = play(card.id(), None);
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }

    // 6. Any other legal card (number/action match on a different color).
    let legal = hand.playable(top);
    if !legal.is_empty() {
        let index = rng.random_range(0..legal.len());
        let mut choice = play(legal[index].id(), None);
        choice.call_one = maybe_call_one(hand.len(), rng);
        return choice;
    }

    draw()
}

/// Rolls the ONE-calling probability if this play would leave exactly one
/// card in hand.
fn maybe_call_one(hand_len: usize, rng: &mut impl Rng) -> bool {
    hand_len == 2 && rng.random_bool(BOT_CALL_ONE_PROBABILITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardroom_cards::Color;
    use cardroom_cards::Variant;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn prefers_wild_draw_four_when_no_matching_color() {
        let top = Card::new(Variant::Number(5), Color::Red);
        let mut hand = Hand::new();
        hand.push(Card::new(Variant::WildDrawFour, Color::Wild));
        hand.push(Card::new(Variant::Number(2), Color::Blue));
        let choice = decide(&hand, &top, &mut rng());
        assert!(choice.declared_color.is_some());
        let played = hand.get(choice.card.unwrap()).unwrap();
        assert_eq!(played.variant(), Variant::WildDrawFour);
    }

    #[test]
    fn prefers_matching_draw_two_over_plain_wild() {
        let top = Card::new(Variant::Number(5), Color::Red);
        let mut hand = Hand::new();
        hand.push(Card::new(Variant::Wild, Color::Wild));
        hand.push(Card::new(Variant::DrawTwo, Color::Red));
        let choice = decide(&hand, &top, &mut rng());
        let played = hand.get(choice.card.unwrap()).unwrap();
        assert_eq!(played.variant(), Variant::DrawTwo);
    }

    #[test]
    fn sheds_heaviest_matching_number_over_lighter_one() {
        let top = Card::new(Variant::Number(5), Color::Red);
        let mut hand = Hand::new();
        hand.push(Card::new(Variant::Number(1), Color::Red));
        hand.push(Card::new(Variant::Number(9), Color::Red));
        let choice = decide(&hand, &top, &mut rng());
        let played = hand.get(choice.card.unwrap()).unwrap();
        assert_eq!(played.variant(), Variant::Number(9));
    }

    #[test]
    fn draws_when_nothing_is_legal() {
        let top = Card::new(Variant::Number(5), Color::Red);
        let mut hand = Hand::new();
        hand.push(Card::new(Variant::Number(2), Color::Blue));
        let choice = decide(&hand, &top, &mut rng());
        assert!(choice.card.is_none());
    }

    #[test]
    fn dominant_color_breaks_ties_toward_red() {
        let mut hand = Hand::new();
        hand.push(Card::new(Variant::Number(1), Color::Red));
        hand.push(Card::new(Variant::Number(2), Color::Blue));
        assert_eq!(dominant_color(&hand), Color::Red);
    }
}
