//! CSS formatting for stage transforms

use crate::sim::{ActorTransform, HandTransform};

/// CSS `transform` value for the thrown actor
pub fn actor_transform_css(actor: &ActorTransform) -> String {
    format!(
        "translate({:.2}px, {:.2}px) rotate({:.2}deg) scale({:.3}, {:.3})",
        actor.pos.x, actor.pos.y, actor.rotation, actor.scale.x, actor.scale.y
    )
}

/// CSS `transform` value for the throwing hand
pub fn hand_transform_css(hand: &HandTransform) -> String {
    format!(
        "translateY({:.2}px) rotate({:.2}deg) skewX({:.2}deg)",
        hand.y, hand.rotation, hand.skew_x
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_baseline_css() {
        assert_eq!(
            actor_transform_css(&ActorTransform::BASELINE),
            "translate(0.00px, 0.00px) rotate(0.00deg) scale(1.000, 1.000)"
        );
        assert_eq!(
            hand_transform_css(&HandTransform::default()),
            "translateY(0.00px) rotate(0.00deg) skewX(0.00deg)"
        );
    }

    #[test]
    fn test_squashed_actor_css() {
        let actor = ActorTransform {
            pos: Vec2::new(-42.5, 400.0),
            rotation: 540.0,
            scale: Vec2::new(1.2, 0.7),
            opacity: 1.0,
        };
        assert_eq!(
            actor_transform_css(&actor),
            "translate(-42.50px, 400.00px) rotate(540.00deg) scale(1.200, 0.700)"
        );
    }
}
