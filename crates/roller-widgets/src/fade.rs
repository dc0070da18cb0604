#![forbid(unsafe_code)]

//! Shared close animation.
//!
//! Closing widgets all follow the same steps: read the duration of the
//! node's inline transition, switch the transition off so each frame's
//! opacity is applied directly, then drive the opacity down one animation
//! frame at a time with [`Fade`]. The future completes after the frame that
//! reaches the end of the curve; the caller then removes or restores the
//! node.

use std::time::Duration;

use roller_backend::{NodeId, Page};
use roller_core::css::transition_duration;
use roller_core::easing::{Fade, format_opacity, parse_opacity};
use tracing::Instrument;

/// Duration of the node's inline transition (zero when none is set).
pub fn inline_transition_duration<P: Page>(page: &P, node: NodeId) -> Duration {
    ["transition-duration", "transition"]
        .into_iter()
        .filter_map(|property| page.style_property(node, property))
        .find_map(|value| transition_duration(&value))
        .unwrap_or(Duration::ZERO)
}

/// Current inline opacity, or `default` when unset.
pub fn inline_opacity<P: Page>(page: &P, node: NodeId, default: f64) -> f64 {
    parse_opacity(page.style_property(node, "opacity").as_deref(), default)
}

/// Fade `node` out from opacity `from`.
pub async fn fade_out<P: Page>(page: &P, node: NodeId, from: f64) {
    let fade = Fade::new(from, inline_transition_duration(page, node));
    page.set_style_property(node, "transition", "unset");

    let span = tracing::trace_span!("fade_out", node = node.raw());
    async move {
        tracing::trace!(from = fade.from(), duration = ?fade.duration(), "fade start");
        let start = page.next_frame().await;
        loop {
            let now = page.next_frame().await;
            let elapsed = now.saturating_sub(start);
            page.set_style_property(node, "opacity", &format_opacity(fade.value_at(elapsed)));
            if fade.is_complete(elapsed) {
                break;
            }
        }
    }
    .instrument(span)
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use roller_harness::{FRAME_INTERVAL, MemoryPage, block_on};

    #[test]
    fn reads_shorthand_duration() {
        let page = MemoryPage::default();
        let node = page.insert(page.body(), "div");
        page.set_style_property(node, "transition", "opacity 0.3s ease");
        assert_eq!(
            inline_transition_duration(&page, node),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn longhand_wins_over_shorthand() {
        let page = MemoryPage::default();
        let node = page.insert(page.body(), "div");
        page.set_style_property(node, "transition", "opacity 0.3s ease");
        page.set_style_property(node, "transition-duration", "120ms");
        assert_eq!(
            inline_transition_duration(&page, node),
            Duration::from_millis(120)
        );
    }

    #[test]
    fn missing_transition_is_instant() {
        let page = MemoryPage::default();
        let node = page.insert(page.body(), "div");
        assert_eq!(inline_transition_duration(&page, node), Duration::ZERO);
        block_on(fade_out(&page, node, 1.0));
        assert_eq!(page.style_property(node, "opacity").as_deref(), Some("0"));
        assert_eq!(page.frames_elapsed(), 2);
    }

    #[test]
    fn fade_disables_transition_and_ends_transparent() {
        let page = MemoryPage::default();
        let node = page.insert(page.body(), "div");
        page.set_style_property(node, "transition", "opacity 0.32s ease");
        page.set_style_property(node, "opacity", "0.75");

        block_on(fade_out(&page, node, inline_opacity(&page, node, 1.0)));

        assert_eq!(page.style_property(node, "transition").as_deref(), Some("unset"));
        assert_eq!(page.style_property(node, "opacity").as_deref(), Some("0"));
        // One frame to take the start time, then 320ms worth of frames.
        let frames = 1 + (Duration::from_millis(320).as_millis() / FRAME_INTERVAL.as_millis());
        assert_eq!(u128::from(page.frames_elapsed()), frames);
    }

    #[test]
    fn opacity_falls_back_to_default() {
        let page = MemoryPage::default();
        let node = page.insert(page.body(), "div");
        assert_eq!(inline_opacity(&page, node, 0.5), 0.5);
        page.set_style_property(node, "opacity", "0.2");
        assert_eq!(inline_opacity(&page, node, 0.5), 0.2);
    }
}
