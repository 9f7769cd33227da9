//! Marquee-light border and eased spotlight.

use std::time::Duration;

/// Alternating bulb glyphs
pub const BULBS: [&str; 2] = ["🟡", "⚪"];
pub const SMOOTHING: f64 = 0.2;
pub const BORDER_TICK: Duration = Duration::from_millis(500);

/// Browser script for a spotlight that trails the pointer, closing
/// [`SMOOTHING`] of the gap on every animation frame
pub fn spotlight_script(element_id: &str) -> String {
    format!(
        "(function(){{var el=document.getElementById('{id}');if(!el)return;\
var x=0,y=0,tx=0,ty=0;\
document.addEventListener('mousemove',function(e){{tx=e.clientX;ty=e.clientY;}});\
(function frame(){{x+=(tx-x)*{k};y+=(ty-y)*{k};\
el.style.transform='translate('+x+'px,'+y+'px)';requestAnimationFrame(frame);}})();}})();",
        id = element_id,
        k = SMOOTHING
    )
}

fn bulb(index: usize) -> &'static str {
    BULBS[index % BULBS.len()]
}

/// Size of a viewport or a single glyph, in whatever unit the caller measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeFrame {
    pub top: Vec<&'static str>,
    pub bottom: Vec<&'static str>,
    pub left: Vec<&'static str>,
    pub right: Vec<&'static str>,
}

impl MarqueeFrame {
    /// Border sized to fit `viewport` with bulbs of size `bulb_size`.
    ///
    /// The bottom and right edges run one phase ahead so that the lights chase
    /// around the frame as `tick` advances.
    pub fn measure(tick: usize, viewport: Extent, bulb_size: Extent) -> Self {
        let across = (viewport.width / bulb_size.width.max(1)) as usize;
        let down = (viewport.height / bulb_size.height.max(1)) as usize;

        Self {
            top: (0..across).map(|i| bulb(i + tick)).collect(),
            bottom: (0..across).map(|i| bulb(i + tick + 1)).collect(),
            left: (0..down).map(|i| bulb(i + tick)).collect(),
            right: (0..down).map(|i| bulb(i + tick + 1)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frame_counts_follow_viewport_and_bulb_size() {
        let frame = MarqueeFrame::measure(
            0,
            Extent { width: 105, height: 44 },
            Extent { width: 20, height: 22 },
        );

        assert_eq!(frame.top.len(), 5);
        assert_eq!(frame.left.len(), 2);
        assert_eq!(frame.top[0], "🟡");
        assert_eq!(frame.bottom[0], "⚪");
        assert_eq!(frame.right, vec!["⚪", "🟡"]);
    }

    #[test]
    fn next_tick_swaps_every_bulb() {
        let viewport = Extent { width: 4, height: 2 };
        let glyph = Extent { width: 1, height: 1 };

        let even = MarqueeFrame::measure(0, viewport, glyph);
        let odd = MarqueeFrame::measure(1, viewport, glyph);

        assert_eq!(even.top, odd.bottom);
        assert_eq!(even.left, odd.right);
        assert_ne!(even.top, odd.top);
    }

    #[test]
    fn zero_sized_bulbs_do_not_divide_by_zero() {
        let frame = MarqueeFrame::measure(
            0,
            Extent { width: 3, height: 3 },
            Extent { width: 0, height: 0 },
        );
        assert_eq!(frame.top.len(), 3);
    }

    #[test]
    fn script_eases_by_the_smoothing_factor() {
        let script = spotlight_script("spotlight");

        assert!(script.contains("getElementById('spotlight')"));
        assert!(script.contains("x+=(tx-x)*0.2"));
    }
}
