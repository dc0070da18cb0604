#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roller_core::geometry::{Rect, ScrollOffset, Size};
use roller_core::placement::{PlacementRequest, Position, Side};

#[derive(Debug, Arbitrary)]
struct Input {
    target: (u16, u16, u16, u16),
    floating: (u16, u16),
    bounds: (u16, u16),
    scroll: (u16, u16),
    offset: u8,
    position: u8,
    target_fixed: bool,
}

fuzz_target!(|input: Input| {
    let (left, top, width, height) = input.target;
    let target = Rect::from_origin_size(left.into(), top.into(), width.into(), height.into());
    let floating = Size::new(input.floating.0.into(), input.floating.1.into());
    let position = match input.position % 5 {
        0 => Position::Top,
        1 => Position::Right,
        2 => Position::Bottom,
        3 => Position::Left,
        _ => Position::Auto,
    };
    let request = PlacementRequest::new(target, floating)
        .position(position)
        .offset(input.offset.into())
        .bounds(Size::new(input.bounds.0.into(), input.bounds.1.into()))
        .scroll(ScrollOffset::new(input.scroll.0.into(), input.scroll.1.into()))
        .target_fixed(input.target_fixed);

    let placed = request.place();
    assert!(placed.top.is_finite() && placed.left.is_finite());
    assert_eq!(placed.side, request.resolve_side());
    if let Some(side) = position.side() {
        assert_eq!(placed.side, side);
    } else if placed.side != Side::Left {
        // Auto only picks Top, Right or Bottom when the box fits there.
        assert!(request.available_space(placed.side) > 0.0);
    }
});
