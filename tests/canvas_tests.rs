use liminal::core::{Canvas, DrawOp, Rgba};

// ============================================================================
// Canvas Core Functionality Tests
// ============================================================================

#[test]
fn test_canvas_new_is_transparent() {
    let canvas = Canvas::new(64, 32);
    assert_eq!(canvas.dimensions(), (64, 32));
    assert_eq!(canvas.pixels().len(), 64 * 32 * 4);
    assert!(canvas.pixels().iter().all(|&b| b == 0));
}

#[test]
fn test_ops_are_deferred_until_execute() {
    let canvas = Canvas::new(4, 4).draw(DrawOp::Clear(Rgba::WHITE));
    assert_eq!(canvas.pending_ops(), 1);
    assert_eq!(canvas.pixel(0, 0), Some(Rgba(0, 0, 0, 0)));

    let executed = canvas.execute_ops();
    assert_eq!(executed.pending_ops(), 0);
    assert_eq!(executed.pixel(3, 3), Some(Rgba::WHITE));
}

#[test]
fn test_later_ops_paint_over_earlier_ones() {
    let canvas = Canvas::new(10, 10)
        .draw(DrawOp::Clear(Rgba::BLACK))
        .draw(DrawOp::Rect {
            x: 2,
            y: 2,
            width: 3,
            height: 3,
            color: Rgba::WHITE,
        })
        .draw(DrawOp::Pixel {
            x: 3,
            y: 3,
            color: Rgba(255, 0, 0, 255),
        })
        .execute_ops();

    assert_eq!(canvas.pixel(1, 1), Some(Rgba::BLACK));
    assert_eq!(canvas.pixel(2, 2), Some(Rgba::WHITE));
    assert_eq!(canvas.pixel(4, 4), Some(Rgba::WHITE));
    assert_eq!(canvas.pixel(5, 5), Some(Rgba::BLACK));
    assert_eq!(canvas.pixel(3, 3), Some(Rgba(255, 0, 0, 255)));
}

// ============================================================================
// Clipping Tests
// ============================================================================

#[test]
fn test_rect_is_clipped_to_canvas() {
    let canvas = Canvas::new(8, 8)
        .draw(DrawOp::Rect {
            x: 6,
            y: 6,
            width: 100,
            height: 100,
            color: Rgba::WHITE,
        })
        .execute_ops();

    assert_eq!(canvas.pixel(7, 7), Some(Rgba::WHITE));
    assert_eq!(canvas.pixel(5, 7), Some(Rgba(0, 0, 0, 0)));
    assert_eq!(canvas.pixel(8, 8), None);
}

#[test]
fn test_offscreen_pixel_is_ignored() {
    let canvas = Canvas::new(2, 2)
        .draw(DrawOp::Pixel {
            x: 5,
            y: 0,
            color: Rgba::WHITE,
        })
        .execute_ops();
    assert!(canvas.pixels().iter().all(|&b| b == 0));
}
